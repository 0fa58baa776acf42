// src/io/serial/utils.rs
//
// Flow control settings and their conversion to the serialport crate's types.

use serialport::FlowControl;

// ============================================================================
// Types
// ============================================================================

/// Flow control signalling requested when opening a port
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowControlOptions {
    /// Software XON/XOFF
    pub xon_xoff: bool,
    /// Hardware RTS/CTS
    pub rts_cts: bool,
    /// Hardware DSR/DTR
    pub dsr_dtr: bool,
}

impl FlowControlOptions {
    /// Pen plotters pace the host with RTS/CTS; everything else stays off.
    pub const PLOTTER: FlowControlOptions = FlowControlOptions {
        xon_xoff: false,
        rts_cts: true,
        dsr_dtr: false,
    };
}

impl Default for FlowControlOptions {
    fn default() -> Self {
        FlowControlOptions::PLOTTER
    }
}

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert our flow control options to serialport crate's FlowControl.
///
/// serialport exposes a single mode, so at most one of RTS/CTS and XON/XOFF
/// may be set. DSR/DTR pacing has no serialport equivalent.
pub fn to_serialport_flow_control(opts: &FlowControlOptions) -> Result<FlowControl, String> {
    if opts.dsr_dtr {
        return Err("DSR/DTR flow control is not supported".to_string());
    }
    match (opts.rts_cts, opts.xon_xoff) {
        (true, true) => Err("RTS/CTS and XON/XOFF flow control cannot be combined".to_string()),
        (true, false) => Ok(FlowControl::Hardware),
        (false, true) => Ok(FlowControl::Software),
        (false, false) => Ok(FlowControl::None),
    }
}

// ============================================================================
// Tests
// ============================================================================
