// src/io/error.rs
//
// Typed errors for port enumeration and plot transfers.
// Constructors take the device or file name so every message says where it failed.

use std::fmt;

/// Serial operation that failed during a transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerialOperation {
    Open,
    Write,
    Close,
}

impl fmt::Display for SerialOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SerialOperation::Open => "open",
            SerialOperation::Write => "write",
            SerialOperation::Close => "close",
        };
        f.write_str(s)
    }
}

/// Errors raised by a plot transfer or rejected before one starts
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The file source could not produce its content
    #[error("Could not read contents of {source_name}: {reason}")]
    Read { source_name: String, reason: String },

    /// Opening, writing to, or closing the serial port failed
    #[error("Serial {operation} failed on {device}: {reason}")]
    Serial {
        device: String,
        operation: SerialOperation,
        reason: String,
    },

    #[error("A plot is already in progress")]
    Busy,

    #[error("No plotter port selected")]
    NoPortSelected,

    #[error("No file selected")]
    NoFileSelected,

    #[error("Invalid baud rate {0}")]
    InvalidBaudRate(u32),
}

impl TransferError {
    pub fn read(source_name: impl Into<String>, reason: impl fmt::Display) -> Self {
        TransferError::Read {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn open(device: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::serial(device, SerialOperation::Open, reason)
    }

    pub fn write(device: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::serial(device, SerialOperation::Write, reason)
    }

    pub fn close(device: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::serial(device, SerialOperation::Close, reason)
    }

    fn serial(device: impl Into<String>, operation: SerialOperation, reason: impl fmt::Display) -> Self {
        TransferError::Serial {
            device: device.into(),
            operation,
            reason: reason.to_string(),
        }
    }

    /// True for guard rejections that never reached the file or the port
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TransferError::Busy
                | TransferError::NoPortSelected
                | TransferError::NoFileSelected
                | TransferError::InvalidBaudRate(_)
        )
    }
}

impl From<TransferError> for String {
    fn from(e: TransferError) -> Self {
        e.to_string()
    }
}

/// The platform serial subsystem could not list its devices
#[derive(Debug, thiserror::Error)]
#[error("Failed to enumerate ports: {0}")]
pub struct EnumerationError(pub String);

impl From<serialport::Error> for EnumerationError {
    fn from(e: serialport::Error) -> Self {
        EnumerationError(e.to_string())
    }
}

impl From<EnumerationError> for String {
    fn from(e: EnumerationError) -> Self {
        e.to_string()
    }
}
