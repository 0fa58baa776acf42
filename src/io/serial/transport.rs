// src/io/serial/transport.rs
//
// Serial transport used by the transfer controller.
// A transport opens a connection, writes a byte slice to it, and closes it.
// The handle is consumed by `close`, so a connection can never outlive one transfer.

use std::io::Write;
use std::time::Duration;

use serialport::SerialPort;

use super::utils::{to_serialport_flow_control, FlowControlOptions};
use crate::io::error::TransferError;

/// Default bound on a single blocking write
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking serial transport
pub trait SerialTransport {
    /// Exclusively owned connection handle
    type Handle;

    fn open(
        &mut self,
        port: &str,
        baud_rate: u32,
        flow_control: FlowControlOptions,
    ) -> Result<Self::Handle, TransferError>;

    /// Write every byte or fail
    fn write(&mut self, handle: &mut Self::Handle, bytes: &[u8]) -> Result<(), TransferError>;

    fn close(&mut self, handle: Self::Handle) -> Result<(), TransferError>;
}

/// Open connection on a real serial device
pub struct SerialportHandle {
    device: String,
    port: Box<dyn SerialPort>,
}

/// Transport backed by the serialport crate
#[derive(Clone, Debug)]
pub struct SerialportTransport {
    write_timeout: Duration,
}

impl SerialportTransport {
    pub fn new() -> Self {
        Self {
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    pub fn with_write_timeout(write_timeout: Duration) -> Self {
        Self { write_timeout }
    }
}

impl Default for SerialportTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialTransport for SerialportTransport {
    type Handle = SerialportHandle;

    fn open(
        &mut self,
        port: &str,
        baud_rate: u32,
        flow_control: FlowControlOptions,
    ) -> Result<SerialportHandle, TransferError> {
        let flow = to_serialport_flow_control(&flow_control)
            .map_err(|e| TransferError::open(port, e))?;

        let serial_port = serialport::new(port, baud_rate)
            .flow_control(flow)
            .timeout(self.write_timeout)
            .open()
            .map_err(|e| TransferError::open(port, e))?;

        tlog!(
            "[serial] Opened {} at {} baud (flow control: {:?})",
            port,
            baud_rate,
            flow
        );

        Ok(SerialportHandle {
            device: port.to_string(),
            port: serial_port,
        })
    }

    fn write(&mut self, handle: &mut SerialportHandle, bytes: &[u8]) -> Result<(), TransferError> {
        handle
            .port
            .write_all(bytes)
            .and_then(|_| handle.port.flush())
            .map_err(|e| TransferError::write(&handle.device, e))?;

        tlog!("[serial] Wrote {} bytes to {}", bytes.len(), handle.device);
        Ok(())
    }

    fn close(&mut self, handle: SerialportHandle) -> Result<(), TransferError> {
        // serialport closes the descriptor on drop
        let SerialportHandle { device, port } = handle;
        drop(port);
        tlog!("[serial] Closed {}", device);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording transport for controller tests.

    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Call {
        Open {
            port: String,
            baud_rate: u32,
            flow_control: FlowControlOptions,
        },
        Write(Vec<u8>),
        Close,
    }

    #[derive(Default)]
    pub struct RecordingTransport {
        pub calls: Vec<Call>,
        pub fail_open: bool,
        pub fail_write: bool,
        pub fail_close: bool,
        pub open_handles: usize,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl SerialTransport for RecordingTransport {
        type Handle = String;

        fn open(
            &mut self,
            port: &str,
            baud_rate: u32,
            flow_control: FlowControlOptions,
        ) -> Result<String, TransferError> {
            self.calls.push(Call::Open {
                port: port.to_string(),
                baud_rate,
                flow_control,
            });
            if self.fail_open {
                return Err(TransferError::open(port, "no such device"));
            }
            self.open_handles += 1;
            Ok(port.to_string())
        }

        fn write(&mut self, handle: &mut String, bytes: &[u8]) -> Result<(), TransferError> {
            self.calls.push(Call::Write(bytes.to_vec()));
            if self.fail_write {
                return Err(TransferError::write(handle.as_str(), "broken pipe"));
            }
            Ok(())
        }

        fn close(&mut self, handle: String) -> Result<(), TransferError> {
            self.calls.push(Call::Close);
            self.open_handles -= 1;
            if self.fail_close {
                return Err(TransferError::close(handle, "i/o error"));
            }
            Ok(())
        }
    }
}
