// src/transfer.rs
//
// Transfer controller: plot readiness state machine plus the blocking
// file-to-serial transfer.
//
// Status flow:
//   Idle/Done/Error --begin_transfer--> Plotting --ok--> Done
//                                                 \-err-> Error
//
// Everything runs on the caller's thread. `&mut self` is the only lock.

use std::fmt;
use std::rc::Rc;

use crate::io::error::TransferError;
use crate::io::file::FileSource;
use crate::io::serial::{FlowControlOptions, PlotterPort, SerialTransport};

/// Baud rate used until the user picks another
pub const DEFAULT_BAUD_RATE: u32 = 9600;

// ============================================================================
// Status
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Plotting,
    Done,
    Error,
}

impl Status {
    /// Text shown to the user for this status
    pub fn message(&self) -> &'static str {
        match self {
            Status::Idle => "Ready",
            Status::Plotting => "Currently working…",
            Status::Done => "Job completed",
            Status::Error => "Error",
        }
    }

    /// A new transfer may start from any status except `Plotting`
    pub fn is_ready(&self) -> bool {
        !matches!(self, Status::Plotting)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ============================================================================
// Transfer Job
// ============================================================================

/// One request to send one file to one plotter at one baud rate
pub struct TransferJob<'a> {
    pub port: PlotterPort,
    pub baud_rate: u32,
    pub file: &'a dyn FileSource,
}

impl<'a> TransferJob<'a> {
    pub fn new(port: PlotterPort, file: &'a dyn FileSource) -> Self {
        Self {
            port,
            baud_rate: DEFAULT_BAUD_RATE,
            file,
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

// ============================================================================
// Controller
// ============================================================================

type StatusListener = Box<dyn FnMut(Status)>;

/// Owns the plotter selection, the current status, and the serial transport
pub struct TransferController<T: SerialTransport> {
    transport: T,
    status: Status,
    port: Option<PlotterPort>,
    file: Option<Rc<dyn FileSource>>,
    baud_rate: u32,
    listener: Option<StatusListener>,
}

impl<T: SerialTransport> TransferController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            status: Status::Idle,
            port: None,
            file: None,
            baud_rate: DEFAULT_BAUD_RATE,
            listener: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn port(&self) -> Option<&PlotterPort> {
        self.port.as_ref()
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Register the callback that renders status changes.
    /// It is called once immediately with the current status.
    pub fn on_status_change(&mut self, mut listener: impl FnMut(Status) + 'static) {
        listener(self.status);
        self.listener = Some(Box::new(listener));
    }

    pub fn select_port(&mut self, port: PlotterPort) {
        tlog!("[transfer] Plotter port selected: {}", port);
        self.port = Some(port);
    }

    pub fn clear_port(&mut self) {
        self.port = None;
    }

    pub fn select_file(&mut self, file: Rc<dyn FileSource>) {
        tlog!("[transfer] File selected: {}", file.describe());
        self.file = Some(file);
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), TransferError> {
        if baud_rate == 0 {
            return Err(TransferError::InvalidBaudRate(baud_rate));
        }
        self.baud_rate = baud_rate;
        Ok(())
    }

    /// No transfer is in flight
    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }

    /// Port and file are selected and no transfer is in flight
    pub fn can_plot(&self) -> bool {
        self.port.is_some() && self.file.is_some() && self.is_ready()
    }

    /// Plot the selected file on the selected port at the selected baud rate
    pub fn plot(&mut self) -> Result<(), TransferError> {
        let port = self.port.clone().ok_or(TransferError::NoPortSelected)?;
        let file = self.file.clone().ok_or(TransferError::NoFileSelected)?;
        let job = TransferJob::new(port, &*file).with_baud_rate(self.baud_rate);
        self.begin_transfer(job)
    }

    /// Run one transfer to completion.
    ///
    /// Rejected without a status change while another transfer is in flight
    /// or when the job names no port. Otherwise the status moves to `Plotting`
    /// before any I/O, then to `Done` or `Error`.
    pub fn begin_transfer(&mut self, job: TransferJob<'_>) -> Result<(), TransferError> {
        if !self.is_ready() {
            return Err(TransferError::Busy);
        }
        if job.port.name().is_empty() {
            return Err(TransferError::NoPortSelected);
        }
        if job.baud_rate == 0 {
            return Err(TransferError::InvalidBaudRate(job.baud_rate));
        }

        self.set_status(Status::Plotting);
        tlog!(
            "[transfer] Plotting {} on {} at {} baud",
            job.file.describe(),
            job.port,
            job.baud_rate
        );

        match self.transfer(&job) {
            Ok(written) => {
                tlog!("[transfer] Job completed ({} bytes)", written);
                self.set_status(Status::Done);
                Ok(())
            }
            Err(e) => {
                tlog!("[transfer] Job failed: {}", e);
                self.set_status(Status::Error);
                Err(e)
            }
        }
    }

    /// Read the file, then open, write, close. Returns the byte count written.
    fn transfer(&mut self, job: &TransferJob<'_>) -> Result<usize, TransferError> {
        let contents = job
            .file
            .load_contents()
            .map_err(|e| TransferError::read(job.file.describe(), e))?;

        let mut handle =
            self.transport
                .open(job.port.name(), job.baud_rate, FlowControlOptions::PLOTTER)?;

        let written = self.transport.write(&mut handle, &contents.bytes);
        // Close even after a failed write; the write error wins
        let closed = self.transport.close(handle);
        written?;
        closed?;

        Ok(contents.bytes.len())
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
        if let Some(listener) = self.listener.as_mut() {
            listener(status);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
