#[macro_use]
pub mod logging;

pub mod io;
pub mod settings;
pub mod transfer;

#[cfg(feature = "cli")]
mod cli;

pub use io::serial::{list_ports, FlowControlOptions, PlotterPort, SerialTransport, SerialportTransport};
pub use io::{EnumerationError, FileContents, FileSource, PathFileSource, TransferError};
pub use transfer::{Status, TransferController, TransferJob, DEFAULT_BAUD_RATE};

#[cfg(feature = "cli")]
pub use cli::{app_name, run, APP_VERSION};
