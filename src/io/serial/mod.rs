// src/io/serial/mod.rs
//
// Serial side of plotting: port enumeration and the blocking transport.

pub mod ports;
pub mod transport;
pub(crate) mod utils;

pub use ports::{list_ports, PlotterPort};
pub use transport::{SerialTransport, SerialportHandle, SerialportTransport, DEFAULT_WRITE_TIMEOUT};
pub use utils::FlowControlOptions;
