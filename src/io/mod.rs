// src/io/mod.rs
//
// Plot I/O: file sources, serial ports, and the errors they raise.

pub mod error;
pub mod file;
pub mod serial;

pub use error::{EnumerationError, SerialOperation, TransferError};
pub use file::{FileContents, FileSource, PathFileSource};
