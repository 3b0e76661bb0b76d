//! Line transport
//!
//! Bytes arrive on a reader thread, are framed into lines, and are handed to
//! the UI thread over a bounded channel:
//!
//! ```text
//! serial port / Read ─▶ LineFramer ─▶ TransportWorker ══(crossbeam)══▶ TransportHandle::drain
//! ```
//!
//! # Main Types
//!
//! - [`LineSource`] - "is a full line available" / "read one line"
//! - [`SerialLineSource`] - serial port via the `serialport` crate
//! - [`ReaderLineSource`] - any `std::io::Read` (files, pipes, tests)
//! - [`TransportHandle`] - owns the reader thread, drains events

pub mod framer;
pub mod reader;
pub mod serial;
pub mod worker;

pub use framer::LineFramer;
pub use reader::ReaderLineSource;
pub use serial::{available_ports, SerialLineSource};
pub use worker::{TransportHandle, TransportWorker};

use crate::error::Result;

/// A source of newline-delimited lines
pub trait LineSource: Send {
    /// Pull whatever bytes are ready and report whether a full line is buffered
    ///
    /// May block for at most the source's read timeout.
    fn can_read_line(&mut self) -> Result<bool>;

    /// Next buffered line without its terminator
    fn read_line(&mut self) -> Option<Vec<u8>>;

    /// True once the source has ended and every buffered line was read
    fn is_closed(&self) -> bool;

    /// Human readable name for logs and the status bar
    fn describe(&self) -> String;
}

/// Message from the reader thread to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Complete lines in arrival order
    Lines(Vec<Vec<u8>>),
    /// The source failed; a `Closed` follows
    Error(String),
    /// No more lines will arrive
    Closed,
}
