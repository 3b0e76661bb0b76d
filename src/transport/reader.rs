//! Line source over any `std::io::Read`

use std::io::{ErrorKind, Read};

use super::framer::LineFramer;
use super::LineSource;
use crate::error::Result;

/// Bytes pulled from the reader per `can_read_line` call
const READ_CHUNK: usize = 1024;

/// Frames lines out of an arbitrary byte stream
///
/// Timeouts, `WouldBlock` and `Interrupted` are treated as "no data yet".
/// End of stream closes the source after flushing an unterminated final
/// line, so a replayed capture file does not lose its last reading.
pub struct ReaderLineSource<R: Read> {
    reader: R,
    framer: LineFramer,
    name: String,
    closed: bool,
    buf: Vec<u8>,
}

impl<R: Read> ReaderLineSource<R> {
    pub fn new(reader: R, max_line_len: usize, name: impl Into<String>) -> Self {
        Self {
            reader,
            framer: LineFramer::new(max_line_len),
            name: name.into(),
            closed: false,
            buf: vec![0; READ_CHUNK],
        }
    }

    /// Lines discarded for exceeding the maximum length
    pub fn oversized_lines(&self) -> u64 {
        self.framer.oversized_lines()
    }
}

impl<R: Read + Send> LineSource for ReaderLineSource<R> {
    fn can_read_line(&mut self) -> Result<bool> {
        if self.framer.has_line() || self.closed {
            return Ok(self.framer.has_line());
        }

        match self.reader.read(&mut self.buf) {
            Ok(0) => {
                tracing::debug!("{}: end of stream", self.name);
                self.framer.finish();
                self.closed = true;
            }
            Ok(n) => self.framer.extend(&self.buf[..n]),
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) => {}
            Err(e) => {
                self.closed = true;
                return Err(e.into());
            }
        }

        Ok(self.framer.has_line())
    }

    fn read_line(&mut self) -> Option<Vec<u8>> {
        self.framer.next_line()
    }

    fn is_closed(&self) -> bool {
        self.closed && !self.framer.has_line()
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
