//! Byte stream → line framing
//!
//! Lines are terminated by `\n`; a `\r` directly before it is stripped.
//! A run of bytes longer than the configured maximum without a terminator
//! is discarded up to the next terminator, so a link that never sends a
//! newline cannot grow the pending buffer without bound.

use std::collections::VecDeque;

/// Splits incoming bytes into complete lines
#[derive(Debug)]
pub struct LineFramer {
    pending: Vec<u8>,
    ready: VecDeque<Vec<u8>>,
    max_line_len: usize,
    /// Set while skipping the tail of an oversized line
    discarding: bool,
    oversized_lines: u64,
}

impl LineFramer {
    pub fn new(max_line_len: usize) -> Self {
        Self {
            pending: Vec::new(),
            ready: VecDeque::new(),
            max_line_len: max_line_len.max(1),
            discarding: false,
            oversized_lines: 0,
        }
    }

    /// Append raw bytes, completing any lines they terminate
    pub fn extend(&mut self, bytes: &[u8]) {
        for chunk in bytes.split_inclusive(|&b| b == b'\n') {
            let (body, terminated) = match chunk.split_last() {
                Some((b'\n', body)) => (body, true),
                _ => (chunk, false),
            };

            if !self.discarding {
                self.pending.extend_from_slice(body);
                // A trailing '\r' may still be the first half of a CRLF
                let allowed = self.max_line_len + usize::from(self.pending.last() == Some(&b'\r'));
                if self.pending.len() > allowed {
                    tracing::debug!(
                        "Discarding line longer than {} bytes",
                        self.max_line_len
                    );
                    self.pending.clear();
                    self.discarding = true;
                    self.oversized_lines += 1;
                }
            }

            if terminated {
                if self.discarding {
                    self.discarding = false;
                } else {
                    let mut line = std::mem::take(&mut self.pending);
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                    self.ready.push_back(line);
                }
            }
        }
    }

    /// Whether a complete line is waiting
    pub fn has_line(&self) -> bool {
        !self.ready.is_empty()
    }

    /// Next complete line, without its terminator
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        self.ready.pop_front()
    }

    /// Turn any unterminated remainder into a final line (end of stream)
    pub fn finish(&mut self) {
        if !self.discarding && !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.ready.push_back(line);
        }
        self.pending.clear();
        self.discarding = false;
    }

    /// Bytes received that do not yet form a complete line
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Lines dropped for exceeding the maximum length
    pub fn oversized_lines(&self) -> u64 {
        self.oversized_lines
    }
}
