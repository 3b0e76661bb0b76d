//! Streaming sample pipeline
//!
//! ```text
//! raw line ─▶ LineParser ─▶ [(tag, value)] ─▶ CaptureCoordinator (pause gate)
//!                                                │
//!                                  ┌─────────────┴─────────────┐
//!                                  ▼                           ▼
//!                     ChannelRegistry ─▶ RingBuffer        ExportLog
//! ```
//!
//! Everything here is synchronous and single-threaded: the coordinator is
//! owned by one thread and `on_line` runs to completion before the next
//! call. Readers (the renderer) pull a fresh series per frame, so a resize
//! between frames is never observed half-way.
//!
//! # Example
//!
//! ```
//! use serialvis_rs::capture::CaptureCoordinator;
//!
//! let mut capture = CaptureCoordinator::new(2).unwrap();
//! capture.register_channel("A", [255, 0, 0, 255]).unwrap();
//! capture.register_channel("B", [0, 255, 0, 255]).unwrap();
//!
//! for line in ["A:1,B:2", "A:3,B:4", "A:5,B:4.5"] {
//!     capture.on_line(line);
//! }
//!
//! assert_eq!(capture.current_series("A").unwrap(), vec![3.0, 5.0]);
//! assert_eq!(capture.export_log().len(), 6);
//! ```

pub mod coordinator;
pub mod export_log;
pub mod parser;
pub mod registry;
pub mod ring_buffer;

pub use coordinator::{CaptureCoordinator, RoutingMode};
pub use export_log::{default_export_filename, ExportLog, ExportTable, EXPORT_HEADER};
pub use parser::{LineParser, ParseError};
pub use registry::{Channel, ChannelRegistry};
pub use ring_buffer::RingBuffer;
