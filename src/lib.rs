//! # SerialVis-RS: Serial Line Plotter
//!
//! A real-time plotter for microcontrollers that print readings as text
//! lines of the form `TAG:VALUE,TAG:VALUE,...` over a serial port. Each tag
//! is a channel with a fixed-size rolling window; every accepted sample is
//! also kept in an append-only log that can be exported as CSV.
//!
//! ## Architecture
//!
//! - **Transport**: a reader thread frames serial bytes into lines and sends
//!   them to the UI thread over a crossbeam channel
//! - **Capture**: the parse / route / record pipeline, owned by the UI thread
//! - **Frontend**: eframe/egui window with egui_plot graphs
//!
//! ## Configuration
//!
//! Settings are read from `config.toml` in the platform data directory under
//! `dev.serialvis.serialvis-rs` (or a path given on the command line):
//!
//! - **Linux**: `~/.local/share/dev.serialvis.serialvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.serialvis.serialvis-rs/`
//! - **Windows**: `%APPDATA%\dev.serialvis.serialvis-rs\`
//!
//! ## Example
//!
//! ```ignore
//! use serialvis_rs::{
//!     capture::CaptureCoordinator,
//!     config::{AppConfig, UiSessionState},
//!     frontend::SerialVisApp,
//!     transport::{SerialLineSource, TransportHandle},
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load_or_default(None);
//!     let capture = CaptureCoordinator::from_config(&config.capture)?;
//!     let source = SerialLineSource::open(&config.serial)?;
//!     let transport = TransportHandle::spawn(Box::new(source), config.serial.channel_buffer_size)?;
//!
//!     let app = SerialVisApp::new(config, capture, Some(transport), UiSessionState::load());
//!     eframe::run_native(
//!         "SerialVis-RS",
//!         eframe::NativeOptions::default(),
//!         Box::new(|_cc| Ok(Box::new(app))),
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod frontend;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use capture::{CaptureCoordinator, RoutingMode};
pub use config::{AppConfig, UiSessionState};
pub use error::{Result, SerialVisError};
pub use frontend::SerialVisApp;
pub use types::{CaptureState, CaptureStats, ExportRecord, LineOutcome, Sample};
