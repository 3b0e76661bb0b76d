//! Core data types for SerialVis-RS
//!
//! This module contains the small value types that flow through the
//! capture pipeline.
//!
//! # Main Types
//!
//! - [`Sample`] - One `(tag, value)` pair parsed from a line
//! - [`ExportRecord`] - One accepted sample as kept by the export log
//! - [`CaptureState`] - Running / Paused
//! - [`LineOutcome`] - What happened to one incoming line
//! - [`CaptureStats`] - Counters kept by the coordinator

use crate::capture::parser::ParseError;

/// Buffer capacities offered to the user
pub const CAPACITY_PRESETS: [usize; 5] = [1000, 3000, 5000, 7000, 10_000];

/// Capacity used until the user picks another one
pub const DEFAULT_CAPACITY: usize = CAPACITY_PRESETS[0];

/// A single parsed `(tag, value)` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Channel tag as it appeared on the wire (whitespace trimmed)
    pub tag: String,
    /// Numeric value
    pub value: f64,
}

impl Sample {
    pub fn new(tag: impl Into<String>, value: f64) -> Self {
        Self {
            tag: tag.into(),
            value,
        }
    }
}

/// One row of the export log
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    /// Tag of the channel the sample was routed to
    pub channel_tag: String,
    /// Sample value
    pub value: f64,
}

impl ExportRecord {
    pub fn new(channel_tag: impl Into<String>, value: f64) -> Self {
        Self {
            channel_tag: channel_tag.into(),
            value,
        }
    }
}

/// Capture state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Samples are routed to buffers and the export log
    #[default]
    Running,
    /// Incoming lines are discarded
    Paused,
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureState::Running => write!(f, "Running"),
            CaptureState::Paused => write!(f, "Paused"),
        }
    }
}

/// Result of feeding one line to the coordinator
///
/// This is informational only. Nothing in the ingestion path is an error
/// from the caller's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Line parsed; `routed` samples reached a channel, `dropped` fields had
    /// no matching channel
    Accepted { routed: usize, dropped: usize },
    /// Capture is paused; the line was ignored
    Paused,
    /// A field was malformed, so the whole line was discarded
    Abandoned(ParseError),
    /// The raw bytes were not valid UTF-8
    Undecodable,
}

/// Counters describing the capture so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Every line handed to the coordinator
    pub lines_received: u64,
    /// Lines that parsed while running
    pub lines_accepted: u64,
    /// Lines ignored because capture was paused
    pub lines_ignored_paused: u64,
    /// Lines that were not valid UTF-8
    pub lines_undecodable: u64,
    /// Lines abandoned because a field was malformed
    pub lines_malformed: u64,
    /// Samples written into ring buffers
    pub samples_routed: u64,
    /// Well-formed fields with no matching channel
    pub fields_unrouted: u64,
}

impl CaptureStats {
    /// Lines dropped for any reason other than pause
    pub fn lines_rejected(&self) -> u64 {
        self.lines_undecodable + self.lines_malformed
    }

    /// Share of received lines that were accepted, as a percentage
    pub fn acceptance_rate(&self) -> f64 {
        if self.lines_received == 0 {
            100.0
        } else {
            (self.lines_accepted as f64 / self.lines_received as f64) * 100.0
        }
    }
}

/// Generate a distinct RGBA colour for the channel at `index`
///
/// Hues are spread with the golden ratio so neighbouring channels stay
/// distinguishable on both light and dark backgrounds.
pub fn generate_color(index: u32) -> [u8; 4] {
    const GOLDEN_RATIO: f32 = 0.618_034;

    let hue = ((index as f32 * GOLDEN_RATIO) % 1.0) * 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.7, 0.85);
    [r, g, b, 255]
}

/// Convert HSV (hue 0-360, saturation 0-1, value 0-1) to RGB
fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (u8, u8, u8) {
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}
