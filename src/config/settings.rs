//! Configuration sections
//!
//! Each section maps to a TOML table in `config.toml`:
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyACM0"
//! baud_rate = 115200
//!
//! [capture]
//! capacity_presets = [1000, 3000, 5000, 7000, 10000]
//! default_capacity = 1000
//! routing = "tag"
//!
//! [[capture.channels]]
//! tag = "ADC1"
//! color = [255, 80, 80, 255]
//!
//! [ui]
//! layout = "overlay"
//! ```
//!
//! Every field has a default, so partial files are fine.

use crate::capture::RoutingMode;
use crate::types::{generate_color, CAPACITY_PRESETS, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};

/// Default serial device
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default read timeout for the serial port in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10;

/// Longest line accepted before the framer discards it
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

// ==================== Serial ====================

/// Serial link settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path or name (e.g. "/dev/ttyACM0", "COM3")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout; a timeout means "no data yet"
    pub read_timeout_ms: u64,
    /// Maximum line length in bytes
    pub max_line_len: usize,
    /// Capacity of the reader thread → UI channel, in batches
    pub channel_buffer_size: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            channel_buffer_size: 1024,
        }
    }
}

// ==================== Capture ====================

/// One channel to register at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Tag as sent on the wire
    pub tag: String,
    /// RGBA colour; generated from the position when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 4]>,
}

impl ChannelConfig {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = Some(color);
        self
    }

    /// Configured colour, or a generated one for position `index`
    pub fn resolved_color(&self, index: usize) -> [u8; 4] {
        self.color.unwrap_or_else(|| generate_color(index as u32))
    }
}

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capacities offered in the UI
    pub capacity_presets: Vec<usize>,
    /// Capacity used at startup
    pub default_capacity: usize,
    /// Tag or positional routing
    pub routing: RoutingMode,
    /// If set, fields with other tags are dropped by the parser
    pub allowed_tags: Option<Vec<String>>,
    /// If set, the export log stops recording after this many samples
    pub export_limit: Option<usize>,
    /// Channels registered at startup, in display order
    pub channels: Vec<ChannelConfig>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            capacity_presets: CAPACITY_PRESETS.to_vec(),
            default_capacity: DEFAULT_CAPACITY,
            routing: RoutingMode::ByTag,
            allowed_tags: None,
            export_limit: None,
            channels: (1..=5)
                .map(|i| ChannelConfig::new(format!("ADC{}", i)))
                .collect(),
        }
    }
}

impl CaptureConfig {
    /// Position of `capacity` in the preset list
    pub fn preset_index(&self, capacity: usize) -> Option<usize> {
        self.capacity_presets.iter().position(|&c| c == capacity)
    }
}

// ==================== UI ====================

/// How channels are arranged in the plot area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlotLayout {
    /// All channels in one plot
    #[default]
    Overlay,
    /// One plot per channel, two columns
    Grid,
}

/// Display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub layout: PlotLayout,
    pub show_grid: bool,
    pub show_legend: bool,
    /// Plot line width in pixels
    pub line_width: f32,
    pub dark_mode: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            layout: PlotLayout::Overlay,
            show_grid: true,
            show_legend: true,
            line_width: 2.0,
            dark_mode: true,
        }
    }
}
