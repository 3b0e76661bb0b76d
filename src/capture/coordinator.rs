//! Capture coordinator
//!
//! Owns the pause state, the channel registry and the export log, and is the
//! single entry point for incoming lines. Every failure in the ingestion path
//! is absorbed here: a bad line is counted, logged at trace/debug level and
//! dropped, and the stream carries on.
//!
//! # Routing
//!
//! The routing mode is fixed when the coordinator is built:
//!
//! - [`RoutingMode::ByTag`]: each field goes to the channel whose tag matches;
//!   fields without a matching channel are dropped, the rest of the line is
//!   still routed.
//! - [`RoutingMode::ByPosition`]: field `i` goes to the `i`-th registered
//!   channel regardless of its tag text; fields past the last channel are
//!   dropped.
//!
//! In both modes the export log records the tag as it appeared on the wire.

use crate::capture::export_log::{ExportLog, ExportTable};
use crate::capture::parser::LineParser;
use crate::capture::registry::{Channel, ChannelRegistry};
use crate::config::CaptureConfig;
use crate::error::{Result, SerialVisError};
use crate::types::{CaptureState, CaptureStats, LineOutcome, Sample};
use serde::{Deserialize, Serialize};

/// How parsed fields are matched to channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoutingMode {
    /// Match the field tag against registered channel tags
    #[default]
    #[serde(rename = "tag")]
    ByTag,
    /// Match the field position against registration order
    #[serde(rename = "position")]
    ByPosition,
}

impl std::fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingMode::ByTag => write!(f, "tag"),
            RoutingMode::ByPosition => write!(f, "position"),
        }
    }
}

/// Streaming sample pipeline: parse, gate, route, record
#[derive(Debug)]
pub struct CaptureCoordinator {
    state: CaptureState,
    routing: RoutingMode,
    parser: LineParser,
    registry: ChannelRegistry,
    export_log: ExportLog,
    stats: CaptureStats,
}

impl CaptureCoordinator {
    /// Running coordinator with tag routing, no allow-list and an unbounded
    /// export log
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            state: CaptureState::Running,
            routing: RoutingMode::ByTag,
            parser: LineParser::new(),
            registry: ChannelRegistry::new(capacity)?,
            export_log: ExportLog::new(),
            stats: CaptureStats::default(),
        })
    }

    /// Build a coordinator from configuration and register its channels
    pub fn from_config(config: &CaptureConfig) -> Result<Self> {
        let parser = match &config.allowed_tags {
            Some(tags) => LineParser::with_allowed_tags(tags.iter().cloned()),
            None => LineParser::new(),
        };
        let export_log = match config.export_limit {
            Some(limit) => ExportLog::with_limit(limit),
            None => ExportLog::new(),
        };

        let mut coordinator = Self::new(config.default_capacity)?
            .with_routing(config.routing)
            .with_parser(parser)
            .with_export_log(export_log);

        for (i, channel) in config.channels.iter().enumerate() {
            coordinator.register_channel(channel.tag.clone(), channel.resolved_color(i))?;
        }

        tracing::debug!(
            "Capture configured: {} channels, capacity {}, routing by {}",
            coordinator.registry.len(),
            coordinator.capacity(),
            coordinator.routing
        );
        Ok(coordinator)
    }

    /// Set the routing mode
    pub fn with_routing(mut self, routing: RoutingMode) -> Self {
        self.routing = routing;
        self
    }

    /// Use a specific parser (e.g. one with an allow-list)
    pub fn with_parser(mut self, parser: LineParser) -> Self {
        self.parser = parser;
        self
    }

    /// Use a specific export log (e.g. one with a record limit)
    pub fn with_export_log(mut self, export_log: ExportLog) -> Self {
        self.export_log = export_log;
        self
    }

    /// Register a channel; see [`ChannelRegistry::register`]
    pub fn register_channel(&mut self, tag: impl Into<String>, color: [u8; 4]) -> Result<&Channel> {
        self.registry.register(tag, color)
    }

    // ==================== State machine ====================

    /// Stop routing samples; idempotent
    pub fn pause(&mut self) {
        if self.state == CaptureState::Running {
            tracing::info!("Capture paused");
            self.state = CaptureState::Paused;
        }
    }

    /// Resume routing samples; idempotent
    pub fn resume(&mut self) {
        if self.state == CaptureState::Paused {
            tracing::info!("Capture resumed");
            self.state = CaptureState::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            CaptureState::Running => self.pause(),
            CaptureState::Paused => self.resume(),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == CaptureState::Paused
    }

    /// Reset every channel to an empty buffer of `capacity`
    ///
    /// Pause state and the export log are untouched.
    pub fn change_buffer_capacity(&mut self, capacity: usize) -> Result<()> {
        self.registry.resize_all(capacity)?;
        tracing::info!("Buffer capacity set to {}", capacity);
        Ok(())
    }

    // ==================== Ingestion ====================

    /// Feed raw line bytes as delivered by the transport
    ///
    /// Invalid UTF-8 drops the line. Surrounding whitespace, including any
    /// `\r`/`\n` left by the transport, is trimmed before parsing.
    pub fn on_raw_line(&mut self, raw: &[u8]) -> LineOutcome {
        match std::str::from_utf8(raw) {
            Ok(text) => self.on_line(text.trim()),
            Err(e) => {
                self.stats.lines_received += 1;
                self.stats.lines_undecodable += 1;
                tracing::debug!("{}", SerialVisError::LineDecode(e));
                LineOutcome::Undecodable
            }
        }
    }

    /// Feed one decoded line
    pub fn on_line(&mut self, line: &str) -> LineOutcome {
        self.stats.lines_received += 1;

        if self.is_paused() {
            self.stats.lines_ignored_paused += 1;
            return LineOutcome::Paused;
        }

        let samples = match self.parser.parse_indexed(line) {
            Ok(samples) => samples,
            Err(e) => {
                self.stats.lines_malformed += 1;
                tracing::debug!("Discarding line {:?}: {}", line, e);
                return LineOutcome::Abandoned(e);
            }
        };

        self.stats.lines_accepted += 1;

        let mut routed = 0;
        let mut dropped = 0;
        for (field_index, sample) in samples {
            match self.route(field_index, &sample) {
                Ok(()) => {
                    self.export_log.append(&sample.tag, sample.value);
                    routed += 1;
                }
                Err(e) => {
                    tracing::trace!("Dropping field: {}", e);
                    dropped += 1;
                }
            }
        }

        self.stats.samples_routed += routed as u64;
        self.stats.fields_unrouted += dropped as u64;
        LineOutcome::Accepted { routed, dropped }
    }

    fn route(&mut self, position: usize, sample: &Sample) -> Result<()> {
        let channel = match self.routing {
            RoutingMode::ByTag => self.registry.lookup_by_tag_mut(&sample.tag),
            RoutingMode::ByPosition => self.registry.lookup_by_index_mut(position),
        }
        .map_err(|_| SerialVisError::UnknownTag(sample.tag.clone()))?;

        channel.push(sample.value);
        Ok(())
    }

    // ==================== Read side ====================

    /// Current window of `tag`, oldest first
    pub fn current_series(&self, tag: &str) -> Result<Vec<f64>> {
        Ok(self.registry.lookup_by_tag(tag)?.current_series())
    }

    /// Channels in registration order
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.registry.channels()
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn export_log(&self) -> &ExportLog {
        &self.export_log
    }

    /// Tabular form of the export log; fails with `EmptyExport` if empty
    pub fn export_table(&self) -> Result<ExportTable> {
        self.export_log.to_table()
    }

    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    pub fn routing(&self) -> RoutingMode {
        self.routing
    }

    pub fn stats(&self) -> &CaptureStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: [u8; 4] = [128, 128, 128, 255];

    fn coordinator(tags: &[&str], capacity: usize) -> CaptureCoordinator {
        let mut c = CaptureCoordinator::new(capacity).unwrap();
        for tag in tags {
            c.register_channel(*tag, GRAY).unwrap();
        }
        c
    }

    #[test]
    fn test_initial_state_running() {
        let c = coordinator(&[], 4);
        assert_eq!(c.state(), CaptureState::Running);
        assert_eq!(c.routing(), RoutingMode::ByTag);
    }

    #[test]
    fn test_routes_by_tag() {
        let mut c = coordinator(&["T", "V"], 4);
        let outcome = c.on_line("V:3.3,T:23.5");
        assert_eq!(outcome, LineOutcome::Accepted { routed: 2, dropped: 0 });
        assert_eq!(c.current_series("T").unwrap(), vec![23.5]);
        assert_eq!(c.current_series("V").unwrap(), vec![3.3]);
    }

    #[test]
    fn test_unknown_tag_dropped_rest_of_line_kept() {
        let mut c = coordinator(&["T"], 4);
        let outcome = c.on_line("X:1,T:2");
        assert_eq!(outcome, LineOutcome::Accepted { routed: 1, dropped: 1 });
        assert_eq!(c.current_series("T").unwrap(), vec![2.0]);
        assert_eq!(c.export_log().len(), 1);
        assert_eq!(c.stats().fields_unrouted, 1);
    }

    #[test]
    fn test_malformed_line_has_no_effect() {
        let mut c = coordinator(&["T", "V"], 4);
        let outcome = c.on_line("T:23.5,V:bad");
        assert!(matches!(outcome, LineOutcome::Abandoned(_)));
        assert!(c.current_series("T").unwrap().is_empty());
        assert!(c.export_log().is_empty());
        assert_eq!(c.stats().lines_malformed, 1);
    }

    #[test]
    fn test_pause_is_idempotent_and_gates_everything() {
        let mut c = coordinator(&["T"], 4);
        c.on_line("T:1");
        c.pause();
        c.pause();
        assert!(c.is_paused());

        assert_eq!(c.on_line("T:2"), LineOutcome::Paused);
        assert_eq!(c.current_series("T").unwrap(), vec![1.0]);
        assert_eq!(c.export_log().len(), 1);

        c.resume();
        c.resume();
        c.on_line("T:3");
        assert_eq!(c.current_series("T").unwrap(), vec![1.0, 3.0]);
        assert_eq!(c.stats().lines_ignored_paused, 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut c = coordinator(&[], 4);
        c.toggle_pause();
        assert_eq!(c.state(), CaptureState::Paused);
        c.toggle_pause();
        assert_eq!(c.state(), CaptureState::Running);
    }

    #[test]
    fn test_resize_keeps_export_log_and_pause_state() {
        let mut c = coordinator(&["T"], 4);
        c.on_line("T:1");
        c.on_line("T:2");
        c.pause();

        c.change_buffer_capacity(10).unwrap();

        assert!(c.current_series("T").unwrap().is_empty());
        assert_eq!(c.capacity(), 10);
        assert!(c.is_paused());
        assert_eq!(c.export_log().len(), 2);
    }

    #[test]
    fn test_zero_capacity_resize_rejected() {
        let mut c = coordinator(&["T"], 4);
        c.on_line("T:1");
        assert!(matches!(
            c.change_buffer_capacity(0),
            Err(SerialVisError::InvalidCapacity(0))
        ));
        assert_eq!(c.current_series("T").unwrap(), vec![1.0]);
    }

    #[test]
    fn test_positional_routing_ignores_tag_text() {
        let mut c = coordinator(&["ADC1", "ADC2"], 4).with_routing(RoutingMode::ByPosition);
        let outcome = c.on_line("V:5,T:6,I:7");
        assert_eq!(outcome, LineOutcome::Accepted { routed: 2, dropped: 1 });
        assert_eq!(c.current_series("ADC1").unwrap(), vec![5.0]);
        assert_eq!(c.current_series("ADC2").unwrap(), vec![6.0]);

        // the export log keeps the wire tags
        let tags: Vec<_> = c
            .export_log()
            .snapshot()
            .iter()
            .map(|r| r.channel_tag.as_str())
            .collect();
        assert_eq!(tags, ["V", "T"]);
    }

    #[test]
    fn test_positional_routing_with_allow_list() {
        let mut c = coordinator(&["ADC1", "ADC2", "ADC3", "ADC4"], 4)
            .with_routing(RoutingMode::ByPosition)
            .with_parser(LineParser::with_allowed_tags(["T", "V", "I", "P"]));
        c.on_line("T:1,V:2,I:3,P:4");
        assert_eq!(c.current_series("ADC4").unwrap(), vec![4.0]);
    }

    #[test]
    fn test_raw_line_decoding() {
        let mut c = coordinator(&["T"], 4);
        assert_eq!(c.on_raw_line(b"\xff\xfe:1\n"), LineOutcome::Undecodable);
        assert_eq!(
            c.on_raw_line(b"T:4.5\r\n"),
            LineOutcome::Accepted { routed: 1, dropped: 0 }
        );
        assert_eq!(c.current_series("T").unwrap(), vec![4.5]);
        assert_eq!(c.stats().lines_undecodable, 1);
        assert_eq!(c.stats().lines_received, 2);
    }

    #[test]
    fn test_export_limit_does_not_affect_buffers() {
        let mut c = coordinator(&["T"], 4).with_export_log(ExportLog::with_limit(1));
        c.on_line("T:1");
        c.on_line("T:2");
        assert_eq!(c.current_series("T").unwrap(), vec![1.0, 2.0]);
        assert_eq!(c.export_log().len(), 1);
        assert_eq!(c.export_log().dropped(), 1);
    }

    #[test]
    fn test_current_series_unknown_channel() {
        let c = coordinator(&["T"], 4);
        assert!(matches!(
            c.current_series("X"),
            Err(SerialVisError::NotFound(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = CaptureConfig {
            routing: RoutingMode::ByPosition,
            allowed_tags: Some(vec!["T".to_string(), "V".to_string()]),
            export_limit: Some(3),
            channels: vec![
                crate::config::ChannelConfig::new("ADC1"),
                crate::config::ChannelConfig::new("ADC2").with_color([9, 9, 9, 255]),
            ],
            ..CaptureConfig::default()
        };
        let mut c = CaptureCoordinator::from_config(&config).unwrap();

        assert_eq!(c.capacity(), 1000);
        assert_eq!(c.routing(), RoutingMode::ByPosition);
        assert_eq!(c.registry().lookup_by_index(1).unwrap().color(), [9, 9, 9, 255]);

        c.on_line("T:1,X:2,V:3");
        assert_eq!(c.current_series("ADC1").unwrap(), vec![1.0]);
        assert!(c.current_series("ADC2").unwrap().is_empty());
        assert_eq!(c.export_log().limit(), Some(3));
    }

    #[test]
    fn test_from_config_rejects_duplicate_channels() {
        let config = CaptureConfig {
            channels: vec![
                crate::config::ChannelConfig::new("T"),
                crate::config::ChannelConfig::new("T"),
            ],
            ..CaptureConfig::default()
        };
        assert!(matches!(
            CaptureCoordinator::from_config(&config),
            Err(SerialVisError::DuplicateTag(_))
        ));
    }

    #[test]
    fn test_routing_mode_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            routing: RoutingMode,
        }
        let w: Wrapper = toml::from_str("routing = \"position\"").unwrap();
        assert_eq!(w.routing, RoutingMode::ByPosition);
        assert_eq!(RoutingMode::ByTag.to_string(), "tag");
    }
}
