//! Test data builders for creating test objects

use serialvis_rs::capture::{CaptureCoordinator, ExportLog, LineParser, RoutingMode};

/// Builder for creating test coordinators
pub struct CoordinatorBuilder {
    capacity: usize,
    channels: Vec<String>,
    routing: RoutingMode,
    allowed_tags: Option<Vec<String>>,
    export_limit: Option<usize>,
}

impl CoordinatorBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            channels: Vec::new(),
            routing: RoutingMode::ByTag,
            allowed_tags: None,
            export_limit: None,
        }
    }

    pub fn channel(mut self, tag: &str) -> Self {
        self.channels.push(tag.to_string());
        self
    }

    pub fn channels(mut self, tags: &[&str]) -> Self {
        self.channels.extend(tags.iter().map(|t| t.to_string()));
        self
    }

    pub fn routing(mut self, routing: RoutingMode) -> Self {
        self.routing = routing;
        self
    }

    pub fn allowed_tags(mut self, tags: &[&str]) -> Self {
        self.allowed_tags = Some(tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn export_limit(mut self, limit: usize) -> Self {
        self.export_limit = Some(limit);
        self
    }

    pub fn build(self) -> CaptureCoordinator {
        let mut coordinator = CaptureCoordinator::new(self.capacity)
            .unwrap()
            .with_routing(self.routing);

        if let Some(tags) = self.allowed_tags {
            coordinator = coordinator.with_parser(LineParser::with_allowed_tags(tags));
        }
        if let Some(limit) = self.export_limit {
            coordinator = coordinator.with_export_log(ExportLog::with_limit(limit));
        }

        for (i, tag) in self.channels.iter().enumerate() {
            coordinator
                .register_channel(tag.as_str(), serialvis_rs::types::generate_color(i as u32))
                .unwrap();
        }
        coordinator
    }
}

/// Build `count` lines of the form `T:<i>,V:<i * 0.5>`
pub fn numbered_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("T:{},V:{}", i, i as f64 * 0.5))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinator_builder() {
        let coordinator = CoordinatorBuilder::new(4)
            .channels(&["T", "V"])
            .routing(RoutingMode::ByPosition)
            .build();

        assert_eq!(coordinator.capacity(), 4);
        assert_eq!(coordinator.routing(), RoutingMode::ByPosition);
        assert_eq!(coordinator.registry().len(), 2);
    }
}
