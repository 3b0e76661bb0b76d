//! Channel registry
//!
//! Owns one [`RingBuffer`] per channel. All channels share the registry's
//! capacity; resizing replaces every buffer with a fresh empty one.
//! Registration order is kept because it is the display order and, in
//! positional routing, the field order.

use crate::capture::ring_buffer::RingBuffer;
use crate::error::{Result, SerialVisError};
use std::collections::HashMap;

/// One sensor stream
#[derive(Debug, Clone)]
pub struct Channel {
    tag: String,
    color: [u8; 4],
    buffer: RingBuffer,
}

impl Channel {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// RGBA display colour; not used by the pipeline itself
    pub fn color(&self) -> [u8; 4] {
        self.color
    }

    pub fn buffer(&self) -> &RingBuffer {
        &self.buffer
    }

    /// Current window, oldest first
    pub fn current_series(&self) -> Vec<f64> {
        self.buffer.read_ordered()
    }

    pub(crate) fn push(&mut self, value: f64) {
        self.buffer.push(value);
    }
}

/// Tag → channel map with insertion order
#[derive(Debug, Clone)]
pub struct ChannelRegistry {
    capacity: usize,
    channels: Vec<Channel>,
    index: HashMap<String, usize>,
}

impl ChannelRegistry {
    /// Empty registry whose channels will hold `capacity` samples
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SerialVisError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            channels: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Add a channel with an empty buffer of the current capacity
    pub fn register(&mut self, tag: impl Into<String>, color: [u8; 4]) -> Result<&Channel> {
        let tag = tag.into();
        if self.index.contains_key(&tag) {
            return Err(SerialVisError::DuplicateTag(tag));
        }

        let channel = Channel {
            tag: tag.clone(),
            color,
            buffer: RingBuffer::new(self.capacity)?,
        };
        let position = self.channels.len();
        self.channels.push(channel);
        self.index.insert(tag, position);
        Ok(&self.channels[position])
    }

    pub fn lookup_by_tag(&self, tag: &str) -> Result<&Channel> {
        self.index
            .get(tag)
            .map(|&i| &self.channels[i])
            .ok_or_else(|| SerialVisError::NotFound(tag.to_string()))
    }

    pub fn lookup_by_index(&self, index: usize) -> Result<&Channel> {
        self.channels
            .get(index)
            .ok_or_else(|| SerialVisError::NotFound(format!("index {}", index)))
    }

    pub(crate) fn lookup_by_tag_mut(&mut self, tag: &str) -> Result<&mut Channel> {
        match self.index.get(tag) {
            Some(&i) => Ok(&mut self.channels[i]),
            None => Err(SerialVisError::NotFound(tag.to_string())),
        }
    }

    pub(crate) fn lookup_by_index_mut(&mut self, index: usize) -> Result<&mut Channel> {
        self.channels
            .get_mut(index)
            .ok_or_else(|| SerialVisError::NotFound(format!("index {}", index)))
    }

    /// Replace every buffer with an empty one of `capacity`
    ///
    /// History is discarded, not migrated. On error nothing changes.
    pub fn resize_all(&mut self, capacity: usize) -> Result<()> {
        let fresh = RingBuffer::new(capacity)?;
        for channel in &mut self.channels {
            channel.buffer = fresh.clone();
        }
        self.capacity = capacity;
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Channels in registration order
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.tag.as_str())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn registry_with(tags: &[&str], capacity: usize) -> ChannelRegistry {
        let mut registry = ChannelRegistry::new(capacity).unwrap();
        for tag in tags {
            registry.register(*tag, WHITE).unwrap();
        }
        registry
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = registry_with(&["T", "V"], 10);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup_by_tag("V").unwrap().tag(), "V");
        assert_eq!(registry.lookup_by_index(0).unwrap().tag(), "T");
        assert_eq!(registry.lookup_by_tag("T").unwrap().buffer().capacity(), 10);
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let mut registry = registry_with(&["T"], 10);
        let err = registry.register("T", WHITE).unwrap_err();
        assert!(matches!(err, SerialVisError::DuplicateTag(tag) if tag == "T"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_not_found() {
        let registry = registry_with(&["T"], 10);
        assert!(matches!(
            registry.lookup_by_tag("X"),
            Err(SerialVisError::NotFound(_))
        ));
        assert!(matches!(
            registry.lookup_by_index(1),
            Err(SerialVisError::NotFound(_))
        ));
    }

    #[test]
    fn test_zero_capacity_registry_rejected() {
        assert!(ChannelRegistry::new(0).is_err());
    }

    #[test]
    fn test_registration_order_preserved() {
        let registry = registry_with(&["ADC3", "ADC1", "ADC2"], 4);
        let tags: Vec<_> = registry.tags().collect();
        assert_eq!(tags, ["ADC3", "ADC1", "ADC2"]);
    }

    #[test]
    fn test_resize_discards_history() {
        let mut registry = registry_with(&["A", "B"], 4);
        registry.lookup_by_tag_mut("A").unwrap().push(1.0);
        registry.lookup_by_tag_mut("B").unwrap().push(2.0);

        registry.resize_all(8).unwrap();

        assert_eq!(registry.capacity(), 8);
        for channel in registry.channels() {
            assert!(channel.current_series().is_empty());
            assert_eq!(channel.buffer().capacity(), 8);
        }
    }

    #[test]
    fn test_failed_resize_changes_nothing() {
        let mut registry = registry_with(&["A"], 4);
        registry.lookup_by_tag_mut("A").unwrap().push(1.0);

        assert!(registry.resize_all(0).is_err());
        assert_eq!(registry.capacity(), 4);
        assert_eq!(registry.lookup_by_tag("A").unwrap().current_series(), vec![1.0]);
    }

    #[test]
    fn test_register_after_resize_uses_new_capacity() {
        let mut registry = registry_with(&["A"], 4);
        registry.resize_all(16).unwrap();
        let channel = registry.register("B", WHITE).unwrap();
        assert_eq!(channel.buffer().capacity(), 16);
    }
}
