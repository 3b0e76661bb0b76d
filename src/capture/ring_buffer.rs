//! Fixed-capacity rolling sample store
//!
//! Storage is a flat `Vec<f64>` of length `capacity` with a write cursor.
//! Once the cursor wraps for the first time the buffer is full and every
//! push overwrites the oldest sample. Read-out rotates the circular layout
//! back into chronological order (oldest first).

use crate::error::{Result, SerialVisError};

/// Rolling window of the most recent `capacity` samples
#[derive(Debug, Clone)]
pub struct RingBuffer {
    storage: Vec<f64>,
    write_index: usize,
    full: bool,
}

impl RingBuffer {
    /// Create an empty buffer; capacity 0 is rejected
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SerialVisError::InvalidCapacity(capacity));
        }
        Ok(Self {
            storage: vec![0.0; capacity],
            write_index: 0,
            full: false,
        })
    }

    /// Store `value`, overwriting the oldest sample once full
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.storage[self.write_index] = value;
        self.write_index = (self.write_index + 1) % self.storage.len();
        if self.write_index == 0 {
            self.full = true;
        }
    }

    /// Valid samples, oldest first
    pub fn read_ordered(&self) -> Vec<f64> {
        if self.full {
            let mut out = Vec::with_capacity(self.storage.len());
            out.extend_from_slice(&self.storage[self.write_index..]);
            out.extend_from_slice(&self.storage[..self.write_index]);
            out
        } else {
            self.storage[..self.write_index].to_vec()
        }
    }

    /// Chronological iterator that does not allocate
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let (older, newer) = if self.full {
            (&self.storage[self.write_index..], &self.storage[..self.write_index])
        } else {
            (&self.storage[..self.write_index], &self.storage[..0])
        };
        older.iter().chain(newer.iter()).copied()
    }

    /// Most recently pushed value
    pub fn latest(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let cap = self.storage.len();
        Some(self.storage[(self.write_index + cap - 1) % cap])
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of logically valid samples
    pub fn len(&self) -> usize {
        if self.full {
            self.storage.len()
        } else {
            self.write_index
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the write cursor has wrapped at least once
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Forget all samples, keeping the capacity
    pub fn clear(&mut self) {
        self.write_index = 0;
        self.full = false;
    }
}
