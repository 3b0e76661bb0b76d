//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use std::time::Duration;

use serialvis_rs::transport::{TransportEvent, TransportHandle};

/// Upper bound for waiting on the reader thread
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Assert two series are element-wise approximately equal
pub fn assert_series_eq(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Series length mismatch: {:?} vs {:?}",
        actual,
        expected
    );
    for (a, b) in actual.iter().zip(expected) {
        assert_float_eq(*a, *b, epsilon);
    }
}

/// Collect every line a transport delivers until it closes
///
/// Panics on a transport error or if the source does not close in time.
pub fn collect_until_closed(handle: &TransportHandle) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    loop {
        match handle.recv_timeout(test_timeout()) {
            Some(TransportEvent::Lines(batch)) => lines.extend(batch),
            Some(TransportEvent::Closed) => return lines,
            Some(TransportEvent::Error(e)) => panic!("Transport error: {}", e),
            None => panic!("Transport did not close within {:?}", test_timeout()),
        }
    }
}
