//! Reader thread
//!
//! The worker owns a [`LineSource`] and forwards complete lines to the UI
//! thread in batches. Nothing here touches the capture pipeline: raw lines
//! cross the channel and the UI thread decodes, parses and routes them.

use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::{LineSource, TransportEvent};
use crate::error::{Result, SerialVisError};

/// Most lines forwarded in one `TransportEvent::Lines`
const MAX_BATCH: usize = 256;

/// How long a send may block before the running flag is re-checked
const SEND_TIMEOUT: Duration = Duration::from_millis(50);

/// Loop that polls a line source until stopped or closed
pub struct TransportWorker {
    source: Box<dyn LineSource>,
    event_tx: Sender<TransportEvent>,
    running: Arc<AtomicBool>,
}

impl TransportWorker {
    pub fn new(
        source: Box<dyn LineSource>,
        event_tx: Sender<TransportEvent>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            event_tx,
            running,
        }
    }

    /// Run until the source closes, fails, or the running flag is cleared
    pub fn run(&mut self) {
        tracing::info!("Transport worker started on {}", self.source.describe());

        while self.running.load(Ordering::SeqCst) {
            match self.source.can_read_line() {
                Ok(true) => {
                    let batch = self.collect_batch();
                    if !batch.is_empty() && !self.send(TransportEvent::Lines(batch)) {
                        break;
                    }
                }
                Ok(false) => {
                    if self.source.is_closed() {
                        tracing::info!("{} closed", self.source.describe());
                        self.send(TransportEvent::Closed);
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Transport error on {}: {}", self.source.describe(), e);
                    self.send(TransportEvent::Error(e.to_string()));
                    self.send(TransportEvent::Closed);
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Transport worker stopped");
    }

    fn collect_batch(&mut self) -> Vec<Vec<u8>> {
        let mut batch = Vec::new();
        while batch.len() < MAX_BATCH {
            match self.source.read_line() {
                Some(line) => batch.push(line),
                None => break,
            }
        }
        batch
    }

    /// Blocking send that gives up only when stopped or disconnected
    fn send(&self, mut event: TransportEvent) -> bool {
        loop {
            match self.event_tx.send_timeout(event, SEND_TIMEOUT) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(e)) => {
                    if !self.running.load(Ordering::SeqCst) {
                        return false;
                    }
                    event = e;
                }
                Err(SendTimeoutError::Disconnected(_)) => {
                    tracing::debug!("Event receiver dropped, stopping transport");
                    return false;
                }
            }
        }
    }
}

/// UI-side end of a running transport
pub struct TransportHandle {
    receiver: Receiver<TransportEvent>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    description: String,
}

impl TransportHandle {
    /// Spawn a reader thread for `source`
    ///
    /// `channel_capacity` bounds the number of undelivered batches; when the
    /// UI falls behind the reader blocks instead of dropping lines.
    pub fn spawn(source: Box<dyn LineSource>, channel_capacity: usize) -> Result<Self> {
        let description = source.describe();
        let (event_tx, event_rx) = bounded(channel_capacity.max(1));
        let running = Arc::new(AtomicBool::new(true));

        let mut worker = TransportWorker::new(source, event_tx, running.clone());
        let thread = std::thread::Builder::new()
            .name("transport".to_string())
            .spawn(move || worker.run())
            .map_err(|e| SerialVisError::Transport(format!("Failed to spawn reader thread: {}", e)))?;

        Ok(Self {
            receiver: event_rx,
            running,
            thread: Some(thread),
            description,
        })
    }

    /// Every event delivered so far, without blocking
    pub fn drain(&self) -> Vec<TransportEvent> {
        self.receiver.try_iter().collect()
    }

    /// Block until the next event, for tests and headless drivers
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TransportEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Ask the reader to stop and wait for it
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Transport thread panicked");
            }
        }
    }
}

impl Drop for TransportHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
