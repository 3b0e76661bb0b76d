//! Serial port line source

use std::time::Duration;

use serialport::SerialPort;

use super::reader::ReaderLineSource;
use super::LineSource;
use crate::config::SerialConfig;
use crate::error::{Result, ResultExt, SerialVisError};

/// Serial port framed into lines
///
/// The port is opened with a short read timeout so the reader thread can
/// notice a stop request; a timeout is reported as "no line yet".
pub struct SerialLineSource {
    inner: ReaderLineSource<Box<dyn SerialPort>>,
    baud_rate: u32,
}

impl SerialLineSource {
    /// Open the configured port
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .open()
            .map_err(SerialVisError::from)
            .with_context(|| format!("Failed to open serial port '{}'", config.port))?;

        tracing::info!("Opened {} at {} baud", config.port, config.baud_rate);

        Ok(Self {
            inner: ReaderLineSource::new(port, config.max_line_len, config.port.clone()),
            baud_rate: config.baud_rate,
        })
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl LineSource for SerialLineSource {
    fn can_read_line(&mut self) -> Result<bool> {
        self.inner.can_read_line()
    }

    fn read_line(&mut self) -> Option<Vec<u8>> {
        self.inner.read_line()
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn describe(&self) -> String {
        format!("{} @ {} baud", self.inner.describe(), self.baud_rate)
    }
}

/// Names of the serial ports the OS reports, for diagnostics
pub fn available_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            tracing::debug!("Could not enumerate serial ports: {}", e);
            Vec::new()
        }
    }
}
