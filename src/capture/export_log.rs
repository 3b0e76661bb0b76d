//! Append-only export log and its tabular/CSV form
//!
//! The log keeps every accepted sample in arrival order, independently of
//! the rolling buffers, so a resize never loses exportable history. It is
//! unbounded unless a record limit is given; at the limit new records are
//! refused and counted, the existing prefix is never rewritten.

use crate::error::{Result, SerialVisError};
use crate::types::ExportRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column headers of the exported table
pub const EXPORT_HEADER: [&str; 2] = ["Sensor", "Value"];

/// Ordered record of accepted samples
#[derive(Debug, Clone, Default)]
pub struct ExportLog {
    records: Vec<ExportRecord>,
    limit: Option<usize>,
    dropped: u64,
}

impl ExportLog {
    /// Unbounded log
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that stops accepting records after `limit` entries
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Append a record; returns false if the limit refused it
    pub fn append(&mut self, channel_tag: &str, value: f64) -> bool {
        if let Some(limit) = self.limit {
            if self.records.len() >= limit {
                if self.dropped == 0 {
                    tracing::warn!(
                        "Export log reached its limit of {} records; further samples are not recorded",
                        limit
                    );
                }
                self.dropped += 1;
                return false;
            }
        }
        self.records.push(ExportRecord::new(channel_tag, value));
        true
    }

    /// All records in arrival order
    pub fn snapshot(&self) -> &[ExportRecord] {
        &self.records
    }

    /// Header plus one row per record
    pub fn to_table(&self) -> Result<ExportTable> {
        if self.records.is_empty() {
            return Err(SerialVisError::EmptyExport);
        }
        Ok(ExportTable {
            rows: self
                .records
                .iter()
                .map(|r| [r.channel_tag.clone(), r.value.to_string()])
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Records refused because the limit was reached
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Two-column table handed to the export sink
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    rows: Vec<[String; 2]>,
}

impl ExportTable {
    pub fn header(&self) -> [&'static str; 2] {
        EXPORT_HEADER
    }

    /// Data rows, without the header
    pub fn rows(&self) -> &[[String; 2]] {
        &self.rows
    }

    /// Write as CSV (`Sensor,Value` header) to any writer
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(EXPORT_HEADER)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write as CSV to `path`, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            SerialVisError::Io(e).with_context(format!("Failed to create {:?}", path))
        })?;
        self.write_csv(BufWriter::new(file))?;
        tracing::info!("Exported {} records to {:?}", self.rows.len(), path);
        Ok(())
    }
}

/// Suggested file name for an export started now
pub fn default_export_filename() -> String {
    format!("capture_{}.csv", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}
