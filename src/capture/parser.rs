//! Line protocol parser
//!
//! Wire format, one reading per line:
//!
//! ```text
//! TAG:VALUE(,TAG:VALUE)*        e.g.  T:23.5,V:3.30,I:0.12,P:0.40
//! ```
//!
//! Whitespace around tags and values is ignored. Parsing is all-or-nothing
//! per line: the first malformed field abandons the whole line and no
//! partial result is produced. An optional allow-list silently drops
//! well-formed fields whose tag is not listed, without abandoning the line.

use crate::types::Sample;
use std::collections::HashSet;
use thiserror::Error;

/// Why a line was abandoned
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Field has no `:` separating tag and value
    #[error("field {field:?} has no ':' separator")]
    MissingSeparator { field: String },

    /// Tag is empty after trimming
    #[error("field {field:?} has an empty tag")]
    EmptyTag { field: String },

    /// Value is not a floating-point literal
    #[error("field {field:?} has non-numeric value {value:?}")]
    InvalidValue { field: String, value: String },
}

/// Parses protocol lines into samples
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    allowed_tags: Option<HashSet<String>>,
}

impl LineParser {
    /// Parser that accepts any tag
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that keeps only fields whose tag is in `tags`
    pub fn with_allowed_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_tags: Some(tags.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether an allow-list is active
    pub fn is_filtering(&self) -> bool {
        self.allowed_tags.is_some()
    }

    /// Whether `tag` passes the allow-list (always true without one)
    pub fn is_allowed(&self, tag: &str) -> bool {
        self.allowed_tags
            .as_ref()
            .map_or(true, |allowed| allowed.contains(tag))
    }

    /// Parse one line that has already been decoded and stripped of its
    /// terminator
    ///
    /// Returns every accepted `(tag, value)` pair in field order, or the first
    /// malformed field. With an allow-list the result may be empty even
    /// though the line was well-formed.
    pub fn parse(&self, line: &str) -> Result<Vec<Sample>, ParseError> {
        Ok(self
            .parse_indexed(line)?
            .into_iter()
            .map(|(_, sample)| sample)
            .collect())
    }

    /// Like [`parse`](Self::parse), but each sample carries the index of its
    /// field in the raw line
    ///
    /// Indices count every field, including those dropped by the
    /// allow-list, so they stay aligned with the sender's field order.
    pub fn parse_indexed(&self, line: &str) -> Result<Vec<(usize, Sample)>, ParseError> {
        let mut samples = Vec::new();
        for (index, field) in line.split(',').enumerate() {
            let sample = parse_field(field)?;
            if self.is_allowed(&sample.tag) {
                samples.push((index, sample));
            } else {
                tracing::trace!("Dropping field with unlisted tag {:?}", sample.tag);
            }
        }
        Ok(samples)
    }
}

fn parse_field(field: &str) -> Result<Sample, ParseError> {
    let Some((tag, value)) = field.split_once(':') else {
        return Err(ParseError::MissingSeparator {
            field: field.to_string(),
        });
    };

    let tag = tag.trim();
    if tag.is_empty() {
        return Err(ParseError::EmptyTag {
            field: field.to_string(),
        });
    }

    let value_text = value.trim();
    let value = value_text
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidValue {
            field: field.to_string(),
            value: value_text.to_string(),
        })?;

    Ok(Sample::new(tag, value))
}
