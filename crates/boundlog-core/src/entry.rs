//! Log record types.
//!
//! A [`LogRecord`] is the in-memory event handed to a formatter. A
//! [`LogEntry`] is the fixed JSON shape of one line in a JSON-lines file.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::Level;

/// Key/value context attached to records.
///
/// Iteration is key-sorted so rendering is deterministic.
pub type Metadata = BTreeMap<String, String>;

/// Merge call-site metadata over persistent metadata.
///
/// Returns a new map; call-site keys win on conflict.
pub fn merge_metadata(persistent: &Metadata, call_site: &Metadata) -> Metadata {
    let mut merged = persistent.clone();
    merged.extend(call_site.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Render metadata as space-separated `key=value` pairs.
///
/// Returns `None` for an empty map so callers can omit the segment.
pub fn render_metadata(metadata: &Metadata) -> Option<String> {
    if metadata.is_empty() {
        return None;
    }
    let pairs: Vec<String> = metadata.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    Some(pairs.join(" "))
}

/// A single structured log event.
///
/// Built per log call and consumed immediately by a formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    /// Source label of the logger that produced the record
    pub label: String,
    pub metadata: Metadata,
    pub message: String,
}

impl LogRecord {
    /// Create a new record stamped with the current time and no metadata.
    pub fn new(level: Level, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            label: label.into(),
            metadata: Metadata::new(),
            message: message.into(),
        }
    }

    /// Replace the record's metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// One line of a JSON-lines log file.
///
/// Metadata is folded into `message` so the shape never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 timestamp (e.g., "2026-10-16T07:30:45.123Z")
    #[serde(with = "rfc3339_millis")]
    pub date: DateTime<Utc>,

    pub level: Level,

    /// Source label of the logger
    pub category: String,

    pub message: String,
}

impl LogEntry {
    /// Flatten a record into the on-disk JSON shape.
    pub fn from_record(record: &LogRecord) -> Self {
        Self::with_rendered_metadata(record, render_metadata(&record.metadata).as_deref())
    }

    /// Like [`LogEntry::from_record`], with the metadata already rendered.
    pub(crate) fn with_rendered_metadata(record: &LogRecord, rendered: Option<&str>) -> Self {
        let message = match rendered {
            Some(meta) => format!("{} {}", meta, record.message),
            None => record.message.clone(),
        };
        Self {
            date: record.timestamp,
            level: record.level,
            category: record.label.clone(),
            message,
        }
    }

    /// Serialize to a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from a JSON line.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Millisecond-precision RFC 3339 encoding, so a decoded date compares
/// equal to the value that was written.
mod rfc3339_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|d| d.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
