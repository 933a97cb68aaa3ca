//! Record formatters.
//!
//! Both formats produce exactly one `\n`-terminated line per record.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::entry::{render_metadata, LogEntry, LogRecord};
use crate::error::LogFileResult;

/// Local wall-clock time with numeric UTC offset, second precision.
const PLAIN_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%z";

/// How records are rendered into the bounded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// `TIMESTAMP LEVEL LABEL :[ metadata] MESSAGE`
    #[default]
    Plain,
    /// One `{date, level, category, message}` object per line
    Json,
}

impl RecordFormat {
    /// Render a record as bytes, including the trailing newline.
    pub fn encode(&self, record: &LogRecord) -> LogFileResult<Vec<u8>> {
        let rendered = render_metadata(&record.metadata);
        self.encode_prerendered(record, rendered.as_deref())
    }

    /// Encode with the metadata segment already rendered.
    ///
    /// Handlers cache the rendering of their persistent metadata;
    /// `record.metadata` is ignored in favour of `rendered`.
    pub(crate) fn encode_prerendered(
        &self,
        record: &LogRecord,
        rendered: Option<&str>,
    ) -> LogFileResult<Vec<u8>> {
        match self {
            RecordFormat::Plain => Ok(plain_line(record, rendered).into_bytes()),
            RecordFormat::Json => {
                let mut line = serde_json::to_vec(&LogEntry::with_rendered_metadata(record, rendered))?;
                line.push(b'\n');
                Ok(line)
            }
        }
    }
}

impl std::str::FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(RecordFormat::Plain),
            "json" | "jsonl" => Ok(RecordFormat::Json),
            _ => Err(format!("Invalid format '{}'. Must be one of: plain, json", s)),
        }
    }
}

fn plain_line(record: &LogRecord, rendered: Option<&str>) -> String {
    let timestamp = record.timestamp.with_timezone(&Local).format(PLAIN_TIMESTAMP);
    let meta = rendered.map(|m| format!(" {}", m)).unwrap_or_default();
    format!(
        "{} {} {} :{} {}\n",
        timestamp, record.level, record.label, meta, record.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Metadata;
    use crate::level::Level;
    use chrono::{TimeZone, Utc};

    fn record() -> LogRecord {
        LogRecord::new(Level::Error, "Test", "Test Test Test")
            .at(Utc.with_ymd_and_hms(2026, 10, 16, 7, 30, 45).unwrap())
    }

    fn local_stamp(record: &LogRecord) -> String {
        record
            .timestamp
            .with_timezone(&Local)
            .format(PLAIN_TIMESTAMP)
            .to_string()
    }

    #[test]
    fn test_plain_without_metadata() {
        let record = record();
        let line = String::from_utf8(RecordFormat::Plain.encode(&record).unwrap()).unwrap();
        assert_eq!(line, format!("{} error Test : Test Test Test\n", local_stamp(&record)));
    }

    #[test]
    fn test_plain_with_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("user".into(), "ana".into());
        metadata.insert("request".into(), "42".into());
        let record = record().with_metadata(metadata);

        let line = String::from_utf8(RecordFormat::Plain.encode(&record).unwrap()).unwrap();
        assert_eq!(
            line,
            format!("{} error Test : request=42 user=ana Test Test Test\n", local_stamp(&record))
        );
    }

    #[test]
    fn test_plain_timestamp_has_numeric_offset() {
        let record = record();
        let stamp = local_stamp(&record);
        // 2026-10-16T09:30:45+0200
        assert_eq!(stamp.len(), 24);
        assert!(stamp[19..].starts_with('+') || stamp[19..].starts_with('-'));
    }

    #[test]
    fn test_json_is_single_line() {
        let record = record();
        let bytes = RecordFormat::Json.encode(&record).unwrap();
        let line = String::from_utf8(bytes).unwrap();

        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.contains("\"level\":\"error\""));
        assert!(line.contains("\"category\":\"Test\""));
        assert!(line.contains("\"message\":\"Test Test Test\""));
    }

    #[test]
    fn test_json_escapes_embedded_newlines() {
        let record = LogRecord::new(Level::Info, "Test", "first\nsecond");
        let line = RecordFormat::Json.encode(&record).unwrap();
        assert_eq!(line.iter().filter(|b| **b == b'\n').count(), 1);
    }

    #[test]
    fn test_prerendered_matches_encode() {
        let mut metadata = Metadata::new();
        metadata.insert("k".into(), "v".into());
        let record = record().with_metadata(metadata);

        for format in [RecordFormat::Plain, RecordFormat::Json] {
            assert_eq!(
                format.encode(&record).unwrap(),
                format.encode_prerendered(&record, Some("k=v")).unwrap()
            );
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<RecordFormat>().unwrap(), RecordFormat::Json);
        assert_eq!("plain".parse::<RecordFormat>().unwrap(), RecordFormat::Plain);
        assert!("xml".parse::<RecordFormat>().is_err());
    }
}
