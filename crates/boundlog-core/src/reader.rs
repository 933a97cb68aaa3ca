//! Reading JSON-lines bounded log files back for inspection.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::entry::LogEntry;
use crate::error::LogFileResult;

/// The decoded contents of a JSON-lines log file, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFile {
    pub entries: Vec<LogEntry>,
}

impl LogFile {
    /// Read and decode the file at `path`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected, so a write cut off
    /// mid-character only costs the last line.
    pub fn read(path: impl AsRef<Path>) -> LogFileResult<Self> {
        let bytes = fs::read(path.as_ref())?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Decode JSON-lines text, skipping lines that are not valid entries.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .split('\n')
            .enumerate()
            .filter_map(|(index, line)| {
                let line = line.trim();
                if line.is_empty() {
                    return None;
                }
                match LogEntry::from_json_line(line) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        debug!(line = index + 1, error = %e, "Skipping undecodable log line");
                        None
                    }
                }
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for LogFile {
    type Item = LogEntry;
    type IntoIter = std::vec::IntoIter<LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Read every decodable entry from a JSON-lines log file, in file order.
pub fn read_all(path: impl AsRef<Path>) -> LogFileResult<Vec<LogEntry>> {
    Ok(LogFile::read(path)?.entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use tempfile::TempDir;

    const GOOD: &str = r#"{"date":"2026-10-16T07:30:45.000Z","level":"error","category":"Test","message":"one"}"#;
    const GOOD2: &str = r#"{"date":"2026-10-16T07:30:46.000Z","level":"info","category":"Test","message":"two"}"#;

    #[test]
    fn test_parse_keeps_file_order() {
        let log = LogFile::parse(&format!("{}\n{}\n", GOOD, GOOD2));

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries[0].message, "one");
        assert_eq!(log.entries[0].level, Level::Error);
        assert_eq!(log.entries[1].message, "two");
    }

    #[test]
    fn test_parse_skips_truncated_trailing_line() {
        let log = LogFile::parse(&format!("{}\n{}\n{{\"date\":\"2026-10-", GOOD, GOOD2));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_parse_skips_garbage_in_the_middle() {
        let log = LogFile::parse(&format!("{}\nnot json\n\n{}\n", GOOD, GOOD2));
        let messages: Vec<_> = log.into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["one", "two"]);
    }

    #[test]
    fn test_read_tolerates_invalid_utf8_tail() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.jsonl");
        let mut bytes = format!("{}\n", GOOD).into_bytes();
        bytes.extend_from_slice(&[b'{', 0xE2, 0x82]);
        fs::write(&path, bytes).unwrap();

        let entries = read_all(&path).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(read_all(temp.path().join("missing.jsonl")).is_err());
    }
}
