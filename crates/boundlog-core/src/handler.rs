//! Per-label log handlers sharing one bounded file.
//!
//! [`FileLogging`] owns an `Arc<BoundedFile>` and hands out
//! [`FileLogHandler`]s, one per logger label. Every handler created from
//! the same `FileLogging` appends to the same physical file.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use crate::config::LoggingBuilder;
use crate::entry::{merge_metadata, render_metadata, LogRecord, Metadata};
use crate::error::LogFileResult;
use crate::format::RecordFormat;
use crate::level::Level;
use crate::writer::BoundedFile;

/// Default number of lines retained in a bounded log file.
pub const DEFAULT_MAX_ENTRIES: usize = 2000;

/// Factory for handlers writing to one bounded file.
///
/// Cloning is cheap and clones share the underlying file.
#[derive(Debug, Clone)]
pub struct FileLogging {
    file: Arc<BoundedFile>,
    format: RecordFormat,
    level: Level,
    metadata: Metadata,
}

impl FileLogging {
    /// Open a plain-text bounded log at `path` keeping [`DEFAULT_MAX_ENTRIES`] lines.
    pub fn open(path: impl AsRef<Path>) -> LogFileResult<Self> {
        Self::builder(path).open()
    }

    /// Open a JSON-lines bounded log at `path` keeping [`DEFAULT_MAX_ENTRIES`] lines.
    pub fn open_json(path: impl AsRef<Path>) -> LogFileResult<Self> {
        Self::builder(path).format(RecordFormat::Json).open()
    }

    /// Start configuring a bounded log at `path`.
    pub fn builder(path: impl AsRef<Path>) -> LoggingBuilder {
        LoggingBuilder::new(path.as_ref())
    }

    /// Wrap an already open bounded file.
    pub fn from_file(file: Arc<BoundedFile>, format: RecordFormat) -> Self {
        Self {
            file,
            format,
            level: Level::default(),
            metadata: Metadata::new(),
        }
    }

    /// Threshold given to new handlers.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Metadata every new handler starts with.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Create a handler for the logger named `label`.
    pub fn handler(&self, label: impl Into<String>) -> FileLogHandler {
        let mut handler = FileLogHandler::new(label, Arc::clone(&self.file), self.format);
        handler.log_level = self.level;
        handler.replace_metadata(self.metadata.clone());
        handler
    }

    /// Open a plain-text file and return a handler for `label` in one step.
    pub fn logger(
        label: impl Into<String>,
        path: impl AsRef<Path>,
        max_entries: usize,
    ) -> LogFileResult<FileLogHandler> {
        let logging = Self::builder(path).max_entries(max_entries).open()?;
        Ok(logging.handler(label))
    }

    /// The shared bounded file, for `truncate` and `clear`.
    pub fn file(&self) -> &Arc<BoundedFile> {
        &self.file
    }

    pub fn format(&self) -> RecordFormat {
        self.format
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

/// A labelled logger that formats records and appends them to a shared
/// bounded file.
///
/// Logging is best effort: [`FileLogHandler::log`] never fails or
/// panics, a record that cannot be written is dropped.
#[derive(Debug, Clone)]
pub struct FileLogHandler {
    file: Arc<BoundedFile>,
    label: String,
    format: RecordFormat,
    log_level: Level,
    metadata: Metadata,
    /// Rendering of `metadata`, refreshed on every mutation
    pretty_metadata: Option<String>,
}

impl FileLogHandler {
    /// Create a handler over a shared bounded file.
    pub fn new(label: impl Into<String>, file: Arc<BoundedFile>, format: RecordFormat) -> Self {
        Self {
            file,
            label: label.into(),
            format,
            log_level: Level::default(),
            metadata: Metadata::new(),
            pretty_metadata: None,
        }
    }

    /// Create a plain-text handler with its own bounded file.
    pub fn open(
        label: impl Into<String>,
        path: impl AsRef<Path>,
        max_entries: usize,
    ) -> LogFileResult<Self> {
        let file = BoundedFile::open(path, max_entries)?;
        Ok(Self::new(label, Arc::new(file), RecordFormat::Plain))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn file(&self) -> &Arc<BoundedFile> {
        &self.file
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }

    pub fn set_log_level(&mut self, level: Level) {
        self.log_level = level;
    }

    /// Persistent metadata applied to every record from this handler.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
        self.pretty_metadata = render_metadata(&self.metadata);
    }

    pub fn remove_metadata(&mut self, key: &str) -> Option<String> {
        let removed = self.metadata.remove(key);
        self.pretty_metadata = render_metadata(&self.metadata);
        removed
    }

    pub fn replace_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
        self.pretty_metadata = render_metadata(&self.metadata);
    }

    /// Log `message` at `level`, swallowing any failure.
    ///
    /// Records below the handler's threshold are ignored. `metadata`
    /// is merged over the handler's persistent metadata for this call
    /// only.
    pub fn log(&self, level: Level, message: &str, metadata: Option<&Metadata>) {
        let _ = self.try_log(level, message, metadata);
    }

    /// Like [`FileLogHandler::log`] but reports write failures.
    ///
    /// Returns `Ok(false)` when the record was filtered out.
    pub fn try_log(
        &self,
        level: Level,
        message: &str,
        metadata: Option<&Metadata>,
    ) -> LogFileResult<bool> {
        if level < self.log_level {
            return Ok(false);
        }

        let record = LogRecord {
            timestamp: Utc::now(),
            level,
            label: self.label.clone(),
            metadata: Metadata::new(),
            message: message.to_string(),
        };

        let bytes = match metadata.filter(|m| !m.is_empty()) {
            Some(call_site) => {
                let merged = merge_metadata(&self.metadata, call_site);
                self.format
                    .encode_prerendered(&record, render_metadata(&merged).as_deref())?
            }
            None => self
                .format
                .encode_prerendered(&record, self.pretty_metadata.as_deref())?,
        };

        self.file.append(&bytes)?;
        Ok(true)
    }

    pub fn trace(&self, message: &str) {
        self.log(Level::Trace, message, None);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message, None);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message, None);
    }

    pub fn notice(&self, message: &str) {
        self.log(Level::Notice, message, None);
    }

    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message, None);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message, None);
    }

    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message, None);
    }
}
