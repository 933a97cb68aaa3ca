//! Configuration for bounded file logging.
//!
//! [`FileLoggingConfig`] is the serializable form, meant to be embedded in
//! an application's own config file. [`LoggingBuilder`] is the
//! programmatic form. Both end in [`FileLogging`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entry::Metadata;
use crate::error::{LogFileError, LogFileResult};
use crate::format::RecordFormat;
use crate::handler::{FileLogging, DEFAULT_MAX_ENTRIES};
use crate::layer::BoundedFileLayer;
use crate::level::Level;
use crate::writer::BoundedFile;

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

/// Settings for one bounded log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLoggingConfig {
    /// Path to the log file
    pub path: PathBuf,

    /// Lines retained when the file is trimmed
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default)]
    pub format: RecordFormat,

    /// Minimum level written by handlers
    #[serde(default)]
    pub level: Level,

    /// Metadata every handler starts with
    #[serde(default)]
    pub metadata: Metadata,
}

impl FileLoggingConfig {
    /// Defaults for everything but the path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_entries: DEFAULT_MAX_ENTRIES,
            format: RecordFormat::default(),
            level: Level::default(),
            metadata: Metadata::new(),
        }
    }

    pub fn validate(&self) -> LogFileResult<()> {
        if self.max_entries == 0 {
            return Err(LogFileError::InvalidMaxEntries);
        }
        Ok(())
    }

    /// Open the bounded file and build the handler factory.
    pub fn open(&self) -> LogFileResult<FileLogging> {
        self.validate()?;
        let file = BoundedFile::open(&self.path, self.max_entries)?;
        Ok(FileLogging::from_file(Arc::new(file), self.format)
            .with_level(self.level)
            .with_metadata(self.metadata.clone()))
    }
}

/// Builder for [`FileLogging`] and [`BoundedFileLayer`].
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    config: FileLoggingConfig,
}

impl LoggingBuilder {
    /// Create a new logging builder.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            config: FileLoggingConfig::new(path.as_ref()),
        }
    }

    /// Set the number of lines kept (default 2000).
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = max_entries;
        self
    }

    pub fn format(mut self, format: RecordFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set the minimum level handlers write (default info).
    pub fn level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.config.metadata = metadata;
        self
    }

    pub fn config(&self) -> &FileLoggingConfig {
        &self.config
    }

    /// Open the file and return the handler factory.
    pub fn open(self) -> LogFileResult<FileLogging> {
        self.config.open()
    }

    /// Open the file and return a tracing layer writing to it.
    pub fn build_layer(self) -> LogFileResult<BoundedFileLayer> {
        Ok(BoundedFileLayer::new(self.open()?))
    }
}

impl From<FileLoggingConfig> for LoggingBuilder {
    fn from(config: FileLoggingConfig) -> Self {
        Self { config }
    }
}
