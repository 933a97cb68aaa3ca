//! Bounded append-only log files.
//!
//! Records from a logging frontend are formatted (plain text or JSON
//! lines) and appended to a single local file that is kept to its most
//! recent `max_entries` lines.
//!
//! ## Quick Start
//!
//! ```ignore
//! use boundlog_core::{FileLogging, Level};
//!
//! let logging = FileLogging::builder("./app.log").max_entries(500).open()?;
//!
//! let mut db = logging.handler("db");
//! db.set_metadata("pool", "primary");
//! db.error("connection refused");
//!
//! // Cap the file without reopening it
//! logging.file().truncate()?;
//! ```
//!
//! ## With tracing
//!
//! ```ignore
//! use boundlog_core::LoggingBuilder;
//! use tracing_subscriber::prelude::*;
//!
//! let layer = LoggingBuilder::new("./app.jsonl")
//!     .format(boundlog_core::RecordFormat::Json)
//!     .build_layer()?;
//! tracing_subscriber::registry().with(layer).init();
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod format;
pub mod handler;
pub mod layer;
pub mod level;
pub mod reader;
pub mod writer;

// Re-exports
pub use config::{FileLoggingConfig, LoggingBuilder};
pub use entry::{merge_metadata, render_metadata, LogEntry, LogRecord, Metadata};
pub use error::{LogFileError, LogFileResult};
pub use format::RecordFormat;
pub use handler::{FileLogHandler, FileLogging, DEFAULT_MAX_ENTRIES};
pub use layer::BoundedFileLayer;
pub use level::{Level, ParseLevelError};
pub use reader::{read_all, LogFile};
pub use writer::BoundedFile;
