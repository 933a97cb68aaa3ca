//! Tracing Layer that writes events to a bounded log file.
//!
//! This layer lets `tracing` act as the logging frontend: each event is
//! routed to a [`FileLogHandler`] labelled with the event's target.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::entry::Metadata;
use crate::handler::{FileLogHandler, FileLogging};
use crate::level::Level;

/// Metadata key holding the enclosing span names.
const SPAN_KEY: &str = "span";

/// A tracing Layer that appends events to a bounded file.
///
/// ```ignore
/// use boundlog_core::{BoundedFileLayer, FileLogging};
/// use tracing_subscriber::prelude::*;
///
/// let layer = BoundedFileLayer::new(FileLogging::open_json("./app.jsonl")?);
/// tracing_subscriber::registry()
///     .with(layer)
///     .with(tracing_subscriber::fmt::layer())
///     .init();
/// ```
#[derive(Debug, Clone)]
pub struct BoundedFileLayer {
    logging: FileLogging,
}

impl BoundedFileLayer {
    pub fn new(logging: FileLogging) -> Self {
        Self { logging }
    }

    /// Get the path to the log file.
    pub fn log_path(&self) -> &Path {
        self.logging.file().path()
    }

    pub fn logging(&self) -> &FileLogging {
        &self.logging
    }

    fn handler_for(&self, target: &str) -> FileLogHandler {
        self.logging.handler(target)
    }
}

impl<S> Layer<S> for BoundedFileLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Level::from(*metadata.level());

        let mut visitor = MetadataVisitor::default();
        event.record(&mut visitor);
        let message = visitor.message.unwrap_or_default();
        let mut fields = visitor.fields;

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                fields.insert(SPAN_KEY.to_string(), spans.join(" > "));
            }
        }

        // Never log from here: the event would come straight back to this layer
        self.handler_for(metadata.target())
            .log(level, &message, Some(&fields));
    }
}

/// Visitor that flattens event fields into string metadata.
#[derive(Default)]
struct MetadataVisitor {
    message: Option<String>,
    fields: Metadata,
}

impl MetadataVisitor {
    fn insert(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for MetadataVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);
        self.insert(field, buf);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, value.to_string());
    }
}
