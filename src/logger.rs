//! Pluggable log sink for the client's diagnostics.
//!
//! The crate logs through `tracing`. Applications that want the messages
//! without running their own subscriber can plug per-level handlers in with
//! [`install`]; every level is a no-op unless overridden.

use std::fmt;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::errors::Error;

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Per-level handlers. `log` receives trace-level events.
pub trait ContentLogger: Send + Sync {
    fn error(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
    fn log(&self, _message: &str) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl ContentLogger for NoopLogger {}

/// Forwards this crate's events to a [`ContentLogger`].
#[derive(Clone)]
pub struct ShimLayer {
    handlers: Arc<dyn ContentLogger>,
}

impl ShimLayer {
    pub fn new(handlers: Arc<dyn ContentLogger>) -> Self {
        Self { handlers }
    }
}

impl Default for ShimLayer {
    fn default() -> Self {
        Self::new(Arc::new(NoopLogger))
    }
}

impl fmt::Debug for ShimLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShimLayer").finish_non_exhaustive()
    }
}

impl<S: Subscriber> Layer<S> for ShimLayer {
    // No `enabled` override: it would filter every layer in the stack.
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(CRATE_TARGET) {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let line = visitor.finish();
        match *metadata.level() {
            Level::ERROR => self.handlers.error(&line),
            Level::WARN => self.handlers.warn(&line),
            Level::INFO => self.handlers.info(&line),
            Level::DEBUG => self.handlers.debug(&line),
            Level::TRACE => self.handlers.log(&line),
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        let fields = self.fields.join(" ");
        if self.message.is_empty() {
            fields
        } else {
            format!("{} {}", self.message, fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

/// Route the crate's diagnostics to `handlers` for the rest of the process.
///
/// Fails if a global subscriber is already set; compose [`ShimLayer`] into
/// that subscriber instead.
pub fn install(handlers: Arc<dyn ContentLogger>) -> Result<(), Error> {
    let subscriber = Registry::default().with(ShimLayer::new(handlers));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("logger already installed: {}", e)))
}
