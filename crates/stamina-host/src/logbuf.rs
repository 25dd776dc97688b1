//! In-memory log bridge
//!
//! Keeps the most recent log entries in a bounded ring buffer so the
//! `log:tail` command can show them without a log file. Wired into the
//! tracing subscriber as an extra layer.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Number of entries retained.
const BUFFER_CAPACITY: usize = 50;

/// Bounded ring buffer of formatted log lines.
#[derive(Default)]
pub struct LogBuffer {
    entries: RwLock<VecDeque<String>>,
}

impl LogBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&self, entry: String) {
        let mut entries = self.entries.write().unwrap();
        if entries.len() == BUFFER_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Snapshot of the retained entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.read().unwrap().iter().cloned().collect()
    }
}

/// Tracing layer appending formatted events to a [`LogBuffer`].
pub struct BufferLayer {
    buffer: Arc<LogBuffer>,
}

impl BufferLayer {
    /// Create a layer writing to the given buffer.
    pub fn new(buffer: Arc<LogBuffer>) -> Self {
        Self { buffer }
    }
}

impl<S: Subscriber> Layer<S> for BufferLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let line = format!(
            "{} {:>5} {}: {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            meta.level(),
            meta.target(),
            visitor.message
        );
        self.buffer.push(line);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            if !self.message.is_empty() {
                self.message.push(' ');
            }
            let _ = write!(self.message, "{}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            if !self.message.is_empty() {
                self.message.push(' ');
            }
            let _ = write!(self.message, "{}={}", field.name(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_bounded() {
        let buffer = LogBuffer::new();
        for i in 0..(BUFFER_CAPACITY + 10) {
            buffer.push(format!("entry {i}"));
        }
        let entries = buffer.entries();
        assert_eq!(entries.len(), BUFFER_CAPACITY);
        assert_eq!(entries.first().unwrap(), "entry 10");
        assert_eq!(entries.last().unwrap(), &format!("entry {}", BUFFER_CAPACITY + 9));
    }

    #[test]
    fn entries_keep_insertion_order() {
        let buffer = LogBuffer::new();
        buffer.push("first".to_string());
        buffer.push("second".to_string());
        assert_eq!(buffer.entries(), vec!["first", "second"]);
    }
}
