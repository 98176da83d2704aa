//! Request-scoped diagnostic log collection
//!
//! Log lines are part of the invoke response returned to the functions host,
//! so each invocation owns its own collector. Every line is mirrored to
//! `tracing` at debug level for local inspection.

use tracing::debug;

/// Ordered log lines for a single invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogCollector {
    lines: Vec<String>,
}

impl LogCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector seeded with an opening line
    pub fn started(first: impl Into<String>) -> Self {
        let mut logs = Self::new();
        logs.push(first);
        logs
    }

    /// Append one line
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: "cfeed::invocation", "{}", line);
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the collector, yielding the lines in order
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl Extend<String> for LogCollector {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for line in iter {
            self.push(line);
        }
    }
}
