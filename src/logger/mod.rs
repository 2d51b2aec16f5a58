// Logger sink - user-facing success/warning/error lines

use chrono::Local;
use colored::*;
use std::sync::Mutex;

/// Destination for the supervisor's user-facing log lines.
///
/// The supervisor reports every state transition (stop, start, exit
/// classification) through this trait; tests substitute a collecting
/// sink to assert on the exact lines emitted.
pub trait LogSink: Send + Sync {
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Sink that prints colored lines to the host's stdout/stderr
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn success(&self, message: &str) {
        println!("{} {} {}", timestamp().dimmed(), "✓".green().bold(), message);
    }

    fn warn(&self, message: &str) {
        println!("{} {} {}", timestamp().dimmed(), "!".yellow().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {} {}", timestamp().dimmed(), "✗".red().bold(), message);
    }
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Severity of a collected log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warn,
    Error,
}

/// Sink that collects log lines in memory, used by tests and embedders
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected entries in emission order
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.lock().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.filter(Level::Success)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.filter(Level::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.filter(Level::Error)
    }

    fn filter(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        self.lock().push((level, message.to_string()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Level, String)>> {
        // A poisoned sink still yields whatever was collected
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for MemorySink {
    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
