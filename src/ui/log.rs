//! Terminal sink for run output

use crate::sandbox::{LogEntry, LogLevel, LogSink};
use console::{style, Style};

/// Prints run output as it arrives, one timestamped line per entry
#[derive(Debug, Default)]
pub struct TerminalLog;

impl TerminalLog {
    pub fn new() -> Self {
        Self
    }

    fn level_style(level: LogLevel) -> Style {
        match level {
            LogLevel::Log => Style::new(),
            LogLevel::Info => Style::new().cyan(),
            LogLevel::Warn => Style::new().yellow(),
            LogLevel::Error => Style::new().red(),
        }
    }
}

impl LogSink for TerminalLog {
    fn append(&self, entry: LogEntry) {
        let stamp = style(format!("[{}]", entry.at.format("%H:%M:%S"))).dim();
        let message = Self::level_style(entry.level).apply_to(&entry.message);
        if entry.level == LogLevel::Error {
            eprintln!("{} {}", stamp, message);
        } else {
            println!("{} {}", stamp, message);
        }
    }

    // Terminal output cannot be retracted
    fn clear(&self) {}
}
