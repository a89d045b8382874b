//!
//! The terminal diagnostic sink.
//!

use colored::ColoredString;
use colored::Colorize;

use super::Level;
use super::Reporter;

///
/// The terminal diagnostic sink.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    /// Whether debug messages are printed.
    verbosity: bool,
    /// Whether only warnings and errors are printed.
    quiet: bool,
}

impl ConsoleReporter {
    ///
    /// A shortcut constructor.
    ///
    pub fn new(verbosity: bool, quiet: bool) -> Self {
        Self { verbosity, quiet }
    }

    ///
    /// Whether the message of `level` is printed.
    ///
    pub fn is_enabled(&self, level: Level) -> bool {
        match level {
            Level::Warning | Level::Error => true,
            _ if self.quiet => false,
            Level::Debug => self.verbosity,
            Level::Info | Level::Success => true,
        }
    }

    ///
    /// Formats the message with its right-aligned level tag.
    ///
    pub fn format(level: Level, message: &str) -> String {
        format!("{:>7} {}", Self::tag(level), message)
    }

    fn tag(level: Level) -> ColoredString {
        match level {
            Level::Debug => "DEBUG".bright_black(),
            Level::Info => "INFO".bright_white(),
            Level::Success => "PASSED".green(),
            Level::Warning => "WARNING".yellow(),
            Level::Error => "FAILED".bright_red(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, level: Level, message: &str) {
        if !self.is_enabled(level) {
            return;
        }

        let line = Self::format(level, message);
        match level {
            Level::Warning | Level::Error => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }
}
