//!
//! The diagnostic sink.
//!

pub mod console;
#[cfg(test)]
pub mod recording;

pub use self::console::ConsoleReporter;

///
/// The diagnostic message level.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Per-call details, shown in the verbose mode only.
    Debug,
    /// Pipeline progress.
    Info,
    /// A completed check.
    Success,
    /// A suspicious but non-fatal condition.
    Warning,
    /// A fatal condition.
    Error,
}

///
/// The diagnostic sink threaded into every pipeline stage.
///
pub trait Reporter {
    ///
    /// Reports a message.
    ///
    fn report(&self, level: Level, message: &str);
}
