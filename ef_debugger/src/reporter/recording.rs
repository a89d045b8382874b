//!
//! The diagnostic sink keeping every message.
//!

use std::cell::RefCell;

use super::Level;
use super::Reporter;

///
/// The diagnostic sink keeping every message.
///
#[derive(Debug, Default)]
pub struct RecordingReporter {
    /// The reported messages, in order.
    pub messages: RefCell<Vec<(Level, String)>>,
}

impl RecordingReporter {
    ///
    /// The messages of `level`.
    ///
    pub fn at(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(candidate, _)| *candidate == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, level: Level, message: &str) {
        self.messages.borrow_mut().push((level, message.to_owned()));
    }
}
