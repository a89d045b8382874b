//!
//! The corpus file name filter.
//!

///
/// The corpus file name filter.
///
#[derive(Debug, Clone)]
pub struct Filter {
    /// The test name.
    name: String,
    /// The parent folder disambiguator, empty when not set.
    parent_folder: String,
}

impl Filter {
    ///
    /// A shortcut constructor.
    ///
    pub fn new(name: &str, parent_folder: &str) -> Self {
        Self {
            name: name.to_owned(),
            parent_folder: parent_folder.to_owned(),
        }
    }

    ///
    /// Whether a parent folder was given.
    ///
    pub fn has_parent_folder(&self) -> bool {
        !self.parent_folder.is_empty()
    }

    ///
    /// Check if the corpus file name is compatible with the filter.
    ///
    pub fn check_file_name(&self, file_name: &str) -> bool {
        file_name.contains(self.name.as_str()) && file_name.contains(self.parent_folder.as_str())
    }
}
