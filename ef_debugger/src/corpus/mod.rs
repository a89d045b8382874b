//!
//! The test vector corpus directory.
//!

pub mod filter;

use std::path::Path;
use std::path::PathBuf;

use crate::error::Error;
use crate::vector::TestVector;

use self::filter::Filter;

///
/// The outcome of a test vector lookup.
///
#[derive(Debug)]
pub enum Lookup {
    /// Exactly one file matches.
    Found(Box<TestVector>),
    /// No file matches.
    NotFound,
    /// Several files match.
    Ambiguous(Vec<String>),
}

///
/// The test vector corpus directory.
///
#[derive(Debug, Clone)]
pub struct Corpus {
    /// The directory path.
    path: PathBuf,
}

impl Corpus {
    /// The corpus file names are sanitized to this length.
    pub const MAX_NAME_LENGTH: usize = 255;

    ///
    /// A shortcut constructor.
    ///
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    ///
    /// The directory path.
    ///
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    ///
    /// Finds the test vector whose file name contains `name` and `parent_folder`.
    ///
    pub fn lookup(&self, name: &str, parent_folder: &str) -> crate::Result<Lookup> {
        self.lookup_filtered(&Filter::new(name, parent_folder))
    }

    ///
    /// Loads the single test vector matching `name` and `parent_folder`.
    ///
    pub fn load(&self, name: &str, parent_folder: &str) -> crate::Result<TestVector> {
        let filter = Filter::new(name, parent_folder);
        match self.lookup_filtered(&filter)? {
            Lookup::Found(vector) => Ok(*vector),
            Lookup::NotFound if name.chars().count() > Self::MAX_NAME_LENGTH => {
                Err(Error::InvalidName {
                    name: name.to_owned(),
                })
            }
            Lookup::NotFound => Err(Error::NotFound {
                name: name.to_owned(),
            }),
            Lookup::Ambiguous(candidates) if !filter.has_parent_folder() => {
                Err(Error::AmbiguousTest {
                    name: name.to_owned(),
                    candidates,
                })
            }
            Lookup::Ambiguous(_) => Err(Error::NotFound {
                name: name.to_owned(),
            }),
        }
    }

    fn lookup_filtered(&self, filter: &Filter) -> crate::Result<Lookup> {
        let mut matches = self.matching_files(filter)?;

        match matches.len() {
            0 => Ok(Lookup::NotFound),
            1 => {
                let file_name = matches.remove(0);
                Ok(Lookup::Found(Box::new(self.read(file_name.as_str())?)))
            }
            _ => Ok(Lookup::Ambiguous(matches)),
        }
    }

    ///
    /// Lists the matching file names, sorted.
    ///
    fn matching_files(&self, filter: &Filter) -> crate::Result<Vec<String>> {
        let entries = std::fs::read_dir(self.path.as_path()).map_err(|source| Error::Corpus {
            path: self.path.clone(),
            source,
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Corpus {
                path: self.path.clone(),
                source,
            })?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if filter.check_file_name(file_name.as_str()) {
                matches.push(file_name);
            }
        }
        matches.sort();
        Ok(matches)
    }

    fn read(&self, file_name: &str) -> crate::Result<TestVector> {
        let path = self.path.join(file_name);
        let data = std::fs::read_to_string(path.as_path()).map_err(|source| Error::Corpus {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(data.as_str()).map_err(|source| Error::Vector { path, source })
    }
}
