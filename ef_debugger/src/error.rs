//!
//! The debugger errors.
//!

use std::path::PathBuf;

use crate::block::DecodeError;
use crate::verifier::Field;

///
/// The debugger result.
///
pub type Result<T> = std::result::Result<T, Error>;

///
/// The debugger error.
///
/// Every variant is fatal to the run.
///
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No corpus file matches the requested test.
    #[error(
        "Test `{name}` not found. Please ensure that you are using the valid EF-Test name, not the sanitized identifier used in the runner"
    )]
    NotFound {
        /// The requested test name.
        name: String,
    },
    /// The test name cannot exist in the corpus.
    #[error(
        "Test name `{name}` could not be parsed because it exceeds the maximum length of {} characters",
        crate::corpus::Corpus::MAX_NAME_LENGTH
    )]
    InvalidName {
        /// The requested test name.
        name: String,
    },
    /// Several corpus files match and no parent folder was given.
    #[error("Test `{name}` is ambiguous, please set the parent folder of the test file: {}", .candidates.join(", "))]
    AmbiguousTest {
        /// The requested test name.
        name: String,
        /// The matching file names.
        candidates: Vec<String>,
    },
    /// The corpus directory or file could not be read.
    #[error("Failed to read `{path}`: {source}")]
    Corpus {
        /// The offending path.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The corpus file is not a valid test vector.
    #[error("Failed to parse the test vector `{path}`: {source}")]
    Vector {
        /// The offending path.
        path: PathBuf,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The block encoding is malformed.
    #[error("Could not decode the block of the test vector: {0}")]
    BlockDecode(#[from] DecodeError),
    /// The node could not be started.
    #[error("Could not launch `{binary}`: {message}")]
    Launch {
        /// The node binary.
        binary: String,
        /// The failure description.
        message: String,
    },
    /// The node is unreachable or rejected a call.
    #[error("Node call `{method}` failed: {message}")]
    Environment {
        /// The JSON-RPC method.
        method: String,
        /// The failure description.
        message: String,
    },
    /// The block has nothing to replay.
    #[error("Could not find any transaction in the test block")]
    EmptyBlock,
    /// The live state differs from the expected post-state.
    #[error("Post state does not match for {address}, {field} error: expected {expected}, got {actual}")]
    StateMismatch {
        /// The checksummed account address.
        address: String,
        /// The mismatching field.
        field: Field,
        /// The expected value.
        expected: String,
        /// The live value.
        actual: String,
    },
}

impl Error {
    ///
    /// A shortcut constructor.
    ///
    pub fn environment<E>(method: &str, error: E) -> Self
    where
        E: ToString,
    {
        Self::Environment {
            method: method.to_owned(),
            message: error.to_string(),
        }
    }
}
