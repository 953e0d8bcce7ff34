//! Error types for the pagemark library.
//!
//! All failures are represented by the [`PagemarkError`] enum. Two variants,
//! [`PagemarkError::TooShort`] and [`PagemarkError::NoMatches`], are not faults
//! at all: they carry the message shown to the person typing the query and
//! are reported through [`PagemarkError::is_user_facing`].
//!
//! # Examples
//!
//! ```
//! use pagemark::error::{PagemarkError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PagemarkError::too_short(2, 1))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) if e.is_user_facing() => println!("{e}"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for pagemark operations.
#[derive(Error, Debug)]
pub enum PagemarkError {
    /// The trimmed query is shorter than the configured minimum.
    #[error("Please enter at least {min} characters to search")]
    TooShort {
        /// Minimum accepted length, in characters.
        min: usize,
        /// Length of the trimmed query, in characters.
        actual: usize,
    },

    /// A well-formed query produced no matches.
    #[error("No results found for \"{0}\"")]
    NoMatches(String),

    /// A scope element whose children contradict the leaf whitelist.
    #[error("Malformed scope element: {0}")]
    MalformedScopeElement(String),

    /// The match pattern could not be compiled.
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// A CSS selector could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid configuration values.
    #[error("Config error: {0}")]
    Config(String),

    /// A node id that is out of range, detached, or of the wrong kind.
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// I/O errors (reading documents, writing output).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with PagemarkError.
pub type Result<T> = std::result::Result<T, PagemarkError>;

impl PagemarkError {
    /// Create a new too-short error.
    pub fn too_short(min: usize, actual: usize) -> Self {
        PagemarkError::TooShort { min, actual }
    }

    /// Create a new no-matches error for the given query.
    pub fn no_matches<S: Into<String>>(query: S) -> Self {
        PagemarkError::NoMatches(query.into())
    }

    /// Create a new malformed scope element error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        PagemarkError::MalformedScopeElement(msg.into())
    }

    /// Create a new pattern error.
    pub fn pattern<S: Into<String>>(msg: S) -> Self {
        PagemarkError::Pattern(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        PagemarkError::Parse(msg.into())
    }

    /// Create a new config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PagemarkError::Config(msg.into())
    }

    /// Create a new invalid node error.
    pub fn invalid_node<S: Into<String>>(msg: S) -> Self {
        PagemarkError::InvalidNode(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PagemarkError::Other(msg.into())
    }

    /// Whether this error is an expected outcome to show to the user
    /// rather than a fault.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            PagemarkError::TooShort { .. } | PagemarkError::NoMatches(_)
        )
    }
}
