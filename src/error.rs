//! Error types for `tasklist`.

/// Errors that can occur while managing the task list.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Task text was empty or whitespace-only.
    ///
    /// The operation did not change anything.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No task with the given ID exists.
    ///
    /// The operation did not change anything.
    #[error("Task not found: {0}")]
    NotFound(String),

    /// Writing the task list to its storage slot failed.
    ///
    /// The in-memory list has already been changed and is not rolled back.
    #[error("Tasks were changed but could not be saved: {0}")]
    Persistence(#[source] Box<Error>),

    /// An import payload is not a valid task list.
    ///
    /// Nothing was replaced.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// An unknown priority name was given.
    #[error("invalid priority: '{0}' (must be one of: high, medium, low)")]
    InvalidPriority(String),

    /// An unknown filter mode was given.
    #[error("invalid filter: '{0}' (must be one of: all, pending, completed)")]
    InvalidFilter(String),

    /// An unknown sort mode was given.
    #[error("invalid sort: '{0}' (must be one of: newest, oldest, priority, alphabetical)")]
    InvalidSort(String),

    /// A template error occurred.
    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    /// Wrap a storage failure as a persistence error.
    #[must_use]
    pub fn persistence(source: Self) -> Self {
        Self::Persistence(Box::new(source))
    }

    /// Whether the operation that produced this error left the task list untouched.
    ///
    /// Only [`Error::Persistence`] is reported after the in-memory list changed.
    #[must_use]
    pub const fn is_no_op(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
