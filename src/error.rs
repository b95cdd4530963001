//! Error handling for homelist.
//!
//! Everything returns `anyhow::Error`. Failures that a caller may want to branch on are wrapped
//! in a `StoreError` that carries an `ErrorType`; use `error_type` (or `downcast_ref`) to get it
//! back out of an `anyhow::Error`.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The classes of failure that the record stores report.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// A required field was missing or could not be parsed. Nothing was changed.
    Validation,
    /// A position or id did not refer to a record in the collection. Nothing was changed.
    Index,
    /// The storage slot could not be read, parsed or written.
    Persistence,
    /// The home directory or its configuration file could not be created or loaded.
    Config,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error tagged with its `ErrorType`.
pub struct StoreError {
    error_type: ErrorType,
    source: Error,
}

impl StoreError {
    pub fn new(error_type: ErrorType, source: impl Into<Error>) -> Self {
        Self {
            error_type,
            source: source.into(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "StoreError({}, {:?})", self.error_type, self.source)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.source)
    }
}

impl std::error::Error for StoreError {}

/// Tags the error of a `Result` with an `ErrorType`.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| StoreError::new(error_type, e).into())
    }
}

/// Creates an `Error` of the given type from a message.
pub(crate) fn typed(error_type: ErrorType, message: impl Display) -> Error {
    StoreError::new(error_type, anyhow::anyhow!("{message}")).into()
}

/// Returns the `ErrorType` of `err` if it (or anything it wraps) is a `StoreError`.
pub fn error_type(err: &Error) -> Option<ErrorType> {
    err.chain()
        .find_map(|e| e.downcast_ref::<StoreError>())
        .map(StoreError::error_type)
}
