use core::fmt;
use std::fmt::{Display, Formatter};

/// Failure taxonomy surfaced to the calling collaborator.
///
/// Every public operation in the crate reports one of these kinds; nothing
/// is swallowed except the pre-seed emptiness probe, which reads a count
/// failure on a possibly-absent table as "zero rows".
#[derive(Debug)]
pub enum StoreError {
    /// Unsupported or malformed configuration; fatal at startup.
    Configuration(String),
    /// Backend unreachable when opening a connection; surfaced per call, no retry.
    Connection(String),
    /// Malformed write input; the request is rejected with no partial write.
    Validation(String),
    /// SQL failed against the active backend dialect.
    Query(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Configuration(s) => write!(f, "configuration error: {}", s),
            StoreError::Connection(s) => write!(f, "connection error: {}", s),
            StoreError::Validation(s) => write!(f, "validation error: {}", s),
            StoreError::Query(s) => write!(f, "query error: {}", s),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<diesel::result::Error> for StoreError {
    fn from(value: diesel::result::Error) -> Self {
        StoreError::Query(value.to_string())
    }
}

impl From<diesel::result::ConnectionError> for StoreError {
    fn from(value: diesel::result::ConnectionError) -> Self {
        StoreError::Connection(value.to_string())
    }
}
