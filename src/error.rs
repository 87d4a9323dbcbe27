//! Crate-wide error type.

/// Errors raised by region, matrix and drawing-surface operations.
///
/// Every error is reported before the target object is mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("cannot access a disposed object: {0}")]
    Disposed(&'static str),

    #[error("value cannot be null: {0}")]
    ArgumentNull(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("matrix is not invertible")]
    NotInvertible,
}

pub type Result<T> = std::result::Result<T, Error>;
