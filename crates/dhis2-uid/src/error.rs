use thiserror::Error;

/// Raised when sampling is attempted over an empty alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot sample from an empty sequence")]
pub struct EmptyInputError;
