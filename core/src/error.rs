// lazypipe/src/error.rs
use crate::core::id::HandleId;
use thiserror::Error;

/// Errors raised by the pipe engine itself.
///
/// Domain errors returned by fallible steps are never wrapped in this type.
/// They reach the caller untouched through [`Handle::value_result`](crate::Handle::value_result).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipeError {
  #[error("Unknown pipe handle {handle}: never registered or already consumed")]
  UnknownHandle { handle: HandleId },

  /// Only raised by [`Handle::value`](crate::Handle::value), as the panic payload.
  /// `cause` is the `Debug` rendering of the domain error.
  #[error("Called `value` on pipe {handle}, which evaluated to an error: {cause}")]
  Unwrap { handle: HandleId, cause: String },

  #[error("Type mismatch while evaluating pipe {handle} (expected {expected_type})")]
  TypeMismatch { handle: HandleId, expected_type: String },

  #[error("Internal pipe error: {0}")]
  Internal(String),
}

impl PipeError {
  pub(crate) fn unknown(handle: HandleId) -> Self {
    PipeError::UnknownHandle { handle }
  }
}

pub type PipeResult<T, E = PipeError> = std::result::Result<T, E>;
