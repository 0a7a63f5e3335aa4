// lazypipe/src/pipeline/guard.rs

//! Defines `PipeGuard`, which releases a chain that is dropped before a
//! terminal call (early returns, `?`, panics in the caller).

use crate::core::id::HandleId;
use crate::error::PipeResult;
use crate::pipeline::definition::Handle;
use std::fmt;
use tracing::{event, Level};

/// Owns a [`Handle`] and disposes its chain on drop unless the chain was
/// consumed through the guard first.
///
/// Every chaining method consumes the guard and returns a new one for the
/// resulting handle, so ownership of the chain always sits with exactly one guard.
pub struct PipeGuard<T, E = anyhow::Error>
where
  T: Send + 'static,
  E: Send + 'static,
{
  handle: Handle<T, E>,
  armed: bool,
}

impl<T, E> PipeGuard<T, E>
where
  T: Send + 'static,
  E: Send + 'static,
{
  pub fn new(handle: Handle<T, E>) -> Self {
    PipeGuard { handle, armed: true }
  }

  pub fn id(&self) -> HandleId {
    self.handle.id()
  }

  /// Disarms the guard and hands the raw handle back to the caller.
  pub fn release(self) -> Handle<T, E> {
    self.disarm()
  }

  // Every consuming method goes through here, so the drop that follows is a no-op.
  fn disarm(mut self) -> Handle<T, E> {
    self.armed = false;
    self.handle
  }

  pub fn then(self, f: impl FnOnce(T) -> T + Send + 'static) -> PipeResult<Self> {
    Ok(PipeGuard::new(self.disarm().then(f)?))
  }

  pub fn catch<E2>(self, f: impl FnOnce(T) -> Result<T, E2> + Send + 'static) -> PipeResult<Self>
  where
    E2: Into<E>,
  {
    Ok(PipeGuard::new(self.disarm().catch(f)?))
  }

  pub fn inspect(self, f: impl FnOnce(&T) + Send + 'static) -> PipeResult<Self> {
    Ok(PipeGuard::new(self.disarm().inspect(f)?))
  }

  pub fn map_into<U>(self, f: impl FnOnce(T) -> U + Send + 'static) -> PipeResult<PipeGuard<U, E>>
  where
    U: Send + 'static,
  {
    Ok(PipeGuard::new(self.disarm().map_into(f)?))
  }

  pub fn try_map_into<U, E2>(
    self,
    f: impl FnOnce(T) -> Result<U, E2> + Send + 'static,
  ) -> PipeResult<PipeGuard<U, E>>
  where
    U: Send + 'static,
    E2: Into<E>,
  {
    Ok(PipeGuard::new(self.disarm().try_map_into(f)?))
  }

  pub fn value_result(self) -> PipeResult<Result<T, E>> {
    self.disarm().value_result()
  }

  /// See [`Handle::value`].
  ///
  /// # Panics
  ///
  /// Panics with [`PipeError::Unwrap`](crate::PipeError::Unwrap) as the payload if a fallible step failed.
  pub fn value(self) -> PipeResult<T>
  where
    E: fmt::Debug,
  {
    self.disarm().value()
  }
}

impl<T, E> From<Handle<T, E>> for PipeGuard<T, E>
where
  T: Send + 'static,
  E: Send + 'static,
{
  fn from(handle: Handle<T, E>) -> Self {
    PipeGuard::new(handle)
  }
}

impl<T, E> fmt::Debug for PipeGuard<T, E>
where
  T: Send + 'static,
  E: Send + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PipeGuard")
      .field("handle", &self.handle)
      .field("armed", &self.armed)
      .finish()
  }
}

impl<T, E> Drop for PipeGuard<T, E>
where
  T: Send + 'static,
  E: Send + 'static,
{
  fn drop(&mut self) {
    if !self.armed {
      return;
    }
    let handle = self.handle;
    match handle.dispose() {
      Ok(()) => event!(Level::DEBUG, handle = %handle.id(), "Guard released an unconsumed pipe."),
      Err(err) => event!(Level::WARN, handle = %handle.id(), error = %err, "Guard could not release its pipe."),
    }
  }
}
