// lazypipe/src/pipeline/chaining.rs

//! Contains the methods that append steps to a chain.
//!
//! None of them run anything: each one wraps the current tip in a new node.
//! Same-type appends keep the handle, type-changing appends consume it and
//! return a new one.

use crate::core::node::Step;
use crate::core::step::{erase_map, erase_try_map};
use crate::error::PipeResult;
use crate::pipeline::definition::Handle;
use crate::registry;
use std::any::type_name;

impl<T, E> Handle<T, E>
where
  T: Send + 'static,
  E: Send + 'static,
{
  /// Appends a pure step and returns the same handle.
  pub fn then(self, f: impl FnOnce(T) -> T + Send + 'static) -> PipeResult<Self> {
    registry::global().append(self.id(), Step::Map(erase_map(f)))?;
    Ok(self)
  }

  /// Appends a fallible step and returns the same handle.
  ///
  /// The step's error only has to convert into the chain's error type `E`.
  /// Once a fallible step fails, no later step is invoked.
  pub fn catch<E2>(self, f: impl FnOnce(T) -> Result<T, E2> + Send + 'static) -> PipeResult<Self>
  where
    E2: Into<E>,
  {
    registry::global().append(self.id(), Step::TryMap(erase_try_map::<T, T, E, E2, _>(f)))?;
    Ok(self)
  }

  /// Appends a step that looks at the value and passes it on unchanged.
  pub fn inspect(self, f: impl FnOnce(&T) + Send + 'static) -> PipeResult<Self> {
    self.then(move |value| {
      f(&value);
      value
    })
  }

  /// Appends a pure step that changes the element type.
  ///
  /// `self` is consumed: its chain moves under the returned handle.
  pub fn map_into<U>(self, f: impl FnOnce(T) -> U + Send + 'static) -> PipeResult<Handle<U, E>>
  where
    U: Send + 'static,
  {
    let id = registry::global().transfer(self.id(), Step::Map(erase_map(f)), type_name::<U>())?;
    Ok(Handle::from_id(id))
  }

  /// Appends a fallible step that changes the element type. `self` is consumed.
  pub fn try_map_into<U, E2>(self, f: impl FnOnce(T) -> Result<U, E2> + Send + 'static) -> PipeResult<Handle<U, E>>
  where
    U: Send + 'static,
    E2: Into<E>,
  {
    let step = Step::TryMap(erase_try_map::<T, U, E, E2, _>(f));
    let id = registry::global().transfer(self.id(), step, type_name::<U>())?;
    Ok(Handle::from_id(id))
  }
}
