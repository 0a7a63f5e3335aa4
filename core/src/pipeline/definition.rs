// lazypipe/src/pipeline/definition.rs

//! Contains the `Handle<T, E>` struct, chain seeding and explicit disposal.

use crate::core::id::HandleId;
use crate::core::node::Node;
use crate::error::PipeResult;
use crate::pipeline::guard::PipeGuard;
use crate::registry;
use std::any::type_name;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// An opaque, copyable reference to one lazily evaluated chain.
///
/// `T` is the element type at the current tip of the chain. `E` is the domain
/// error type that fallible steps may return; it defaults to `anyhow::Error`.
///
/// The handle owns nothing itself: the chain lives in the process-wide
/// [`Registry`](crate::Registry) until a terminal call ([`value`](Handle::value),
/// [`value_result`](Handle::value_result)), a type-changing append or
/// [`dispose`](Handle::dispose) consumes it. Copies of a consumed handle stay
/// around, but every operation on them fails with
/// [`PipeError::UnknownHandle`](crate::PipeError::UnknownHandle).
pub struct Handle<T, E = anyhow::Error> {
  id: HandleId,
  _marker: PhantomData<fn() -> (T, E)>,
}

/// Starts a chain from `value`, with `anyhow::Error` as the domain error type.
///
/// Use [`Handle::new`] to pick another error type.
pub fn create<T>(value: T) -> Handle<T>
where
  T: Send + 'static,
{
  Handle::new(value)
}

impl<T, E> Handle<T, E> {
  pub(crate) fn from_id(id: HandleId) -> Self {
    Handle {
      id,
      _marker: PhantomData,
    }
  }

  pub fn id(&self) -> HandleId {
    self.id
  }

  /// Whether the chain behind this handle has not been consumed yet.
  pub fn is_live(&self) -> bool {
    registry::global().is_live(self.id)
  }
}

impl<T, E> Handle<T, E>
where
  T: Send + 'static,
  E: Send + 'static,
{
  /// Registers a new chain whose root is `value`.
  pub fn new(value: T) -> Self {
    let node = Node::Scalar { value: Box::new(value) };
    Handle::from_id(registry::global().register(node, type_name::<T>()))
  }

  /// Releases the chain without running any of its steps.
  pub fn dispose(self) -> PipeResult<()> {
    registry::global().dispose(self.id)
  }

  /// Wraps the handle in a [`PipeGuard`] that disposes the chain if it is
  /// dropped before a terminal call.
  pub fn guard(self) -> PipeGuard<T, E> {
    PipeGuard::new(self)
  }
}

impl<T, E> Clone for Handle<T, E> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T, E> Copy for Handle<T, E> {}

impl<T, E> PartialEq for Handle<T, E> {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl<T, E> Eq for Handle<T, E> {}

impl<T, E> Hash for Handle<T, E> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl<T, E> fmt::Debug for Handle<T, E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Handle")
      .field("id", &self.id)
      .field("element_type", &type_name::<T>())
      .field("error_type", &type_name::<E>())
      .finish()
  }
}
