// lazypipe/src/core/step.rs

//! Type-erased step closures stored in the node arena.
//!
//! The registry is shared by chains of every element type, so values and
//! steps are boxed as `dyn Any`. Typing is restored at the edges: each erased
//! step downcasts its input, and the terminal call downcasts the final value.

use std::any::{type_name, Any};

/// A type-erased value flowing through a chain (a seed, an intermediate value or a domain error).
pub(crate) type AnyValue = Box<dyn Any + Send>;

/// Why an erased step stopped the chain.
pub(crate) enum Fault {
  /// A fallible step returned an error. Holds the chain's domain error `E`, boxed.
  Domain(AnyValue),
  /// A value did not have the type the step was built for.
  Mismatch { expected_type: &'static str },
}

/// A step closure after erasure. Called at most once.
pub(crate) type ErasedStep = Box<dyn FnOnce(AnyValue) -> Result<AnyValue, Fault> + Send>;

pub(crate) fn downcast_value<T: 'static>(value: AnyValue) -> Result<T, Fault> {
  value.downcast::<T>().map(|boxed| *boxed).map_err(|_| Fault::Mismatch {
    expected_type: type_name::<T>(),
  })
}

/// Erases a pure `T -> U` step.
pub(crate) fn erase_map<T, U, F>(f: F) -> ErasedStep
where
  T: Send + 'static,
  U: Send + 'static,
  F: FnOnce(T) -> U + Send + 'static,
{
  Box::new(move |input: AnyValue| {
    let value = downcast_value::<T>(input)?;
    Ok(Box::new(f(value)) as AnyValue)
  })
}

/// Erases a fallible `T -> Result<U, E2>` step. The step's error is converted
/// into the chain's error type `E` before it is boxed.
pub(crate) fn erase_try_map<T, U, E, E2, F>(f: F) -> ErasedStep
where
  T: Send + 'static,
  U: Send + 'static,
  E: Send + 'static,
  E2: Into<E>,
  F: FnOnce(T) -> Result<U, E2> + Send + 'static,
{
  Box::new(move |input: AnyValue| {
    let value = downcast_value::<T>(input)?;
    match f(value) {
      Ok(output) => Ok(Box::new(output) as AnyValue),
      Err(err) => Err(Fault::Domain(Box::new(Into::<E>::into(err)))),
    }
  })
}

/// Lifts a pure function into the fallible shape expected by
/// [`Handle::catch`](crate::Handle::catch) and
/// [`Handle::try_map_into`](crate::Handle::try_map_into).
///
/// The error type cannot be inferred from a pure function, so it usually has
/// to be named.
///
/// ```
/// use lazypipe::{create, fallible};
///
/// let words = create("a b c".to_string())
///   .try_map_into(fallible::<_, _, anyhow::Error>(|s: String| s.split(' ').count()))
///   .unwrap()
///   .value()
///   .unwrap();
/// assert_eq!(words, 3);
/// ```
pub fn fallible<T, U, E>(f: impl FnOnce(T) -> U) -> impl FnOnce(T) -> Result<U, E> {
  move |value| Ok(f(value))
}
