// lazypipe/src/pipeline/execution.rs

//! Contains the evaluator and the terminal `value`/`value_result` calls.

use crate::core::id::HandleId;
use crate::core::node::{Chain, Step};
use crate::core::step::{AnyValue, Fault};
use crate::error::{PipeError, PipeResult};
use crate::pipeline::definition::Handle;
use crate::registry;
use std::any::type_name;
use std::{fmt, panic};
use tracing::{event, instrument, Level};

/// Runs a detached chain from its seed through every step in append order.
///
/// Stops at the first fault. The steps after it are dropped without being
/// invoked.
#[instrument(
  name = "lazypipe::evaluate",
  skip_all,
  fields(handle = %handle, depth = chain.depth())
)]
pub(crate) fn evaluate(handle: HandleId, chain: Chain) -> Result<AnyValue, Fault> {
  event!(Level::TRACE, "Pipe evaluation starting.");
  let Chain { seed, steps } = chain;
  let depth = steps.len();

  let mut current = seed;
  for (step_index, step) in steps.into_iter().enumerate() {
    let (step_kind, step_fn) = match step {
      Step::Map(f) => ("map", f),
      Step::TryMap(f) => ("try_map", f),
    };
    event!(Level::TRACE, step_index, step_kind, "Invoking step.");
    match step_fn(current) {
      Ok(next) => current = next,
      Err(fault) => {
        event!(
          Level::DEBUG,
          step_index,
          step_kind,
          skipped_steps = depth - step_index - 1,
          "Pipe short-circuited."
        );
        return Err(fault);
      }
    }
  }

  event!(Level::TRACE, "Pipe evaluation completed.");
  Ok(current)
}

/// Restores the concrete type of a value leaving the chain.
fn decode<V: 'static>(handle: HandleId, value: AnyValue) -> PipeResult<V> {
  value.downcast::<V>().map(|boxed| *boxed).map_err(|_| PipeError::TypeMismatch {
    handle,
    expected_type: type_name::<V>().to_string(),
  })
}

impl<T, E> Handle<T, E>
where
  T: Send + 'static,
  E: Send + 'static,
{
  /// Evaluates and consumes the chain.
  ///
  /// The outer result carries engine errors (unknown or consumed handle). The
  /// inner one carries the first domain error raised by a fallible step,
  /// exactly as the step returned it (after `Into<E>`).
  pub fn value_result(self) -> PipeResult<Result<T, E>> {
    let handle = self.id();
    let chain = registry::global().consume(handle)?;
    match evaluate(handle, chain) {
      Ok(value) => decode::<T>(handle, value).map(Ok),
      Err(Fault::Domain(err)) => decode::<E>(handle, err).map(Err),
      Err(Fault::Mismatch { expected_type }) => Err(PipeError::TypeMismatch {
        handle,
        expected_type: expected_type.to_string(),
      }),
    }
  }

  /// Evaluates and consumes the chain, demanding a value.
  ///
  /// # Panics
  ///
  /// If a fallible step failed, panics with the [`PipeError::Unwrap`] value
  /// itself as the payload, so `catch_unwind` callers can downcast it. Use
  /// [`value_result`](Handle::value_result) when failure is expected.
  pub fn value(self) -> PipeResult<T>
  where
    E: fmt::Debug,
  {
    match self.value_result()? {
      Ok(value) => Ok(value),
      Err(err) => {
        let unwrap = PipeError::Unwrap {
          handle: self.id(),
          cause: format!("{:?}", err),
        };
        event!(Level::ERROR, handle = %self.id(), error = %unwrap, "Pipe value demanded from a failed chain.");
        panic::panic_any(unwrap);
      }
    }
  }
}
