// src/lib.rs

//! lazypipe: lazily evaluated, short-circuiting value pipelines.
//!
//! A pipe threads one value through a linear chain of steps:
//!  - Pure steps (`T -> T`) appended with [`Handle::then`].
//!  - Fallible steps (`T -> Result<T, E>`) appended with [`Handle::catch`].
//!  - Type-changing steps via [`Handle::map_into`] and [`Handle::try_map_into`].
//!  - Nothing runs until a terminal call ([`Handle::value`], [`Handle::value_result`]).
//!  - After the first failing step, no later step is invoked.
//!
//! Chains are addressed through opaque, copyable [`Handle`]s bound to their
//! current tip in a process-wide [`Registry`]. A terminal call consumes the
//! handle; reusing it afterwards fails with [`PipeError::UnknownHandle`].
//!
//! ```
//! use lazypipe::create;
//!
//! let n = create(10)
//!   .then(|n| n + 3)
//!   .and_then(|h| h.then(|n| n * 10))
//!   .and_then(|h| h.value())
//!   .unwrap();
//! assert_eq!(n, 130);
//! ```

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

// --- Re-exports for the Public API ---

pub use crate::core::id::HandleId;
pub use crate::core::step::fallible;

// The handle, its constructor and the scope guard
pub use crate::pipeline::definition::{create, Handle};
pub use crate::pipeline::guard::PipeGuard;

pub use crate::error::{PipeError, PipeResult};

pub use crate::registry::Registry;

/*
    Typical use:
    1. Seed a chain: `let h = lazypipe::create(order);` (or `Handle::<_, MyError>::new(order)`).
    2. Append steps: `h.then(normalize)?.catch(validate)?.try_map_into(price)?`.
       Each call only records the step.
    3. Finish with `.value_result()?` to get `Result<T, MyError>`, or `.value()?`
       when a domain error would be a bug.
    4. On paths that might bail out before step 3, hold the chain in a
       `PipeGuard` (`h.guard()`) so it is released on drop.
*/
