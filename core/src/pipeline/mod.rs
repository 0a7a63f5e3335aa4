// lazypipe/src/pipeline/mod.rs

//! Defines the typed `Handle<T, E>`, its chaining operations, evaluation and
//! the scope-based `PipeGuard`.

pub mod chaining;
pub mod definition;
pub mod execution;
pub mod guard;

// Re-export the handle and its constructor
pub use definition::{create, Handle};
pub use guard::PipeGuard;
