pub mod id;
pub(crate) mod node;
pub mod step;

// Re-export key types for easier access from other modules (and lib.rs)
pub use id::HandleId;
pub use step::fallible;
