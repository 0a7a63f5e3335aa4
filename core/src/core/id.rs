// lazypipe/src/core/id.rs

//! Defines `HandleId`, the opaque identity behind every pipe handle.

use std::fmt;

/// Opaque identity of one pipe chain in the registry.
///
/// Ids are issued from a monotonic counter and are never reused, so a stale
/// id can never alias a newer chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
  pub(crate) fn new(raw: u64) -> Self {
    HandleId(raw)
  }

  /// The raw counter value, mostly useful for logs.
  pub fn get(self) -> u64 {
    self.0
  }
}

impl fmt::Display for HandleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}
