// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("input has zero length")]
  ZeroLength,

  #[error("Test step failed: {0}")]
  Step(String),
}

// --- Common Step Functions ---
pub fn add3(n: i32) -> i32 {
  n + 3
}

pub fn times10(n: i32) -> i32 {
  n * 10
}

pub fn require_non_empty(s: String) -> Result<String, TestError> {
  if s.is_empty() {
    Err(TestError::ZeroLength)
  } else {
    Ok(s)
  }
}

pub fn append(suffix: &'static str) -> impl FnOnce(String) -> Result<String, TestError> + Send + 'static {
  move |mut s: String| {
    s.push_str(suffix);
    Ok(s)
  }
}

// --- Call-count probes for checking which steps ran ---
#[derive(Clone, Debug, Default)]
pub struct CallProbe(Arc<AtomicUsize>);

impl CallProbe {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn hit(&self) {
    self.0.fetch_add(1, Ordering::SeqCst);
  }

  pub fn count(&self) -> usize {
    self.0.load(Ordering::SeqCst)
  }

  /// A pure step that records its call and passes the value through.
  pub fn pass<T: 'static>(&self) -> impl FnOnce(T) -> T + Send + 'static {
    let probe = self.clone();
    move |value| {
      probe.hit();
      value
    }
  }

  /// A fallible step that records its call and then fails.
  pub fn fail<T: 'static>(&self, message: &'static str) -> impl FnOnce(T) -> Result<T, TestError> + Send + 'static {
    let probe = self.clone();
    move |_value| {
      probe.hit();
      Err(TestError::Step(message.to_string()))
    }
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
