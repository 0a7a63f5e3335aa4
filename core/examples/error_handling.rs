// lazypipe/examples/error_handling.rs

use lazypipe::{Handle, PipeResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// 1. Define a domain error type for the chain
#[derive(Debug, thiserror::Error)]
enum ExampleError {
  #[error("input has zero length")]
  ZeroLength,

  #[error("input is longer than {max} characters")]
  TooLong { max: usize },
}

fn require_non_empty(s: String) -> Result<String, ExampleError> {
  if s.is_empty() {
    Err(ExampleError::ZeroLength)
  } else {
    Ok(s)
  }
}

fn at_most(max: usize) -> impl FnOnce(String) -> Result<String, ExampleError> + Send + 'static {
  move |s| {
    if s.chars().count() > max {
      Err(ExampleError::TooLong { max })
    } else {
      Ok(s)
    }
  }
}

fn greet(input: &str) -> PipeResult<Result<String, ExampleError>> {
  Handle::<String, ExampleError>::new(input.to_string())
    .then(|s| s.trim().to_string())?
    .catch(require_non_empty)?
    .catch(at_most(10))?
    .then(|s| {
      // Only reached on the success path.
      info!("Greeting {}", s);
      format!("hello, {s}")
    })?
    .value_result()
}

fn main() -> PipeResult<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();
  info!("--- Error Handling Example ---");

  // Scenario 1: every step succeeds
  info!("\nScenario 1: valid input");
  match greet(" world ")? {
    Ok(greeting) => info!("Pipe produced: {}", greeting),
    Err(e) => error!("Unexpected domain error: {}", e),
  }

  // Scenario 2: a fallible step fails, later steps never run
  info!("\nScenario 2: empty input");
  match greet("   ")? {
    Ok(greeting) => error!("Pipe unexpectedly succeeded: {}", greeting),
    Err(e) => {
      info!("Pipe failed as expected: {}", e);
      assert!(matches!(e, ExampleError::ZeroLength));
    }
  }

  // Scenario 3: a different step fails
  info!("\nScenario 3: oversized input");
  let outcome = greet("an unreasonably long name")?;
  info!("Outcome: {:?}", outcome);
  assert!(matches!(outcome, Err(ExampleError::TooLong { max: 10 })));

  info!("--- Error Handling Example Finished ---");
  Ok(())
}
