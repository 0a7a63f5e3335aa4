// lazypipe/examples/basic_pipe.rs

use lazypipe::{create, PipeResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn tee<T: std::fmt::Debug>(value: &T) {
  info!("tee: {:?}", value);
}

fn main() -> PipeResult<()> {
  // RUST_LOG=lazypipe=trace shows every step being appended and invoked.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  info!("--- Basic Pipe Example ---");

  // 1. Seed a chain and append pure steps. Nothing runs yet.
  let handle = create(10).then(|n| n + 3)?.then(|n| n * 10)?;
  info!("Chain {} is built; no step has run.", handle.id());

  // 2. The terminal call evaluates and consumes the chain.
  let n = handle.value()?;
  info!("Result: {}", n);
  assert_eq!(n, 130);

  // 3. Change the element type mid-chain.
  let words = create("hello world".to_string())
    .inspect(tee)?
    .then(|s| s.to_uppercase())?
    .map_into(|s| s.split_whitespace().map(str::to_owned).collect::<Vec<_>>())?
    .value()?;
  info!("Words: {:?}", words);
  assert_eq!(words, vec!["HELLO", "WORLD"]);

  // 4. A consumed handle cannot be reused.
  let spent = create(1);
  spent.value()?;
  match spent.value() {
    Err(e) => info!("Reusing a consumed handle fails as expected: {}", e),
    Ok(v) => unreachable!("consumed handle produced {v}"),
  }

  info!("--- Basic Pipe Example Finished ---");
  Ok(())
}
