// tests/pipe_execution_tests.rs
mod common;

use common::*;
use lazypipe::{create, fallible, Handle, PipeResult};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn test_value_of_seed_is_seed() {
  setup_tracing();
  assert_eq!(create(10).value().unwrap(), 10);
  assert_eq!(create("seed".to_string()).value().unwrap(), "seed");
  assert_eq!(create(vec![1u8, 2, 3]).value().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_pure_steps_compose_left_to_right() -> PipeResult<()> {
  setup_tracing();
  let n = create(10).then(add3)?.then(times10)?.value()?;
  assert_eq!(n, 130);

  // Reversed order gives a different result.
  let n = create(10).then(times10)?.then(add3)?.value()?;
  assert_eq!(n, 103);
  Ok(())
}

#[test]
fn test_steps_run_in_append_order() -> PipeResult<()> {
  setup_tracing();
  let log = Arc::new(Mutex::new(Vec::new()));
  let record = |label: &'static str| {
    let log = Arc::clone(&log);
    move |n: i32| {
      log.lock().push(label);
      n + 1
    }
  };

  let handle = create(0).then(record("first"))?.then(record("second"))?;
  let handle = handle.catch(|n| Ok::<_, anyhow::Error>(n))?.then(record("third"))?;
  assert!(log.lock().is_empty(), "nothing runs before the terminal call");

  assert_eq!(handle.value()?, 3);
  assert_eq!(*log.lock(), vec!["first", "second", "third"]);
  Ok(())
}

#[test]
fn test_steps_are_lazy_and_invoked_once() -> PipeResult<()> {
  setup_tracing();
  let probe = CallProbe::new();
  let handle = create(5).then(probe.pass())?.then(probe.pass())?;
  assert_eq!(probe.count(), 0);

  assert_eq!(handle.value()?, 5);
  assert_eq!(probe.count(), 2);
  Ok(())
}

#[test]
fn test_then_and_catch_return_the_same_handle() -> PipeResult<()> {
  setup_tracing();
  let handle = create(1);
  assert_eq!(handle.then(add3)?, handle);
  assert_eq!(handle.catch(|n| Ok::<_, anyhow::Error>(n * 2))?, handle);
  assert_eq!(handle.value()?, 8);
  Ok(())
}

#[test]
fn test_independent_handles_interleave() -> PipeResult<()> {
  setup_tracing();
  let a = create(10);
  let b = create(20);
  assert_ne!(a, b);
  assert_eq!(b.value()?, 20);
  assert_eq!(a.value()?, 10);

  let passthrough = |n: i32| Ok::<_, TestError>(n);
  let a = Handle::<i32, TestError>::new(10);
  let b = Handle::<i32, TestError>::new(20);
  let b = b.catch(passthrough)?;
  let a = a.then(add3)?;
  let b = b.then(times10)?;
  assert_eq!(a.catch(passthrough)?.value()?, 13);
  assert_eq!(b.value()?, 200);
  Ok(())
}

#[test]
fn test_fallible_steps_accumulate() -> PipeResult<()> {
  setup_tracing();
  let result = Handle::<String, TestError>::new(String::new())
    .catch(append("hello"))?
    .catch(append("world"))?
    .value_result()?;
  assert_eq!(result, Ok("helloworld".to_string()));
  Ok(())
}

#[test]
fn test_map_into_changes_element_type() -> PipeResult<()> {
  setup_tracing();
  let words = create("hello world".to_string())
    .then(|s| s.to_uppercase())?
    .map_into(|s| s.split_whitespace().map(str::to_owned).collect::<Vec<_>>())?
    .value()?;
  assert_eq!(words, vec!["HELLO", "WORLD"]);
  Ok(())
}

#[test]
fn test_map_into_issues_a_new_handle() -> PipeResult<()> {
  setup_tracing();
  let source = create(7);
  let target = source.map_into(|n| n.to_string())?;
  assert_ne!(source.id(), target.id());
  assert!(!source.is_live());
  assert!(target.is_live());
  assert_eq!(target.then(|s| format!("{s}!"))?.value()?, "7!");
  Ok(())
}

#[test]
fn test_try_map_into_parses_and_continues() -> PipeResult<()> {
  setup_tracing();
  let n = create("42")
    .try_map_into(|s: &str| s.parse::<i32>())?
    .then(|n| n * 2)?
    .value()?;
  assert_eq!(n, 84);
  Ok(())
}

#[test]
fn test_inspect_observes_without_changing() -> PipeResult<()> {
  setup_tracing();
  let seen = Arc::new(Mutex::new(Vec::new()));
  let tee = |seen: &Arc<Mutex<Vec<String>>>| {
    let seen = Arc::clone(seen);
    move |s: &String| seen.lock().push(s.clone())
  };

  let out = create("hello world".to_string())
    .inspect(tee(&seen))?
    .then(|s| s.to_uppercase())?
    .inspect(tee(&seen))?
    .value()?;

  assert_eq!(out, "HELLO WORLD");
  assert_eq!(*seen.lock(), vec!["hello world", "HELLO WORLD"]);
  Ok(())
}

#[test]
fn test_fallible_lifts_pure_functions() -> PipeResult<()> {
  setup_tracing();
  let len = Handle::<String, TestError>::new("four".to_string())
    .catch(fallible::<_, _, TestError>(|s: String| s + "teen"))?
    .try_map_into(fallible::<_, _, TestError>(|s: String| s.len()))?
    .value_result()?;
  assert_eq!(len, Ok(8));
  Ok(())
}

#[test]
fn test_steps_may_run_nested_pipes() -> PipeResult<()> {
  setup_tracing();
  let n = create(3)
    .then(|n| create(n).then(times10).and_then(|h| h.value()).unwrap_or_default())?
    .then(add3)?
    .value()?;
  assert_eq!(n, 33);
  Ok(())
}

#[test]
fn test_deep_chain_evaluates_each_step_once() -> PipeResult<()> {
  setup_tracing();
  const DEPTH: usize = 10_000;
  let probe = CallProbe::new();
  let mut handle = create(0usize);
  for _ in 0..DEPTH {
    let probe = probe.clone();
    handle = handle.then(move |n| {
      probe.hit();
      n + 1
    })?;
  }
  assert_eq!(handle.value()?, DEPTH);
  assert_eq!(probe.count(), DEPTH);
  Ok(())
}

#[test]
fn test_handles_cross_threads() -> PipeResult<()> {
  setup_tracing();
  let handle = create(vec![3, 1, 2]).then(|mut v| {
    v.sort();
    v
  })?;
  let sorted = std::thread::spawn(move || handle.value())
    .join()
    .expect("worker thread panicked")?;
  assert_eq!(sorted, vec![1, 2, 3]);
  Ok(())
}
