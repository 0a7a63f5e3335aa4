// lazypipe/src/registry.rs

//! Defines `Registry`, the table binding pipe handles to their current chain tip.
//!
//! Every `Handle` talks to one process-wide registry (see [`global`]). All
//! operations take a single `parking_lot::Mutex`, which makes them atomic with
//! respect to each other. User code never runs while that lock is held:
//! consumed chains are handed back to the caller and evaluated or dropped
//! after the guard is gone.

use crate::core::id::HandleId;
use crate::core::node::{Chain, Node, NodeArena, NodeId, Step};
use crate::error::{PipeError, PipeResult};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{event, Level};

struct Entry {
  tip: NodeId,
  element_type: &'static str,
}

/// The locked part of a [`Registry`]: entries, the node arena and the id counter.
struct RegistryState {
  entries: HashMap<HandleId, Entry>,
  arena: NodeArena,
  next_id: u64,
}

impl RegistryState {
  fn with_capacity(capacity: usize) -> Self {
    Self {
      entries: HashMap::with_capacity(capacity),
      arena: NodeArena::with_capacity(capacity),
      next_id: 0,
    }
  }

  /// Stores `node` as the tip of a brand-new chain and issues its handle.
  fn register(&mut self, node: Node, element_type: &'static str) -> HandleId {
    let tip = self.arena.insert(node);
    self.next_id += 1;
    let handle = HandleId::new(self.next_id);
    self.entries.insert(handle, Entry { tip, element_type });
    handle
  }

  fn lookup(&self, handle: HandleId) -> PipeResult<NodeId> {
    let entry = self.entries.get(&handle).ok_or_else(|| PipeError::unknown(handle))?;
    if self.arena.get(entry.tip).is_none() {
      return Err(PipeError::Internal(format!(
        "pipe {} ({}) points at a released node",
        handle, entry.element_type
      )));
    }
    Ok(entry.tip)
  }

  fn update(&mut self, handle: HandleId, tip: NodeId) -> PipeResult<()> {
    let entry = self.entries.get_mut(&handle).ok_or_else(|| PipeError::unknown(handle))?;
    entry.tip = tip;
    Ok(())
  }

  /// Deletes the entry and detaches its whole chain from the arena.
  fn consume(&mut self, handle: HandleId) -> PipeResult<Chain> {
    let entry = self.entries.remove(&handle).ok_or_else(|| PipeError::unknown(handle))?;
    self.arena.detach_chain(entry.tip).ok_or_else(|| {
      PipeError::Internal(format!(
        "chain of pipe {} ({}) has a dangling parent",
        handle, entry.element_type
      ))
    })
  }
}

/// A table of live pipe chains.
///
/// Every handle lives in the process-wide instance returned by [`global`],
/// which is also where the live counters are read. Standalone instances are
/// only built by this module's own tests.
pub struct Registry {
  state: Mutex<RegistryState>,
}

impl Registry {
  pub(crate) fn new() -> Self {
    Self::with_capacity(0)
  }

  /// Pre-sizes both the entry map and the node arena.
  pub(crate) fn with_capacity(capacity: usize) -> Self {
    Self {
      state: Mutex::new(RegistryState::with_capacity(capacity)),
    }
  }

  pub(crate) fn register(&self, node: Node, element_type: &'static str) -> HandleId {
    let handle = self.state.lock().register(node, element_type);
    event!(Level::DEBUG, %handle, %element_type, "Pipe registered.");
    handle
  }

  /// Appends `step` to the chain of `handle`, keeping the same handle.
  pub(crate) fn append(&self, handle: HandleId, step: Step) -> PipeResult<()> {
    let mut state = self.state.lock();
    match state.lookup(handle) {
      Ok(tip) => {
        let node = step.into_node(tip);
        let kind = node.kind();
        let new_tip = state.arena.insert(node);
        state.update(handle, new_tip)?;
        event!(Level::TRACE, %handle, step_kind = kind, "Step appended.");
        Ok(())
      }
      Err(err) => {
        // The rejected step owns user captures; drop it outside the lock.
        drop(state);
        drop(step);
        Err(err)
      }
    }
  }

  /// Moves the chain of `handle` under a fresh handle, with `step` as the new tip.
  /// `handle` is consumed.
  pub(crate) fn transfer(&self, handle: HandleId, step: Step, element_type: &'static str) -> PipeResult<HandleId> {
    let mut state = self.state.lock();
    match state.entries.remove(&handle) {
      Some(entry) => {
        let new_handle = state.register(step.into_node(entry.tip), element_type);
        drop(state);
        event!(
          Level::DEBUG,
          from = %handle,
          to = %new_handle,
          from_type = entry.element_type,
          to_type = element_type,
          "Pipe transferred to a new element type."
        );
        Ok(new_handle)
      }
      None => {
        drop(state);
        drop(step);
        Err(PipeError::unknown(handle))
      }
    }
  }

  /// Removes the entry for `handle` and hands back its chain for evaluation.
  pub(crate) fn consume(&self, handle: HandleId) -> PipeResult<Chain> {
    let chain = self.state.lock().consume(handle)?;
    event!(Level::DEBUG, %handle, depth = chain.depth(), "Pipe consumed.");
    Ok(chain)
  }

  /// Releases `handle` and its nodes without running any step.
  pub(crate) fn dispose(&self, handle: HandleId) -> PipeResult<()> {
    let chain = self.state.lock().consume(handle)?;
    event!(Level::DEBUG, %handle, depth = chain.depth(), "Pipe disposed without evaluation.");
    drop(chain);
    Ok(())
  }

  /// Whether `handle` still has an entry.
  pub fn is_live(&self, handle: HandleId) -> bool {
    self.state.lock().entries.contains_key(&handle)
  }

  /// Number of handles that have not been consumed yet.
  pub fn live_handles(&self) -> usize {
    self.state.lock().entries.len()
  }

  /// Number of nodes held by live chains.
  pub fn live_nodes(&self) -> usize {
    self.state.lock().arena.len()
  }
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry used by every [`Handle`](crate::Handle).
pub fn global() -> &'static Registry {
  &GLOBAL
}
