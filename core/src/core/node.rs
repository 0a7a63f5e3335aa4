// lazypipe/src/core/node.rs

//! The chain's computation tree and the arena that stores it.
//!
//! A chain is a linked list of immutable nodes: one `Scalar` root followed by
//! `Map`/`TryMap` nodes, each pointing at its parent by `NodeId`. Appending a
//! step inserts a new node whose parent is the previous tip. Nodes are never
//! edited in place.

use super::step::{AnyValue, ErasedStep};
use std::fmt;

/// Index of a node in a [`NodeArena`], tagged with the slot's generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
  index: usize,
  generation: u32,
}

/// One unit of a chain.
pub(crate) enum Node {
  /// The chain root.
  Scalar { value: AnyValue },
  /// A pure step.
  Map { parent: NodeId, step: ErasedStep },
  /// A fallible step, same-type or cross-type.
  TryMap { parent: NodeId, step: ErasedStep },
}

impl Node {
  pub(crate) fn parent(&self) -> Option<NodeId> {
    match self {
      Node::Scalar { .. } => None,
      Node::Map { parent, .. } | Node::TryMap { parent, .. } => Some(*parent),
    }
  }

  pub(crate) fn kind(&self) -> &'static str {
    match self {
      Node::Scalar { .. } => "scalar",
      Node::Map { .. } => "map",
      Node::TryMap { .. } => "try_map",
    }
  }
}

impl fmt::Debug for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Node")
      .field("kind", &self.kind())
      .field("parent", &self.parent())
      .finish()
  }
}

/// A detached step, ready for evaluation.
pub(crate) enum Step {
  Map(ErasedStep),
  TryMap(ErasedStep),
}

impl Step {
  /// Wraps `parent` in a node carrying this step.
  pub(crate) fn into_node(self, parent: NodeId) -> Node {
    match self {
      Step::Map(step) => Node::Map { parent, step },
      Step::TryMap(step) => Node::TryMap { parent, step },
    }
  }
}

/// A chain removed from the arena: its seed plus its steps in append order.
///
/// Owning the chain outright lets the caller evaluate (or drop) it after the
/// registry lock is released.
pub(crate) struct Chain {
  pub(crate) seed: AnyValue,
  pub(crate) steps: Vec<Step>,
}

impl Chain {
  pub(crate) fn depth(&self) -> usize {
    self.steps.len()
  }
}

struct Slot {
  generation: u32,
  node: Option<Node>,
}

/// Slot storage for nodes with a free list.
///
/// Removing a node bumps its slot's generation, so an old `NodeId` never
/// resolves to whatever is stored in the slot later.
///
/// Freed slots are reused before the arena grows, but `slots` is never
/// shrunk: memory stays at the peak number of nodes alive at once.
#[derive(Default)]
pub(crate) struct NodeArena {
  slots: Vec<Slot>,
  free: Vec<usize>,
  live: usize,
}

impl NodeArena {
  pub(crate) fn with_capacity(capacity: usize) -> Self {
    Self {
      slots: Vec::with_capacity(capacity),
      free: Vec::new(),
      live: 0,
    }
  }

  pub(crate) fn insert(&mut self, node: Node) -> NodeId {
    self.live += 1;
    if let Some(index) = self.free.pop() {
      let slot = &mut self.slots[index];
      slot.node = Some(node);
      return NodeId {
        index,
        generation: slot.generation,
      };
    }
    let index = self.slots.len();
    self.slots.push(Slot {
      generation: 0,
      node: Some(node),
    });
    NodeId { index, generation: 0 }
  }

  pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
    self
      .slots
      .get(id.index)
      .filter(|slot| slot.generation == id.generation)
      .and_then(|slot| slot.node.as_ref())
  }

  pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
    let slot = self.slots.get_mut(id.index)?;
    if slot.generation != id.generation {
      return None;
    }
    let node = slot.node.take()?;
    slot.generation = slot.generation.wrapping_add(1);
    self.free.push(id.index);
    self.live -= 1;
    Some(node)
  }

  /// Removes every node from `tip` down to the root.
  ///
  /// Returns `None` if the walk hits a missing node. Nodes removed before
  /// that point stay removed.
  pub(crate) fn detach_chain(&mut self, tip: NodeId) -> Option<Chain> {
    let mut steps = Vec::new();
    let mut cursor = tip;
    let seed = loop {
      match self.remove(cursor)? {
        Node::Scalar { value } => break value,
        Node::Map { parent, step } => {
          steps.push(Step::Map(step));
          cursor = parent;
        }
        Node::TryMap { parent, step } => {
          steps.push(Step::TryMap(step));
          cursor = parent;
        }
      }
    };
    steps.reverse();
    Some(Chain { seed, steps })
  }

  pub(crate) fn len(&self) -> usize {
    self.live
  }
}
