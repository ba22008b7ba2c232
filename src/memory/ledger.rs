//! Handle accounting for the in-memory collaborator.
//!
//! Every handle the in-memory graph hands out carries a [`Lease`]. Creating
//! the lease counts an acquisition, dropping it counts a release, so after
//! any inspection call the ledger shows exactly which handles are still held.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Kind of handle tracked by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandleKind {
  /// Graph handle.
  Graph,
  /// Node handle.
  Node,
  /// Port handle.
  Port,
  /// Node enumerator.
  NodeEnumerator,
  /// Port enumerator.
  PortEnumerator,
  /// Format enumerator.
  FormatEnumerator,
  /// Handle nested in a format payload.
  FormatPayload,
  /// Object table handle.
  ObjectTable,
  /// Moniker handle.
  Moniker,
}

#[derive(Default)]
struct Counts {
  acquired: HashMap<HandleKind, usize>,
  released: HashMap<HandleKind, usize>,
}

/// Acquisition and release counters, per handle kind.
#[derive(Default)]
pub struct HandleLedger {
  counts: RefCell<Counts>,
}

impl HandleLedger {
  /// Creates an empty ledger.
  pub fn new() -> Rc<Self> {
    Rc::new(Self::default())
  }

  /// Records an acquisition and returns the lease that records its release.
  pub fn acquire(self: &Rc<Self>, kind: HandleKind) -> Lease {
    *self.counts.borrow_mut().acquired.entry(kind).or_default() += 1;
    Lease {
      ledger: Rc::clone(self),
      kind,
    }
  }

  fn release(&self, kind: HandleKind) {
    *self.counts.borrow_mut().released.entry(kind).or_default() += 1;
  }

  /// Number of handles of `kind` ever acquired.
  pub fn acquired(&self, kind: HandleKind) -> usize {
    self.counts.borrow().acquired.get(&kind).copied().unwrap_or(0)
  }

  /// Number of handles of `kind` released.
  pub fn released(&self, kind: HandleKind) -> usize {
    self.counts.borrow().released.get(&kind).copied().unwrap_or(0)
  }

  /// Handles of `kind` acquired but not yet released.
  pub fn outstanding_of(&self, kind: HandleKind) -> usize {
    self.acquired(kind) - self.released(kind)
  }

  /// Handles of any kind acquired but not yet released.
  pub fn outstanding(&self) -> usize {
    let counts = self.counts.borrow();
    let acquired: usize = counts.acquired.values().sum();
    let released: usize = counts.released.values().sum();
    acquired - released
  }
}

impl fmt::Debug for HandleLedger {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let counts = self.counts.borrow();
    let mut kinds: Vec<_> = counts.acquired.keys().copied().collect();
    kinds.sort();
    let mut map = f.debug_map();
    for kind in kinds {
      let acquired = counts.acquired.get(&kind).copied().unwrap_or(0);
      let released = counts.released.get(&kind).copied().unwrap_or(0);
      map.entry(&kind, &format_args!("{}/{}", released, acquired));
    }
    map.finish()
  }
}

/// One counted reference. Dropping it records the release.
pub struct Lease {
  ledger: Rc<HandleLedger>,
  kind: HandleKind,
}

impl Lease {
  /// Kind of handle this lease accounts for.
  pub fn kind(&self) -> HandleKind {
    self.kind
  }
}

impl Drop for Lease {
  fn drop(&mut self) {
    self.ledger.release(self.kind);
  }
}

impl fmt::Debug for Lease {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Lease({:?})", self.kind)
  }
}
