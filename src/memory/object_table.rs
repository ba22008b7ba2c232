//! In-memory object table for graph registration.

use super::ledger::{HandleKind, HandleLedger, Lease};
use crate::error::GraphError;
use crate::graph::FilterGraph;
use crate::registration::{Moniker, ObjectTable, ObjectTableProvider, RegistrationFlags};
use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::{Rc, Weak};

/// A table failure to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFault {
  /// The table cannot be opened.
  Open,
  /// Monikers cannot be created.
  Moniker,
  /// The table refuses new registrations.
  Register,
  /// The table refuses to revoke registrations.
  Revoke,
}

enum Held {
  // Held only to keep the graph alive.
  Strong { _graph: Rc<dyn FilterGraph> },
  Weak(Weak<dyn FilterGraph>),
}

struct Entry {
  name: String,
  flags: RegistrationFlags,
  object: Held,
}

#[derive(Default)]
struct State {
  entries: BTreeMap<u32, Entry>,
  next_cookie: u32,
  faults: HashSet<TableFault>,
}

struct Inner {
  state: RefCell<State>,
  ledger: Rc<HandleLedger>,
}

/// In-memory object table.
///
/// Registrations made with [`RegistrationFlags::KEEP_ALIVE`] hold a strong
/// reference to the graph; others hold a weak one.
#[derive(Clone)]
pub struct MemoryObjectTable {
  inner: Rc<Inner>,
}

impl Default for MemoryObjectTable {
  fn default() -> Self {
    Self::new()
  }
}

impl MemoryObjectTable {
  /// Creates an empty table with its own ledger.
  pub fn new() -> Self {
    Self {
      inner: Rc::new(Inner {
        state: RefCell::new(State {
          next_cookie: 1,
          ..State::default()
        }),
        ledger: HandleLedger::new(),
      }),
    }
  }

  /// The ledger recording table and moniker handles.
  pub fn ledger(&self) -> &HandleLedger {
    &self.inner.ledger
  }

  /// Makes the table fail as described by `fault`.
  pub fn inject(&self, fault: TableFault) {
    self.inner.state.borrow_mut().faults.insert(fault);
  }

  /// Stops simulating `fault`.
  pub fn heal(&self, fault: TableFault) {
    self.inner.state.borrow_mut().faults.remove(&fault);
  }

  /// Display names of all live registrations, by cookie order.
  pub fn registered_names(&self) -> Vec<String> {
    self
      .inner
      .state
      .borrow()
      .entries
      .values()
      .map(|entry| entry.name.clone())
      .collect()
  }

  /// Flags a registration was made with.
  pub fn flags_of(&self, cookie: u32) -> Option<RegistrationFlags> {
    self.inner.state.borrow().entries.get(&cookie).map(|entry| entry.flags)
  }

  /// Whether the registration holds its graph alive.
  pub fn keeps_alive(&self, cookie: u32) -> bool {
    matches!(
      self.inner.state.borrow().entries.get(&cookie).map(|entry| &entry.object),
      Some(Held::Strong { .. })
    )
  }

  /// Whether the graph behind a registration is still reachable.
  pub fn is_alive(&self, cookie: u32) -> bool {
    match self.inner.state.borrow().entries.get(&cookie).map(|entry| &entry.object) {
      Some(Held::Strong { .. }) => true,
      Some(Held::Weak(weak)) => weak.strong_count() > 0,
      None => false,
    }
  }

  fn fault(&self, fault: TableFault) -> bool {
    self.inner.state.borrow().faults.contains(&fault)
  }
}

impl ObjectTableProvider for MemoryObjectTable {
  fn object_table(&self) -> Result<Box<dyn ObjectTable>, GraphError> {
    if self.fault(TableFault::Open) {
      return Err(GraphError::failed("object table unavailable"));
    }
    Ok(Box::new(TableHandle {
      inner: Rc::clone(&self.inner),
      _lease: self.inner.ledger.acquire(HandleKind::ObjectTable),
    }))
  }

  fn item_moniker(&self, delimiter: &str, item: &str) -> Result<Box<dyn Moniker>, GraphError> {
    if self.fault(TableFault::Moniker) {
      return Err(GraphError::failed("moniker creation failed"));
    }
    Ok(Box::new(ItemMoniker {
      name: format!("{}{}", delimiter, item),
      _lease: self.inner.ledger.acquire(HandleKind::Moniker),
    }))
  }
}

struct TableHandle {
  inner: Rc<Inner>,
  _lease: Lease,
}

impl ObjectTable for TableHandle {
  fn register(
    &self,
    flags: RegistrationFlags,
    object: Rc<dyn FilterGraph>,
    moniker: &dyn Moniker,
  ) -> Result<u32, GraphError> {
    let mut state = self.inner.state.borrow_mut();
    if state.faults.contains(&TableFault::Register) {
      return Err(GraphError::failed("registration refused"));
    }
    let cookie = state.next_cookie;
    state.next_cookie += 1;
    let object = if flags.contains(RegistrationFlags::KEEP_ALIVE) {
      Held::Strong { _graph: object }
    } else {
      Held::Weak(Rc::downgrade(&object))
    };
    state.entries.insert(
      cookie,
      Entry {
        name: moniker.display_name(),
        flags,
        object,
      },
    );
    Ok(cookie)
  }

  fn revoke(&self, cookie: u32) -> Result<(), GraphError> {
    let mut state = self.inner.state.borrow_mut();
    if state.faults.contains(&TableFault::Revoke) {
      return Err(GraphError::failed("revocation refused"));
    }
    state
      .entries
      .remove(&cookie)
      .map(|_| ())
      .ok_or(GraphError::NotFound)
  }
}

struct ItemMoniker {
  name: String,
  _lease: Lease,
}

impl Moniker for ItemMoniker {
  fn display_name(&self) -> String {
    self.name.clone()
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
