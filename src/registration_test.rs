use crate::config::InspectorConfig;
use crate::error::InspectError;
use crate::graph::FilterGraph;
use crate::memory::{HandleKind, MemoryGraph, MemoryObjectTable, TableFault};
use crate::registration::{Registrar, RegistrationFlags};
use crate::test_support::init_tracing;
use std::rc::Rc;

fn setup() -> (MemoryGraph, Rc<dyn FilterGraph>, MemoryObjectTable, Registrar<MemoryObjectTable>) {
  let graph = MemoryGraph::new();
  graph.add_node("Src");
  let shared = graph.shared_handle();
  let table = MemoryObjectTable::new();
  let registrar = Registrar::new(table.clone());
  (graph, shared, table, registrar)
}

#[test]
fn test_item_name_format() {
  let (_graph, shared, _table, registrar) = setup();
  let item = registrar.moniker_item(&shared);

  let identity = Rc::as_ptr(&shared) as *const () as usize;
  assert_eq!(
    item,
    format!("FilterGraph {:08x} pid {:08x}", identity, std::process::id())
  );
  assert_eq!(registrar.moniker_item(&shared), item);
}

#[test]
fn test_register_publishes_under_item_moniker() {
  init_tracing();
  let (_graph, shared, table, registrar) = setup();

  let token = registrar.register(&shared).unwrap();
  let expected = format!("!{}", registrar.moniker_item(&shared));
  assert_eq!(table.registered_names(), vec![expected]);
  assert_eq!(table.flags_of(token.cookie()), Some(RegistrationFlags::KEEP_ALIVE));
  assert!(table.keeps_alive(token.cookie()));

  assert_eq!(table.ledger().outstanding_of(HandleKind::ObjectTable), 0);
  assert_eq!(table.ledger().outstanding_of(HandleKind::Moniker), 0);

  let mut slot = Some(token);
  assert!(registrar.unregister(&mut slot));
  assert!(slot.is_none());
  assert!(table.registered_names().is_empty());
}

#[test]
fn test_registration_keeps_graph_alive() {
  let (graph, shared, table, registrar) = setup();

  let token = registrar.register(&shared).unwrap();
  drop(shared);
  assert!(table.is_alive(token.cookie()));
  assert_eq!(graph.ledger().outstanding_of(HandleKind::Graph), 1);

  assert!(registrar.unregister(&mut Some(token)));
  assert_eq!(graph.ledger().outstanding(), 0);
}

#[test]
fn test_weak_registration_without_keep_alive() {
  let graph = MemoryGraph::new();
  let shared = graph.shared_handle();
  let table = MemoryObjectTable::new();
  let config = InspectorConfig {
    registration_flags: RegistrationFlags::ALLOW_ANY_CLIENT,
    ..InspectorConfig::default()
  };
  let registrar = Registrar::with_config(table.clone(), config);

  let token = registrar.register(&shared).unwrap();
  let cookie = token.cookie();
  assert!(!table.keeps_alive(cookie));
  assert!(table.is_alive(cookie));

  drop(shared);
  assert!(!table.is_alive(cookie));
  assert!(registrar.unregister(&mut Some(token)));
}

#[test]
fn test_unregister_empty_slot_fails() {
  let (_graph, shared, table, registrar) = setup();

  let mut slot = Some(registrar.register(&shared).unwrap());
  let cookie = slot.as_ref().unwrap().cookie();
  assert!(registrar.unregister(&mut slot));
  assert!(!registrar.unregister(&mut slot));

  let mut other = Some(registrar.register(&shared).unwrap());
  assert_ne!(other.as_ref().unwrap().cookie(), cookie);
  assert_eq!(table.registered_names().len(), 1);
  assert!(registrar.unregister(&mut other));
}

#[test]
fn test_unregister_retries_after_table_unavailable() {
  init_tracing();
  let (graph, shared, table, registrar) = setup();

  let mut slot = Some(registrar.register(&shared).unwrap());
  drop(shared);
  table.inject(TableFault::Open);
  assert!(!registrar.unregister(&mut slot));
  assert!(slot.is_some());
  assert_eq!(table.registered_names().len(), 1);

  table.heal(TableFault::Open);
  assert!(registrar.unregister(&mut slot));
  assert!(slot.is_none());
  assert!(table.registered_names().is_empty());
  assert_eq!(graph.ledger().outstanding(), 0);
  assert_eq!(table.ledger().outstanding(), 0);
}

#[test]
fn test_unregister_retries_after_revoke_refused() {
  init_tracing();
  let (_graph, shared, table, registrar) = setup();

  let mut slot = Some(registrar.register(&shared).unwrap());
  table.inject(TableFault::Revoke);
  assert!(!registrar.unregister(&mut slot));
  assert!(slot.is_some());

  table.heal(TableFault::Revoke);
  assert!(registrar.unregister(&mut slot));
  assert!(table.registered_names().is_empty());
}

#[test]
fn test_each_failing_stage_is_reported() {
  init_tracing();
  let cases = [
    (TableFault::Open, "opening the object table", 0, 0),
    (TableFault::Moniker, "creating the moniker", 1, 0),
    (TableFault::Register, "registering", 1, 1),
  ];

  for (fault, expected_stage, tables, monikers) in cases {
    let (graph, shared, table, registrar) = setup();
    table.inject(fault);

    match registrar.register(&shared) {
      Err(InspectError::Registration { stage, .. }) => assert_eq!(stage, expected_stage),
      other => panic!("unexpected result for {fault:?}: {other:?}"),
    }

    let ledger = table.ledger();
    assert_eq!(ledger.acquired(HandleKind::ObjectTable), tables);
    assert_eq!(ledger.acquired(HandleKind::Moniker), monikers);
    assert_eq!(ledger.outstanding(), 0);
    assert!(table.registered_names().is_empty());

    drop(shared);
    assert_eq!(graph.ledger().outstanding(), 0);
  }
}

#[test]
fn test_scoped_registration_revokes_on_drop() {
  let (_graph, shared, table, registrar) = setup();

  {
    let guard = registrar.register_scoped(&shared).unwrap();
    assert!(table.is_alive(guard.as_ref().unwrap().cookie()));
    assert_eq!(table.registered_names().len(), 1);
  }
  assert!(table.registered_names().is_empty());
}

#[test]
fn test_scoped_registration_can_be_kept() {
  let (_graph, shared, table, registrar) = setup();

  let guard = registrar.register_scoped(&shared).unwrap();
  let mut slot = scopeguard::ScopeGuard::into_inner(guard);
  assert_eq!(table.registered_names().len(), 1);

  assert!(registrar.unregister(&mut slot));
  assert!(table.registered_names().is_empty());
}

#[test]
fn test_scoped_registration_retries_through_guard() {
  init_tracing();
  let (_graph, shared, table, registrar) = setup();

  {
    let mut guard = registrar.register_scoped(&shared).unwrap();
    table.inject(TableFault::Revoke);
    assert!(!registrar.unregister(&mut guard));
    assert!(guard.is_some());

    table.heal(TableFault::Revoke);
    assert!(registrar.unregister(&mut guard));
    assert!(guard.is_none());
  }
  assert!(table.registered_names().is_empty());
  assert_eq!(table.ledger().acquired(HandleKind::ObjectTable), 3);
}

#[test]
fn test_flags() {
  let both = RegistrationFlags::KEEP_ALIVE | RegistrationFlags::ALLOW_ANY_CLIENT;
  assert_eq!(both.bits(), 3);
  assert!(both.contains(RegistrationFlags::KEEP_ALIVE));
  assert!(!RegistrationFlags::ALLOW_ANY_CLIENT.contains(RegistrationFlags::KEEP_ALIVE));
  assert_eq!(RegistrationFlags::default(), RegistrationFlags::KEEP_ALIVE);
  assert_eq!(RegistrationFlags::from_bits(1), RegistrationFlags::KEEP_ALIVE);
  assert_eq!(serde_json::to_string(&both).unwrap(), "3");
}
