use crate::error::{GraphError, InspectError};
use crate::media_type::Guid;
use crate::memory::{HandleKind, HandleLedger, MemoryGraph, MemoryObjectTable, TableFault};
use crate::node::{create_node, node_name, try_create_node};
use crate::port::Direction;
use crate::registration::{ObjectTableProvider, RegistrationFlags};
use crate::test_support::{AUDIO_PCM, init_tracing, source_helper_sink};

// ============================================================================
// HandleLedger
// ============================================================================

#[test]
fn test_ledger_counts_leases() {
  let ledger = HandleLedger::new();
  let first = ledger.acquire(HandleKind::Port);
  let second = ledger.acquire(HandleKind::Port);
  let node = ledger.acquire(HandleKind::Node);
  assert_eq!(first.kind(), HandleKind::Port);
  assert_eq!(ledger.outstanding(), 3);

  drop(first);
  assert_eq!(ledger.acquired(HandleKind::Port), 2);
  assert_eq!(ledger.released(HandleKind::Port), 1);
  assert_eq!(ledger.outstanding_of(HandleKind::Port), 1);

  drop(second);
  drop(node);
  assert_eq!(ledger.outstanding(), 0);
  assert_eq!(format!("{:?}", ledger), "{Node: 1/1, Port: 2/2}");
}

// ============================================================================
// MemoryGraph
// ============================================================================

#[test]
fn test_connect_checks_directions_and_peers() {
  let fixture = source_helper_sink();
  let graph = &fixture.graph;

  assert!(graph.connect(fixture.helper_in, fixture.sink_in).is_err());
  assert!(graph.connect(fixture.source_out, fixture.helper_in).is_err());
  assert_eq!(graph.peer_of(fixture.helper_in), None);
}

#[test]
fn test_disconnect_drops_one_end() {
  let fixture = source_helper_sink();
  let graph = fixture.graph.handle();
  let port = fixture.graph.port_handle(fixture.sink_in);

  graph.disconnect(port.as_ref()).unwrap();
  assert_eq!(fixture.graph.peer_of(fixture.sink_in), None);
  assert_eq!(fixture.graph.peer_of(fixture.source_out), Some(fixture.sink_in));
}

#[test]
fn test_handles_from_other_graphs_are_rejected() {
  let fixture = source_helper_sink();
  let other = MemoryGraph::new();
  let node = other.add_node("stranger");
  let port = other.add_port(node, Direction::Input, &[AUDIO_PCM]);
  let graph = fixture.graph.handle();

  let node = other.node_handle(node);
  let port = other.port_handle(port);
  assert_eq!(graph.remove_node(node.as_ref()), Err(GraphError::NotFound));
  assert_eq!(graph.disconnect(port.as_ref()), Err(GraphError::NotFound));
  assert_eq!(fixture.graph.node_key(node.as_ref()), None);
  assert_eq!(fixture.graph.port_key(port.as_ref()), None);
}

#[test]
fn test_removal_ends_open_enumeration() {
  let fixture = source_helper_sink();
  let graph = fixture.graph.handle();

  let mut nodes = graph.nodes().unwrap();
  let first = nodes.next().unwrap();
  assert_eq!(fixture.graph.node_key(first.as_ref()), Some(fixture.source));

  let helper = fixture.graph.node_handle(fixture.helper);
  graph.remove_node(helper.as_ref()).unwrap();
  assert!(nodes.next().is_none());
  assert_eq!(graph.remove_node(helper.as_ref()), Err(GraphError::NotFound));

  let query = helper.query_info().unwrap();
  assert_eq!(query.name.as_deref(), Some("H1"));
  assert!(query.graph.is_none());
}

#[test]
fn test_removal_breaks_connections_both_ways() {
  let fixture = source_helper_sink();
  let graph = fixture.graph.handle();
  let sink = fixture.graph.node_handle(fixture.sink);

  graph.remove_node(sink.as_ref()).unwrap();
  assert_eq!(fixture.graph.peer_of(fixture.source_out), None);
  assert_eq!(fixture.graph.peer_of(fixture.sink_in), None);
  assert_eq!(fixture.graph.node_keys(), vec![fixture.source, fixture.helper]);
}

#[test]
fn test_node_info_carries_owning_graph() {
  let fixture = source_helper_sink();
  let node = fixture.graph.node_handle(fixture.helper);

  let info = node.query_info().unwrap();
  assert!(info.graph.is_some());
  assert_eq!(fixture.graph.ledger().outstanding_of(HandleKind::Graph), 1);
  drop(info);

  assert_eq!(node_name(node.as_ref()), Some("H1".to_string()));
  assert_eq!(fixture.graph.ledger().outstanding_of(HandleKind::Graph), 0);
}

#[test]
fn test_factory_creates_detached_nodes() {
  init_tracing();
  let graph = MemoryGraph::new();
  let class_id = Guid::from_u128(0xdeadbeef);
  graph.register_class(class_id, "Null Renderer");

  let node = create_node(&graph, class_id).unwrap();
  assert_eq!(node_name(node.as_ref()), Some("Null Renderer".to_string()));
  assert!(node.query_info().unwrap().graph.is_none());
  assert!(graph.node_keys().is_empty());

  let missing = Guid::from_u128(1);
  match create_node(&graph, missing) {
    Err(InspectError::Instantiation { class_id, source }) => {
      assert_eq!(class_id, missing);
      assert_eq!(source, GraphError::NotFound);
    }
    other => panic!("unexpected result: {:?}", other.map(|_| ())),
  }
  assert!(try_create_node(&graph, missing).is_none());
}

// ============================================================================
// MemoryObjectTable
// ============================================================================

#[test]
fn test_object_table_cookies_and_revoke() {
  let graph = MemoryGraph::new();
  let table = MemoryObjectTable::new();
  let handle = table.object_table().unwrap();
  let moniker = table.item_moniker("!", "item").unwrap();
  assert_eq!(moniker.display_name(), "!item");

  let first = handle
    .register(RegistrationFlags::KEEP_ALIVE, graph.shared_handle(), moniker.as_ref())
    .unwrap();
  let second = handle
    .register(RegistrationFlags::KEEP_ALIVE, graph.shared_handle(), moniker.as_ref())
    .unwrap();
  assert_eq!((first, second), (1, 2));

  assert_eq!(handle.revoke(first), Ok(()));
  assert_eq!(handle.revoke(first), Err(GraphError::NotFound));
  assert_eq!(table.registered_names(), vec!["!item".to_string()]);

  table.inject(TableFault::Revoke);
  assert!(handle.revoke(second).is_err());
  table.heal(TableFault::Revoke);
  assert!(handle.revoke(second).is_ok());
  assert_eq!(graph.ledger().outstanding(), 0);
}
