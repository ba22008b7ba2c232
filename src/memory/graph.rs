//! In-memory filter graph.

use super::ledger::{HandleKind, HandleLedger, Lease};
use crate::error::GraphError;
use crate::format::{FormatDescriptor, FormatEnumerator, FormatPayload};
use crate::graph::FilterGraph;
use crate::media_type::Guid;
use crate::node::{MediaNode, NodeEnumerator, NodeFactory, NodeInfo};
use crate::port::{Direction, MediaPort, PortEnumerator};
use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Identifies a node inside one [`MemoryGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

/// Identifies a port inside one [`MemoryGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortKey(usize);

/// A collaborator failure to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
  /// The graph refuses to enumerate its nodes.
  NodeEnumeration,
  /// The graph refuses to remove nodes.
  Removal,
  /// The graph refuses to remove this node.
  NodeRemoval(NodeKey),
  /// The graph refuses to disconnect ports.
  Disconnect,
  /// The node refuses to report its info.
  NodeInfo(NodeKey),
  /// The node refuses to enumerate its ports.
  PortEnumeration(NodeKey),
  /// The port refuses to report its direction.
  Direction(PortKey),
  /// The port fails to report its peer with an error other than "not connected".
  PeerQuery(PortKey),
  /// The port refuses to enumerate its formats.
  FormatEnumeration(PortKey),
}

struct NodeEntry {
  name: Option<String>,
  ports: Vec<PortKey>,
  in_graph: bool,
}

struct PortEntry {
  direction: Direction,
  formats: Vec<(Guid, Guid)>,
  peer: Option<PortKey>,
}

#[derive(Default)]
struct State {
  nodes: Vec<NodeEntry>,
  ports: Vec<PortEntry>,
  order: Vec<NodeKey>,
  faults: HashSet<Fault>,
  classes: HashMap<Guid, String>,
  // Bumped on every change to the node set; open node enumerations stop.
  generation: u64,
}

struct Inner {
  state: RefCell<State>,
  ledger: Rc<HandleLedger>,
}

impl Inner {
  fn fault(&self, fault: Fault) -> bool {
    self.state.borrow().faults.contains(&fault)
  }
}

/// In-memory graph collaborator.
///
/// `MemoryGraph` is the owner of the graph structure. It builds nodes, ports
/// and connections directly and hands out counted handles implementing
/// [`FilterGraph`], [`MediaNode`] and [`MediaPort`]. Every handle is recorded
/// in the graph's [`HandleLedger`].
///
/// Disconnecting follows the usual filter-graph contract: only the given end
/// of a connection is dropped. Removing a node breaks all of its connections
/// and ends any node enumeration that is still open.
#[derive(Clone)]
pub struct MemoryGraph {
  inner: Rc<Inner>,
}

impl Default for MemoryGraph {
  fn default() -> Self {
    Self::new()
  }
}

impl MemoryGraph {
  /// Creates an empty graph with its own ledger.
  pub fn new() -> Self {
    Self {
      inner: Rc::new(Inner {
        state: RefCell::new(State::default()),
        ledger: HandleLedger::new(),
      }),
    }
  }

  /// The ledger recording every handle handed out by this graph.
  pub fn ledger(&self) -> &HandleLedger {
    &self.inner.ledger
  }

  /// Adds a named node at the end of the graph order.
  pub fn add_node(&self, name: &str) -> NodeKey {
    self.push_node(Some(name.to_string()), true)
  }

  /// Adds a node that reports no name.
  pub fn add_unnamed_node(&self) -> NodeKey {
    self.push_node(None, true)
  }

  fn push_node(&self, name: Option<String>, in_graph: bool) -> NodeKey {
    let mut state = self.inner.state.borrow_mut();
    let key = NodeKey(state.nodes.len());
    state.nodes.push(NodeEntry {
      name,
      ports: Vec::new(),
      in_graph,
    });
    if in_graph {
      state.order.push(key);
      state.generation += 1;
    }
    key
  }

  /// Adds a port to `node` advertising `formats` as `(major, sub)` pairs.
  pub fn add_port(&self, node: NodeKey, direction: Direction, formats: &[(Guid, Guid)]) -> PortKey {
    let mut state = self.inner.state.borrow_mut();
    let key = PortKey(state.ports.len());
    state.ports.push(PortEntry {
      direction,
      formats: formats.to_vec(),
      peer: None,
    });
    state.nodes[node.0].ports.push(key);
    key
  }

  /// Connects an output port to an input port.
  ///
  /// # Errors
  ///
  /// Fails if the directions are wrong or either port is already connected.
  pub fn connect(&self, output: PortKey, input: PortKey) -> Result<(), GraphError> {
    let mut state = self.inner.state.borrow_mut();
    let (out_entry, in_entry) = (&state.ports[output.0], &state.ports[input.0]);
    if out_entry.direction != Direction::Output || in_entry.direction != Direction::Input {
      return Err(GraphError::failed("connections run from an output to an input"));
    }
    if out_entry.peer.is_some() || in_entry.peer.is_some() {
      return Err(GraphError::failed("port is already connected"));
    }
    state.ports[output.0].peer = Some(input);
    state.ports[input.0].peer = Some(output);
    Ok(())
  }

  /// Renames a node, or makes it report no name.
  pub fn set_node_name(&self, node: NodeKey, name: Option<&str>) {
    self.inner.state.borrow_mut().nodes[node.0].name = name.map(str::to_string);
  }

  /// Makes the collaborator fail as described by `fault`.
  pub fn inject(&self, fault: Fault) {
    self.inner.state.borrow_mut().faults.insert(fault);
  }

  /// Stops simulating `fault`.
  pub fn heal(&self, fault: Fault) {
    self.inner.state.borrow_mut().faults.remove(&fault);
  }

  /// Registers a node class that [`NodeFactory::instantiate`] can create.
  pub fn register_class(&self, class_id: Guid, name: &str) {
    self
      .inner
      .state
      .borrow_mut()
      .classes
      .insert(class_id, name.to_string());
  }

  /// Returns a counted handle to the graph.
  pub fn handle(&self) -> Box<dyn FilterGraph> {
    Box::new(self.graph_handle())
  }

  /// Returns a counted handle to the graph, shareable for registration.
  pub fn shared_handle(&self) -> Rc<dyn FilterGraph> {
    Rc::new(self.graph_handle())
  }

  fn graph_handle(&self) -> MemoryGraphHandle {
    MemoryGraphHandle {
      inner: Rc::clone(&self.inner),
      _lease: self.inner.ledger.acquire(HandleKind::Graph),
    }
  }

  /// Returns a counted handle to `node`.
  pub fn node_handle(&self, node: NodeKey) -> Box<dyn MediaNode> {
    Box::new(MemoryNode::new(&self.inner, node))
  }

  /// Returns a counted handle to `port`.
  pub fn port_handle(&self, port: PortKey) -> Box<dyn MediaPort> {
    Box::new(MemoryPort::new(&self.inner, port))
  }

  /// Maps a node handle from this graph back to its key.
  pub fn node_key(&self, node: &dyn MediaNode) -> Option<NodeKey> {
    node
      .as_any()
      .downcast_ref::<MemoryNode>()
      .filter(|node| Rc::ptr_eq(&node.inner, &self.inner))
      .map(|node| node.key)
  }

  /// Maps a port handle from this graph back to its key.
  pub fn port_key(&self, port: &dyn MediaPort) -> Option<PortKey> {
    port
      .as_any()
      .downcast_ref::<MemoryPort>()
      .filter(|port| Rc::ptr_eq(&port.inner, &self.inner))
      .map(|port| port.key)
  }

  /// The port `port` currently reports as its peer.
  pub fn peer_of(&self, port: PortKey) -> Option<PortKey> {
    self.inner.state.borrow().ports[port.0].peer
  }

  /// Whether `node` is still part of the graph.
  pub fn contains(&self, node: NodeKey) -> bool {
    self.inner.state.borrow().nodes[node.0].in_graph
  }

  /// Nodes in graph order.
  pub fn node_keys(&self) -> Vec<NodeKey> {
    self.inner.state.borrow().order.clone()
  }
}

/// Graph handle handed out by [`MemoryGraph`].
pub struct MemoryGraphHandle {
  inner: Rc<Inner>,
  _lease: Lease,
}

impl FilterGraph for MemoryGraphHandle {
  fn nodes(&self) -> Result<NodeEnumerator<'_>, GraphError> {
    if self.inner.fault(Fault::NodeEnumeration) {
      return Err(GraphError::failed("node enumeration refused"));
    }
    let (keys, generation) = {
      let state = self.inner.state.borrow();
      (state.order.clone(), state.generation)
    };
    Ok(Box::new(NodeIter {
      inner: Rc::clone(&self.inner),
      keys: keys.into_iter(),
      generation,
      _lease: self.inner.ledger.acquire(HandleKind::NodeEnumerator),
    }))
  }

  fn disconnect(&self, port: &dyn MediaPort) -> Result<(), GraphError> {
    if self.inner.fault(Fault::Disconnect) {
      return Err(GraphError::failed("disconnect refused"));
    }
    let key = port
      .as_any()
      .downcast_ref::<MemoryPort>()
      .filter(|port| Rc::ptr_eq(&port.inner, &self.inner))
      .map(|port| port.key)
      .ok_or(GraphError::NotFound)?;
    self.inner.state.borrow_mut().ports[key.0].peer = None;
    Ok(())
  }

  fn remove_node(&self, node: &dyn MediaNode) -> Result<(), GraphError> {
    if self.inner.fault(Fault::Removal) {
      return Err(GraphError::failed("removal refused"));
    }
    let key = node
      .as_any()
      .downcast_ref::<MemoryNode>()
      .filter(|node| Rc::ptr_eq(&node.inner, &self.inner))
      .map(|node| node.key)
      .ok_or(GraphError::NotFound)?;
    if self.inner.fault(Fault::NodeRemoval(key)) {
      return Err(GraphError::failed("removal refused"));
    }

    let mut state = self.inner.state.borrow_mut();
    if !state.nodes[key.0].in_graph {
      return Err(GraphError::NotFound);
    }
    for port in state.nodes[key.0].ports.clone() {
      if let Some(peer) = state.ports[port.0].peer.take() {
        state.ports[peer.0].peer = None;
      }
    }
    state.nodes[key.0].in_graph = false;
    state.order.retain(|node| *node != key);
    state.generation += 1;
    Ok(())
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

struct NodeIter {
  inner: Rc<Inner>,
  keys: std::vec::IntoIter<NodeKey>,
  generation: u64,
  _lease: Lease,
}

impl Iterator for NodeIter {
  type Item = Box<dyn MediaNode>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.inner.state.borrow().generation != self.generation {
      // Out of sync with the graph.
      return None;
    }
    let key = self.keys.next()?;
    Some(Box::new(MemoryNode::new(&self.inner, key)))
  }
}

/// Node handle handed out by [`MemoryGraph`].
pub struct MemoryNode {
  inner: Rc<Inner>,
  key: NodeKey,
  _lease: Lease,
}

impl MemoryNode {
  fn new(inner: &Rc<Inner>, key: NodeKey) -> Self {
    Self {
      inner: Rc::clone(inner),
      key,
      _lease: inner.ledger.acquire(HandleKind::Node),
    }
  }
}

impl MediaNode for MemoryNode {
  fn ports(&self) -> Result<PortEnumerator<'_>, GraphError> {
    if self.inner.fault(Fault::PortEnumeration(self.key)) {
      return Err(GraphError::failed("port enumeration refused"));
    }
    let keys = self.inner.state.borrow().nodes[self.key.0].ports.clone();
    Ok(Box::new(PortIter {
      inner: Rc::clone(&self.inner),
      keys: keys.into_iter(),
      _lease: self.inner.ledger.acquire(HandleKind::PortEnumerator),
    }))
  }

  fn query_info(&self) -> Result<NodeInfo, GraphError> {
    if self.inner.fault(Fault::NodeInfo(self.key)) {
      return Err(GraphError::failed("node info unavailable"));
    }
    let (name, in_graph) = {
      let state = self.inner.state.borrow();
      let entry = &state.nodes[self.key.0];
      (entry.name.clone(), entry.in_graph)
    };
    let graph: Option<Box<dyn FilterGraph>> = in_graph.then(|| {
      Box::new(MemoryGraphHandle {
        inner: Rc::clone(&self.inner),
        _lease: self.inner.ledger.acquire(HandleKind::Graph),
      }) as Box<dyn FilterGraph>
    });
    Ok(NodeInfo { name, graph })
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

struct PortIter {
  inner: Rc<Inner>,
  keys: std::vec::IntoIter<PortKey>,
  _lease: Lease,
}

impl Iterator for PortIter {
  type Item = Box<dyn MediaPort>;

  fn next(&mut self) -> Option<Self::Item> {
    let key = self.keys.next()?;
    Some(Box::new(MemoryPort::new(&self.inner, key)))
  }
}

/// Port handle handed out by [`MemoryGraph`].
pub struct MemoryPort {
  inner: Rc<Inner>,
  key: PortKey,
  _lease: Lease,
}

impl MemoryPort {
  fn new(inner: &Rc<Inner>, key: PortKey) -> Self {
    Self {
      inner: Rc::clone(inner),
      key,
      _lease: inner.ledger.acquire(HandleKind::Port),
    }
  }
}

impl MediaPort for MemoryPort {
  fn direction(&self) -> Result<Direction, GraphError> {
    if self.inner.fault(Fault::Direction(self.key)) {
      return Err(GraphError::failed("direction unavailable"));
    }
    Ok(self.inner.state.borrow().ports[self.key.0].direction)
  }

  fn connected_to(&self) -> Result<Box<dyn MediaPort>, GraphError> {
    if self.inner.fault(Fault::PeerQuery(self.key)) {
      return Err(GraphError::failed("peer query failed"));
    }
    let peer = self.inner.state.borrow().ports[self.key.0].peer;
    match peer {
      Some(peer) => Ok(Box::new(MemoryPort::new(&self.inner, peer))),
      None => Err(GraphError::NotConnected),
    }
  }

  fn media_formats(&self) -> Result<FormatEnumerator<'_>, GraphError> {
    if self.inner.fault(Fault::FormatEnumeration(self.key)) {
      return Err(GraphError::failed("format enumeration refused"));
    }
    let formats = self.inner.state.borrow().ports[self.key.0].formats.clone();
    Ok(Box::new(FormatIter {
      ledger: Rc::clone(&self.inner.ledger),
      formats: formats.into_iter(),
      _lease: self.inner.ledger.acquire(HandleKind::FormatEnumerator),
    }))
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

struct FormatIter {
  ledger: Rc<HandleLedger>,
  formats: std::vec::IntoIter<(Guid, Guid)>,
  _lease: Lease,
}

impl Iterator for FormatIter {
  type Item = FormatDescriptor;

  fn next(&mut self) -> Option<Self::Item> {
    let (major_type, sub_type) = self.formats.next()?;
    let payload = FormatPayload {
      bytes: vec![0; 16],
      handle: Some(Box::new(self.ledger.acquire(HandleKind::FormatPayload))),
    };
    Some(FormatDescriptor::new(major_type, sub_type).with_payload(payload))
  }
}

impl NodeFactory for MemoryGraph {
  fn instantiate(&self, class_id: Guid) -> Result<Box<dyn MediaNode>, GraphError> {
    let name = self
      .inner
      .state
      .borrow()
      .classes
      .get(&class_id)
      .cloned()
      .ok_or(GraphError::NotFound)?;
    let key = self.push_node(Some(name), false);
    Ok(self.node_handle(key))
  }
}
