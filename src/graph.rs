//! # Filter Graph
//!
//! The graph owns nodes and the connections between their ports. It is
//! shared and externally mutable: this layer takes no locks and assumes no
//! other party mutates the graph while one of its scans is running.

use crate::error::GraphError;
use crate::node::{MediaNode, NodeEnumerator};
use crate::port::MediaPort;
use std::any::Any;

/// Handle to an externally owned graph.
///
/// Structural operations take `&self`: the graph is a shared handle and
/// mutation goes through the collaborator, not through Rust ownership.
pub trait FilterGraph {
  /// Opens an enumeration over all nodes, in the graph's order.
  ///
  /// The enumeration is invalidated by structural changes; callers that
  /// remove nodes must reopen it.
  fn nodes(&self) -> Result<NodeEnumerator<'_>, GraphError>;

  /// Drops the connection at `port`'s end only.
  ///
  /// Disconnecting an unconnected port succeeds without effect. The peer
  /// still reports the connection until it is disconnected too.
  fn disconnect(&self, port: &dyn MediaPort) -> Result<(), GraphError>;

  /// Removes `node` from the graph, breaking all of its connections.
  fn remove_node(&self, node: &dyn MediaNode) -> Result<(), GraphError>;

  /// Access to the concrete handle type.
  fn as_any(&self) -> &dyn Any;
}
