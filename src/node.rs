//! # Nodes
//!
//! A node is a processing unit in the graph (source, transform or sink).
//! The inspector never creates or destroys nodes that live in a graph; it
//! only borrows handles to them, and for pruning asks the graph to remove
//! them.

use crate::error::{GraphError, InspectError, InspectResult};
use crate::graph::FilterGraph;
use crate::media_type::Guid;
use crate::port::PortEnumerator;
use std::any::Any;
use std::fmt;
use tracing::warn;

/// Information reported by [`MediaNode::query_info`].
///
/// The owning-graph handle is an owned reference; it is released when the
/// info is dropped.
#[derive(Default)]
pub struct NodeInfo {
  /// Display name, when the node has one.
  pub name: Option<String>,
  /// Graph the node currently belongs to.
  pub graph: Option<Box<dyn FilterGraph>>,
}

impl NodeInfo {
  /// Creates info carrying only a name.
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      graph: None,
    }
  }
}

impl fmt::Debug for NodeInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NodeInfo")
      .field("name", &self.name)
      .field("graph", &self.graph.as_ref().map(|_| "Some(graph)"))
      .finish()
  }
}

/// Handle to a node owned by the external graph.
pub trait MediaNode {
  /// Opens an enumeration over the node's ports, in the node's own order.
  fn ports(&self) -> Result<PortEnumerator<'_>, GraphError>;

  /// Returns the node's display name and owning graph.
  fn query_info(&self) -> Result<NodeInfo, GraphError>;

  /// Access to the concrete handle type.
  fn as_any(&self) -> &dyn Any;
}

/// Sequence of node handles opened from one graph.
pub type NodeEnumerator<'a> = Box<dyn Iterator<Item = Box<dyn MediaNode>> + 'a>;

/// Creates detached nodes from a class identity.
pub trait NodeFactory {
  /// Instantiates the node class identified by `class_id`.
  fn instantiate(&self, class_id: Guid) -> Result<Box<dyn MediaNode>, GraphError>;
}

/// Returns the display name of `node`, or `None` when it cannot be resolved.
///
/// The owning-graph reference returned alongside the name is released before
/// this function returns.
pub fn node_name(node: &dyn MediaNode) -> Option<String> {
  node.query_info().ok().and_then(|info| info.name)
}

/// Instantiates a detached node of class `class_id`.
///
/// # Errors
///
/// Returns [`InspectError::Instantiation`] if the factory cannot create it.
pub fn create_node(factory: &dyn NodeFactory, class_id: Guid) -> InspectResult<Box<dyn MediaNode>> {
  factory
    .instantiate(class_id)
    .map_err(|source| InspectError::Instantiation { class_id, source })
}

/// Like [`create_node`], but logs the failure and returns `None`.
pub fn try_create_node(factory: &dyn NodeFactory, class_id: Guid) -> Option<Box<dyn MediaNode>> {
  match create_node(factory, class_id) {
    Ok(node) => Some(node),
    Err(err) => {
      warn!(error = %err, "node instantiation failed");
      None
    }
  }
}
