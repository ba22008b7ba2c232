//! # Graph Pruner
//!
//! Strips nodes left dangling after partial graph construction: every node
//! other than the designated source that has no connected input port is
//! removed from the graph.
//!
//! Removing a node invalidates the node enumeration, so each removal ends
//! the current pass and the next pass reopens the enumeration from the top.
//! Pruning stops when a full pass removes nothing.
//!
//! Nodes are identified by display name. Two distinct nodes sharing the
//! source's name are both treated as the source and never pruned, and nodes
//! whose name cannot be read are left alone.

use crate::error::{InspectError, InspectResult};
use crate::graph::FilterGraph;
use crate::node::{MediaNode, node_name};
use crate::port::Direction;
use crate::port_locator::find_connected_port;
use tracing::{debug, trace};

/// Finds the first node, in graph order, that may be pruned.
///
/// The node enumeration is released before this returns, so the caller may
/// mutate the graph with the returned handle.
fn next_redundant(
  graph: &dyn FilterGraph,
  source_name: &str,
) -> InspectResult<Option<(Box<dyn MediaNode>, String)>> {
  let nodes = graph
    .nodes()
    .map_err(|source| InspectError::EnumerationStart {
      what: "nodes",
      source,
    })?;

  for node in nodes {
    let Some(name) = node_name(node.as_ref()) else {
      trace!("skipping node without a readable name");
      continue;
    };
    if name == source_name {
      continue;
    }
    match find_connected_port(node.as_ref(), Direction::Input) {
      Some(_port) => trace!(node = %name, "node has a connected input"),
      None => return Ok(Some((node, name))),
    }
  }
  Ok(None)
}

/// Removes every node except `source` that has no connected input port,
/// repeating until the graph reaches a fixed point.
///
/// # Arguments
///
/// * `source` - The node to keep even if its inputs are unconnected
/// * `graph` - The graph to prune
///
/// # Returns
///
/// The number of nodes removed. When the source's name cannot be read
/// nothing can be told apart from it, so nothing is removed.
///
/// # Errors
///
/// Returns [`InspectError::Removal`] if the graph refuses to remove a node;
/// it carries the number of nodes removed before the refusal.
/// A failure to enumerate nodes ends pruning without an error; the count of
/// nodes removed so far is returned.
pub fn prune_redundant(source: &dyn MediaNode, graph: &dyn FilterGraph) -> InspectResult<usize> {
  let Some(source_name) = node_name(source) else {
    debug!("source node has no readable name; nothing pruned");
    return Ok(0);
  };

  let mut removed = 0;
  loop {
    let candidate = match next_redundant(graph, &source_name) {
      Ok(candidate) => candidate,
      Err(err) => {
        trace!(error = %err, "pruning pass aborted");
        break;
      }
    };
    let Some((node, name)) = candidate else {
      break;
    };

    graph
      .remove_node(node.as_ref())
      .map_err(|source| InspectError::Removal {
        node: name.clone(),
        removed,
        source,
      })?;
    debug!(node = %name, "removed node without connected input");
    removed += 1;
  }

  Ok(removed)
}
