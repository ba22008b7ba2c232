//! # Graph Scanner
//!
//! Graph-wide queries built on the [port locator](crate::port_locator) and the
//! [format matcher](crate::format_matcher):
//!
//! - [`enumerate_node_names`] lists every node's display name
//! - [`find_port_across_graph`] finds a port anywhere in the graph
//! - [`describe_graph`] / [`trace_graph`] dump every node and port for diagnostics
//! - [`disconnect`] breaks a connection from both ends
//!
//! Scans keep going past failures on individual nodes. Only a failure to
//! start the node enumeration ends a scan early.

use crate::error::{GraphError, InspectError, InspectResult};
use crate::format_matcher::{FormatField, media_type_of, prefers};
use crate::graph::FilterGraph;
use crate::media_type::Guid;
use crate::node::{MediaNode, NodeEnumerator};
use crate::port::{Direction, MediaPort};
use crate::port_locator::{find_port, qualifying_ports};
use serde::Serialize;
use tracing::{debug, trace};

/// Placeholder recorded by [`enumerate_node_names`] for nodes without a name.
pub const NAME_PLACEHOLDER: &str = "Could not get the filter info";

/// Placeholder used by graph traces for nodes without a name.
pub const TRACE_PLACEHOLDER: &str = "Unknown filter";

fn open_nodes(graph: &dyn FilterGraph) -> InspectResult<NodeEnumerator<'_>> {
  graph
    .nodes()
    .map_err(|source| InspectError::EnumerationStart {
      what: "nodes",
      source,
    })
}

fn name_or(node: &dyn MediaNode, placeholder: &str) -> String {
  match node.query_info() {
    Ok(info) => info.name.unwrap_or_else(|| placeholder.to_string()),
    Err(err) => {
      trace!(error = %err, "could not query node info");
      placeholder.to_string()
    }
  }
}

/// Lists the display name of every node, in graph order.
///
/// Nodes whose name cannot be retrieved are listed as `placeholder`.
///
/// # Errors
///
/// Returns [`InspectError::EnumerationStart`] if the graph refuses to
/// enumerate its nodes.
pub fn enumerate_node_names(graph: &dyn FilterGraph, placeholder: &str) -> InspectResult<Vec<String>> {
  let nodes = open_nodes(graph)?;
  Ok(nodes.map(|node| name_or(node.as_ref(), placeholder)).collect())
}

/// Returns the first port in the graph that qualifies for
/// `(direction, connected)` and whose preferred format has `field == value`.
///
/// Only the first qualifying port of each node is considered. Nodes are
/// visited in graph order and the scan stops at the first match.
pub fn find_port_across_graph(
  graph: &dyn FilterGraph,
  direction: Direction,
  connected: bool,
  field: FormatField,
  value: &Guid,
) -> Option<Box<dyn MediaPort>> {
  let nodes = match open_nodes(graph) {
    Ok(nodes) => nodes,
    Err(err) => {
      trace!(error = %err, "graph-wide port search aborted");
      return None;
    }
  };

  nodes
    .filter_map(|node| find_port(node.as_ref(), direction, connected, 0))
    .find(|port| prefers(port.as_ref(), field, value))
}

/// [`find_port_across_graph`] matching on the major type.
pub fn find_port_by_major_type(
  graph: &dyn FilterGraph,
  direction: Direction,
  connected: bool,
  major_type: &Guid,
) -> Option<Box<dyn MediaPort>> {
  find_port_across_graph(graph, direction, connected, FormatField::MajorType, major_type)
}

/// [`find_port_across_graph`] matching on the sub type.
pub fn find_port_by_sub_type(
  graph: &dyn FilterGraph,
  direction: Direction,
  connected: bool,
  sub_type: &Guid,
) -> Option<Box<dyn MediaPort>> {
  find_port_across_graph(graph, direction, connected, FormatField::SubType, sub_type)
}

/// One port line of a graph trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortTrace {
  /// Port direction.
  pub direction: Direction,
  /// Whether the port was connected when traced.
  pub connected: bool,
  /// Name of the first advertised major type.
  pub media_type: &'static str,
}

/// One node of a graph trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTrace {
  /// Display name, or the trace placeholder.
  pub name: String,
  /// Input ports then output ports; connected ports before unconnected ones.
  pub ports: Vec<PortTrace>,
}

fn describe_node(node: &dyn MediaNode, placeholder: &str) -> NodeTrace {
  let mut ports = Vec::new();
  for direction in Direction::ALL {
    for connected in [true, false] {
      ports.extend(
        qualifying_ports(node, direction, connected).map(|port| PortTrace {
          direction,
          connected,
          media_type: media_type_of(port.as_ref()),
        }),
      );
    }
  }
  NodeTrace {
    name: name_or(node, placeholder),
    ports,
  }
}

/// Collects a structured description of every node and port in the graph.
///
/// # Errors
///
/// Returns [`InspectError::EnumerationStart`] if the graph refuses to
/// enumerate its nodes.
pub fn describe_graph(graph: &dyn FilterGraph, placeholder: &str) -> InspectResult<Vec<NodeTrace>> {
  let nodes = open_nodes(graph)?;
  Ok(nodes.map(|node| describe_node(node.as_ref(), placeholder)).collect())
}

/// Logs every node and port in the graph at `debug` level.
///
/// Read-only: the graph is not modified.
///
/// # Errors
///
/// Returns [`InspectError::EnumerationStart`] if the graph refuses to
/// enumerate its nodes. Callers normally log this and carry on.
pub fn trace_graph(graph: &dyn FilterGraph, placeholder: &str) -> InspectResult<()> {
  let nodes = open_nodes(graph)?;
  debug!("Tracing filter graph...");
  for node in nodes {
    let trace = describe_node(node.as_ref(), placeholder);
    debug!(node = %trace.name, "Filter: {}", trace.name);
    for port in &trace.ports {
      debug!(
        node = %trace.name,
        direction = %port.direction,
        connected = port.connected,
        "  {} pin: type: {}, connected: {}",
        port.direction,
        port.media_type,
        if port.connected { "True" } else { "False" },
      );
    }
  }
  Ok(())
}

/// Breaks the connection at `port`, peer end first, through `owner`.
///
/// Both ends of a connection have to be told to drop it. If `port` has no
/// peer only `port` itself is disconnected, which the graph treats as a
/// no-op.
///
/// # Errors
///
/// Returns the graph's error if either disconnect is refused.
pub fn disconnect(owner: &dyn FilterGraph, port: &dyn MediaPort) -> Result<(), GraphError> {
  if let Ok(peer) = port.connected_to() {
    owner.disconnect(peer.as_ref())?;
  }
  owner.disconnect(port)
}
