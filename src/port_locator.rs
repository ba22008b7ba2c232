//! # Port Locator
//!
//! Finds ports on a single node by direction, connection state and position.
//!
//! Every function here returns at most one owned port handle. All other
//! handles acquired on the way (port handles, peer handles, the port
//! enumerator) are dropped before the function returns.
//!
//! ## Qualifying ports
//!
//! A port *qualifies* for `(direction, connected)` when its direction equals
//! `direction` and:
//!
//! - `connected == true` and asking for its peer succeeds, or
//! - `connected == false` and asking for its peer fails with
//!   [`GraphError::NotConnected`].
//!
//! A port whose direction or peer cannot be queried for any other reason
//! qualifies for neither.

use crate::error::GraphError;
use crate::format_matcher::{FormatField, prefers};
use crate::media_type::Guid;
use crate::node::MediaNode;
use crate::port::{Direction, MediaPort};
use crate::scanner::disconnect;
use tracing::{trace, warn};

/// Reports whether `port` is connected.
///
/// Returns `None` when the connection state could not be determined. The
/// peer handle obtained while asking is released immediately.
pub fn connection_state(port: &dyn MediaPort) -> Option<bool> {
  match port.connected_to() {
    Ok(peer) => {
      drop(peer);
      Some(true)
    }
    Err(GraphError::NotConnected) => Some(false),
    Err(err) => {
      trace!(error = %err, "could not determine connection state");
      None
    }
  }
}

fn qualifies(port: &dyn MediaPort, direction: Direction, connected: bool) -> bool {
  match port.direction() {
    Ok(port_direction) if port_direction == direction => {
      connection_state(port) == Some(connected)
    }
    _ => false,
  }
}

/// Returns the qualifying port at position `skip` among all qualifying ports
/// of `node`, in enumeration order.
///
/// # Arguments
///
/// * `node` - Node whose ports are searched
/// * `direction` - Required port direction
/// * `connected` - Whether the port must be connected (`true`) or unconnected (`false`)
/// * `skip` - How many qualifying ports to pass over before returning one
///
/// # Returns
///
/// An owned handle to the port, or `None` if the node's ports cannot be
/// enumerated or fewer than `skip + 1` ports qualify.
pub fn find_port(
  node: &dyn MediaNode,
  direction: Direction,
  connected: bool,
  skip: usize,
) -> Option<Box<dyn MediaPort>> {
  let ports = match node.ports() {
    Ok(ports) => ports,
    Err(err) => {
      trace!(error = %err, "could not enumerate node ports");
      return None;
    }
  };

  ports
    .filter(|port| qualifies(port.as_ref(), direction, connected))
    .nth(skip)
}

/// Returns the first unconnected port of `direction`.
pub fn find_unconnected_port(
  node: &dyn MediaNode,
  direction: Direction,
) -> Option<Box<dyn MediaPort>> {
  find_port(node, direction, false, 0)
}

/// Returns the first connected port of `direction`.
pub fn find_connected_port(node: &dyn MediaNode, direction: Direction) -> Option<Box<dyn MediaPort>> {
  find_port(node, direction, true, 0)
}

/// Iterates the qualifying ports of `node` one position at a time.
///
/// Each step re-runs [`find_port`] with the next `skip`, so no enumerator is
/// held between steps.
pub fn qualifying_ports(
  node: &dyn MediaNode,
  direction: Direction,
  connected: bool,
) -> impl Iterator<Item = Box<dyn MediaPort>> + '_ {
  (0..).map_while(move |skip| find_port(node, direction, connected, skip))
}

/// Options for [`find_port_by_format`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSearch {
  /// Also look at connected ports when no unconnected port matches.
  pub search_connected: bool,
  /// Disconnect a matching connected port before returning it.
  pub disconnect_if_found: bool,
}

impl FormatSearch {
  /// Search unconnected ports only.
  pub const UNCONNECTED: FormatSearch = FormatSearch {
    search_connected: false,
    disconnect_if_found: false,
  };

  /// Search unconnected, then connected ports; leave a match connected.
  pub const ANY: FormatSearch = FormatSearch {
    search_connected: true,
    disconnect_if_found: false,
  };

  /// Search unconnected, then connected ports; disconnect a connected match.
  pub const ANY_DISCONNECTING: FormatSearch = FormatSearch {
    search_connected: true,
    disconnect_if_found: true,
  };
}

fn prefers_any(port: &dyn MediaPort, major_types: &[Guid]) -> bool {
  major_types
    .iter()
    .any(|major_type| prefers(port, FormatField::MajorType, major_type))
}

/// Returns the first port of `direction` whose preferred format has one of
/// `major_types` as its major type.
///
/// Unconnected ports are searched first. When none matches and
/// `search.search_connected` is set, connected ports are searched next. A
/// connected match is disconnected through the node's owning graph when
/// `search.disconnect_if_found` is set; if the owning graph cannot be
/// obtained, the port is returned still connected.
pub fn find_port_by_format(
  node: &dyn MediaNode,
  direction: Direction,
  major_types: &[Guid],
  search: FormatSearch,
) -> Option<Box<dyn MediaPort>> {
  if let Some(port) = qualifying_ports(node, direction, false)
    .find(|port| prefers_any(port.as_ref(), major_types))
  {
    return Some(port);
  }

  if !search.search_connected {
    return None;
  }

  let port = qualifying_ports(node, direction, true)
    .find(|port| prefers_any(port.as_ref(), major_types))?;

  if search.disconnect_if_found {
    match node.query_info() {
      Ok(info) => match info.graph {
        Some(graph) => {
          if let Err(err) = disconnect(graph.as_ref(), port.as_ref()) {
            warn!(error = %err, "could not disconnect matching port");
          }
        }
        None => trace!("node is not in a graph; returning port still connected"),
      },
      Err(err) => {
        trace!(error = %err, "could not resolve owning graph; returning port still connected")
      }
    }
  }

  Some(port)
}
