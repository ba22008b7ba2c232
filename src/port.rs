//! # Ports
//!
//! A port is a typed connection point on a node. Ports are directional and a
//! port is connected to at most one peer, always of the opposite direction.
//! Connection state is not stored on the handle: it is obtained at call time
//! by asking the port for its peer.

use crate::error::GraphError;
use crate::format::FormatEnumerator;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
  /// Data flows into the node through this port.
  Input,
  /// Data flows out of the node through this port.
  Output,
}

impl Direction {
  /// Both directions, in the order graph traces list them.
  pub const ALL: [Direction; 2] = [Direction::Input, Direction::Output];

  /// Returns the opposite direction.
  pub fn opposite(self) -> Self {
    match self {
      Direction::Input => Direction::Output,
      Direction::Output => Direction::Input,
    }
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Direction::Input => write!(f, "Input"),
      Direction::Output => write!(f, "Output"),
    }
  }
}

/// Handle to a port owned by the external graph.
///
/// Holding a `Box<dyn MediaPort>` is holding one reference to the port;
/// dropping the box releases it.
pub trait MediaPort {
  /// Returns the direction of this port.
  fn direction(&self) -> Result<Direction, GraphError>;

  /// Returns a new handle to the connected peer.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::NotConnected`] when the port has no peer. Other
  /// errors mean the connection state could not be determined.
  fn connected_to(&self) -> Result<Box<dyn MediaPort>, GraphError>;

  /// Opens a fresh single-pass enumeration of the formats this port supports.
  fn media_formats(&self) -> Result<FormatEnumerator<'_>, GraphError>;

  /// Access to the concrete handle type, for collaborators that need to map
  /// a handle back to their own port.
  fn as_any(&self) -> &dyn Any;
}

/// Sequence of port handles opened from one node.
pub type PortEnumerator<'a> = Box<dyn Iterator<Item = Box<dyn MediaPort>> + 'a>;
