//! # Error Types
//!
//! Two layers of errors live here:
//!
//! - **GraphError**: the status reported by the external graph collaborator
//!   for a single primitive (enumerate, query, disconnect, remove, register).
//! - **InspectError**: what the inspection layer itself reports when one of
//!   its operations cannot produce a result.
//!
//! Lookups in this crate (`find_port`, `supports_major_type`, ...) never
//! surface errors: "could not start looking" and "nothing found" are the same
//! answer to every caller, so they collapse into `None`. Listing, pruning and
//! registration operations return `InspectError` so callers can log why.

use crate::media_type::Guid;
use thiserror::Error;

/// Status reported by the external graph collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
  /// The port has no connected peer.
  #[error("port is not connected")]
  NotConnected,
  /// The element is not (or no longer) part of the graph.
  #[error("element not found in graph")]
  NotFound,
  /// The collaborator does not implement the requested primitive.
  #[error("operation not supported")]
  Unsupported,
  /// Any other failure, with a collaborator-provided description.
  #[error("{0}")]
  Failed(String),
}

impl GraphError {
  /// Shorthand for [`GraphError::Failed`].
  pub fn failed(message: impl Into<String>) -> Self {
    GraphError::Failed(message.into())
  }
}

/// Error type for inspection operations.
#[derive(Error, Debug)]
pub enum InspectError {
  /// The collaborator refused to produce an enumerator.
  #[error("could not start enumerating {what}: {source}")]
  EnumerationStart {
    /// What was being enumerated ("nodes", "ports", "formats").
    what: &'static str,
    /// Underlying collaborator status.
    #[source]
    source: GraphError,
  },
  /// A query on a single element failed.
  #[error("query for {what} failed: {source}")]
  ElementQuery {
    /// What was being queried.
    what: &'static str,
    /// Underlying collaborator status.
    #[source]
    source: GraphError,
  },
  /// The graph refused to remove a node.
  #[error("could not remove node '{node}' after removing {removed}: {source}")]
  Removal {
    /// Display name of the node.
    node: String,
    /// Nodes already removed before the failure.
    removed: usize,
    /// Underlying collaborator status.
    #[source]
    source: GraphError,
  },
  /// A step of publishing or revoking a graph registration failed.
  #[error("graph registration failed while {stage}: {source}")]
  Registration {
    /// The step that failed.
    stage: &'static str,
    /// Underlying collaborator status.
    #[source]
    source: GraphError,
  },
  /// A node could not be created from its class identity.
  #[error("could not instantiate node {class_id}: {source}")]
  Instantiation {
    /// Class identity that was requested.
    class_id: Guid,
    /// Underlying collaborator status.
    #[source]
    source: GraphError,
  },
  /// The inspector configuration is unusable.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

impl InspectError {
  /// Returns the collaborator status behind this error, if there is one.
  pub fn graph_error(&self) -> Option<&GraphError> {
    match self {
      InspectError::EnumerationStart { source, .. }
      | InspectError::ElementQuery { source, .. }
      | InspectError::Removal { source, .. }
      | InspectError::Registration { source, .. }
      | InspectError::Instantiation { source, .. } => Some(source),
      InspectError::InvalidConfig(_) => None,
    }
  }
}

/// Result alias for inspection operations.
pub type InspectResult<T> = Result<T, InspectError>;
