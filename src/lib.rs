//! # filtergraph-inspector
//!
//! Traversal, query and pruning helpers over a media filter graph.
//!
//! A filter graph is made of *nodes* (processing units) carrying directional
//! *ports*; an edge is a negotiated connection between one output port and
//! one input port. The graph itself is owned by an external collaborator that
//! exposes enumeration and query primitives through the traits in [`graph`],
//! [`node`], [`port`] and [`format`]. This crate answers structural questions
//! about such a graph and performs a few guarded mutations on it:
//!
//! - **Port Locator**: find a port on a node by direction, connection state
//!   and position, or by preferred format
//! - **Format Matcher**: where in a port's format list a major or sub type appears
//! - **Graph Scanner**: list nodes, find a port anywhere in the graph, trace
//!   the graph, and disconnect ports
//! - **Graph Pruner**: remove nodes left without a connected input
//! - **Registration**: publish a graph for external diagnostic tools
//!
//! ## Handles
//!
//! Collaborator handles are owned trait objects. Owning one is holding a
//! reference; dropping it is the release. Every operation releases all the
//! handles it acquires on every path, and returns at most one owned handle.
//!
//! ## Quick Start
//!
//! ```rust
//! use filtergraph_inspector::media_type::{major, sub};
//! use filtergraph_inspector::memory::MemoryGraph;
//! use filtergraph_inspector::port::Direction;
//! use filtergraph_inspector::port_locator::find_port;
//!
//! let graph = MemoryGraph::new();
//! let decoder = graph.add_node("decoder");
//! graph.add_port(decoder, Direction::Input, &[(major::VIDEO, sub::H264)]);
//! let out = graph.add_port(decoder, Direction::Output, &[(major::VIDEO, sub::RGB32)]);
//!
//! let node = graph.node_handle(decoder);
//! let port = find_port(node.as_ref(), Direction::Output, false, 0).unwrap();
//! assert_eq!(graph.port_key(port.as_ref()), Some(out));
//! ```

#![deny(missing_docs)]

/// Inspector configuration.
pub mod config;
/// Error types.
pub mod error;
/// Format descriptors and their enumeration.
pub mod format;
/// Major/sub type queries on ports.
pub mod format_matcher;
/// Filter graph collaborator interface.
pub mod graph;
/// Configured inspector facade.
pub mod inspector;
/// Media type identifiers and names.
pub mod media_type;
/// In-memory collaborator with handle accounting.
pub mod memory;
/// Node collaborator interface.
pub mod node;
/// Port collaborator interface.
pub mod port;
/// Port lookup on a single node.
pub mod port_locator;
/// Removal of dangling nodes.
pub mod pruner;
/// Publication of graphs for diagnostic tools.
pub mod registration;
/// Graph-wide scans and tracing.
pub mod scanner;

pub use config::InspectorConfig;
pub use error::{GraphError, InspectError, InspectResult};
pub use format::{FormatDescriptor, FormatEnumerator, FormatPayload};
pub use format_matcher::FormatField;
pub use graph::FilterGraph;
pub use inspector::GraphInspector;
pub use media_type::Guid;
pub use node::{MediaNode, NodeFactory, NodeInfo};
pub use port::{Direction, MediaPort};
pub use port_locator::FormatSearch;
pub use registration::{Registrar, RegistrationFlags, RegistrationToken};

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod error_test;
#[cfg(test)]
mod memory_test;
#[cfg(test)]
mod registration_test;
