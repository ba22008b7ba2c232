//! # Graph Inspector
//!
//! [`GraphInspector`] bundles the port locator, format matcher, scanner and
//! pruner behind one configured entry point. The free functions in those
//! modules remain available for callers that do not need configuration.
//!
//! ## Example
//!
//! ```rust
//! use filtergraph_inspector::inspector::GraphInspector;
//! use filtergraph_inspector::media_type::{major, sub};
//! use filtergraph_inspector::memory::MemoryGraph;
//! use filtergraph_inspector::port::Direction;
//!
//! let graph = MemoryGraph::new();
//! let source = graph.add_node("Src");
//! let out = graph.add_port(source, Direction::Output, &[(major::AUDIO, sub::PCM)]);
//! let sink = graph.add_node("Snk");
//! let input = graph.add_port(sink, Direction::Input, &[(major::AUDIO, sub::PCM)]);
//! graph.connect(out, input).unwrap();
//! graph.add_node("H1");
//!
//! let inspector = GraphInspector::default();
//! let handle = graph.handle();
//! let removed = inspector
//!   .prune_redundant(graph.node_handle(source).as_ref(), handle.as_ref())
//!   .unwrap();
//! assert_eq!(removed, 1);
//! assert_eq!(inspector.node_names(handle.as_ref()).unwrap(), vec!["Src", "Snk"]);
//! ```

use crate::config::InspectorConfig;
use crate::error::{GraphError, InspectResult};
use crate::format_matcher::{self, FormatField};
use crate::graph::FilterGraph;
use crate::media_type::Guid;
use crate::node::MediaNode;
use crate::port::{Direction, MediaPort};
use crate::port_locator::{self, FormatSearch};
use crate::pruner;
use crate::scanner::{self, NodeTrace};
use tracing::warn;

/// Configured entry point for graph inspection and pruning.
#[derive(Clone, Debug, Default)]
pub struct GraphInspector {
  config: InspectorConfig,
}

impl GraphInspector {
  /// Creates an inspector with a validated configuration.
  ///
  /// # Errors
  ///
  /// Returns [`InvalidConfig`](crate::error::InspectError::InvalidConfig) if
  /// the configuration does not validate.
  pub fn new(config: InspectorConfig) -> InspectResult<Self> {
    config.validate()?;
    Ok(Self { config })
  }

  /// Returns the configuration.
  pub fn config(&self) -> &InspectorConfig {
    &self.config
  }

  /// See [`port_locator::find_port`].
  pub fn find_port(
    &self,
    node: &dyn MediaNode,
    direction: Direction,
    connected: bool,
    skip: usize,
  ) -> Option<Box<dyn MediaPort>> {
    port_locator::find_port(node, direction, connected, skip)
  }

  /// See [`port_locator::find_port_by_format`].
  pub fn find_port_by_format(
    &self,
    node: &dyn MediaNode,
    direction: Direction,
    major_types: &[Guid],
    search: FormatSearch,
  ) -> Option<Box<dyn MediaPort>> {
    port_locator::find_port_by_format(node, direction, major_types, search)
  }

  /// See [`format_matcher::supports_major_type`].
  pub fn supports_major_type(&self, port: &dyn MediaPort, major_type: &Guid) -> Option<usize> {
    format_matcher::supports_major_type(port, major_type)
  }

  /// See [`format_matcher::supports_sub_type`].
  pub fn supports_sub_type(&self, port: &dyn MediaPort, sub_type: &Guid) -> Option<usize> {
    format_matcher::supports_sub_type(port, sub_type)
  }

  /// See [`scanner::find_port_across_graph`].
  pub fn find_port_across_graph(
    &self,
    graph: &dyn FilterGraph,
    direction: Direction,
    connected: bool,
    field: FormatField,
    value: &Guid,
  ) -> Option<Box<dyn MediaPort>> {
    scanner::find_port_across_graph(graph, direction, connected, field, value)
  }

  /// Lists every node's name, using the configured placeholder.
  pub fn node_names(&self, graph: &dyn FilterGraph) -> InspectResult<Vec<String>> {
    scanner::enumerate_node_names(graph, &self.config.name_placeholder)
  }

  /// Describes every node and port, using the configured trace placeholder.
  pub fn describe_graph(&self, graph: &dyn FilterGraph) -> InspectResult<Vec<NodeTrace>> {
    scanner::describe_graph(graph, &self.config.trace_placeholder)
  }

  /// Logs the graph. Failures are logged and otherwise ignored.
  pub fn trace_graph(&self, graph: &dyn FilterGraph) {
    if let Err(err) = scanner::trace_graph(graph, &self.config.trace_placeholder) {
      warn!(error = %err, "graph trace aborted");
    }
  }

  /// See [`scanner::disconnect`].
  pub fn disconnect(&self, owner: &dyn FilterGraph, port: &dyn MediaPort) -> Result<(), GraphError> {
    scanner::disconnect(owner, port)
  }

  /// See [`pruner::prune_redundant`].
  pub fn prune_redundant(&self, source: &dyn MediaNode, graph: &dyn FilterGraph) -> InspectResult<usize> {
    pruner::prune_redundant(source, graph)
  }
}
