//! Shared fixtures for unit tests.

use crate::media_type::{Guid, major, sub};
use crate::memory::{MemoryGraph, NodeKey, PortKey};
use crate::port::Direction;

pub const AUDIO_PCM: (Guid, Guid) = (major::AUDIO, sub::PCM);
pub const VIDEO_H264: (Guid, Guid) = (major::VIDEO, sub::H264);
pub const VIDEO_RGB32: (Guid, Guid) = (major::VIDEO, sub::RGB32);
pub const TEXT_NONE: (Guid, Guid) = (major::TEXT, Guid::nil());

/// Routes `tracing` output to the test harness.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_test_writer()
    .with_max_level(tracing::Level::TRACE)
    .try_init();
}

/// `[Src] -> [Snk]` plus a dangling `H1`.
pub struct SourceHelperSink {
  pub graph: MemoryGraph,
  pub source: NodeKey,
  pub helper: NodeKey,
  pub sink: NodeKey,
  pub source_out: PortKey,
  pub sink_in: PortKey,
  pub helper_in: PortKey,
}

pub fn source_helper_sink() -> SourceHelperSink {
  let graph = MemoryGraph::new();
  let source = graph.add_node("Src");
  let source_out = graph.add_port(source, Direction::Output, &[AUDIO_PCM]);
  let helper = graph.add_node("H1");
  let helper_in = graph.add_port(helper, Direction::Input, &[AUDIO_PCM]);
  graph.add_port(helper, Direction::Output, &[AUDIO_PCM]);
  let sink = graph.add_node("Snk");
  let sink_in = graph.add_port(sink, Direction::Input, &[AUDIO_PCM]);
  graph
    .connect(source_out, sink_in)
    .expect("fixture connection");
  SourceHelperSink {
    graph,
    source,
    helper,
    sink,
    source_out,
    sink_in,
    helper_in,
  }
}

/// Adds an output port on a fresh peer node connected to `input`.
pub fn feed(graph: &MemoryGraph, input: PortKey, formats: &[(Guid, Guid)]) -> PortKey {
  let upstream = graph.add_node("upstream");
  let out = graph.add_port(upstream, Direction::Output, formats);
  graph.connect(out, input).expect("fixture connection");
  out
}

/// Adds an input port on a fresh peer node connected to `output`.
pub fn drain(graph: &MemoryGraph, output: PortKey, formats: &[(Guid, Guid)]) -> PortKey {
  let downstream = graph.add_node("downstream");
  let input = graph.add_port(downstream, Direction::Input, formats);
  graph.connect(output, input).expect("fixture connection");
  input
}
