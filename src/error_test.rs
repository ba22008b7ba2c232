use crate::error::{GraphError, InspectError};
use crate::media_type::major;
use std::error::Error;

#[test]
fn test_graph_error_display() {
  assert_eq!(GraphError::NotConnected.to_string(), "port is not connected");
  assert_eq!(GraphError::NotFound.to_string(), "element not found in graph");
  assert_eq!(GraphError::Unsupported.to_string(), "operation not supported");
  assert_eq!(GraphError::failed("device lost").to_string(), "device lost");
  assert_eq!(GraphError::failed("x"), GraphError::Failed("x".to_string()));
}

#[test]
fn test_inspect_error_display() {
  let err = InspectError::EnumerationStart {
    what: "nodes",
    source: GraphError::Unsupported,
  };
  assert_eq!(
    err.to_string(),
    "could not start enumerating nodes: operation not supported"
  );

  let err = InspectError::Removal {
    node: "H1".to_string(),
    removed: 2,
    source: GraphError::failed("busy"),
  };
  assert_eq!(err.to_string(), "could not remove node 'H1' after removing 2: busy");

  let err = InspectError::Registration {
    stage: "registering",
    source: GraphError::NotFound,
  };
  assert_eq!(
    err.to_string(),
    "graph registration failed while registering: element not found in graph"
  );
}

#[test]
fn test_inspect_error_source_chain() {
  let err = InspectError::Instantiation {
    class_id: major::AUDIO,
    source: GraphError::NotFound,
  };
  assert_eq!(err.graph_error(), Some(&GraphError::NotFound));
  let source = err.source().unwrap();
  assert_eq!(source.to_string(), "element not found in graph");

  let err = InspectError::ElementQuery {
    what: "node info",
    source: GraphError::failed("gone"),
  };
  assert_eq!(err.graph_error(), Some(&GraphError::failed("gone")));

  let err = InspectError::InvalidConfig("bad".to_string());
  assert!(err.graph_error().is_none());
  assert!(err.source().is_none());
}
