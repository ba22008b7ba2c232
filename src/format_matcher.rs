//! # Format Matcher
//!
//! Answers "does this port support type X, and at which position of its
//! format list?".
//!
//! The answer is the zero-based ordinal of the first matching descriptor, or
//! `None` when no descriptor matches or the format list could not be opened.
//! Callers that want "the port's preferred format is X" compare against
//! `Some(0)`.
//!
//! Each query opens a new format enumeration on the port and consumes it
//! once. Every descriptor is dropped right after it is inspected, matching or
//! not, which releases its payload.

use crate::format::FormatDescriptor;
use crate::media_type::{Guid, major_type_name};
use crate::port::MediaPort;
use tracing::trace;

/// Which GUID of a format descriptor a query compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatField {
  /// Compare `major_type`.
  MajorType,
  /// Compare `sub_type`.
  SubType,
}

impl FormatField {
  fn of(self, descriptor: &FormatDescriptor) -> Guid {
    match self {
      FormatField::MajorType => descriptor.major_type,
      FormatField::SubType => descriptor.sub_type,
    }
  }
}

/// Returns the position of the first descriptor whose `field` equals `value`.
pub fn supports(port: &dyn MediaPort, field: FormatField, value: &Guid) -> Option<usize> {
  let formats = match port.media_formats() {
    Ok(formats) => formats,
    Err(err) => {
      trace!(error = %err, "could not open format enumeration");
      return None;
    }
  };

  for (ordinal, descriptor) in formats.enumerate() {
    let matched = field.of(&descriptor) == *value;
    drop(descriptor);
    if matched {
      return Some(ordinal);
    }
  }
  None
}

/// Returns the position of the first descriptor with major type `major_type`.
///
/// # Example
///
/// ```rust
/// use filtergraph_inspector::format_matcher::supports_major_type;
/// use filtergraph_inspector::media_type::{major, sub};
/// use filtergraph_inspector::memory::MemoryGraph;
/// use filtergraph_inspector::port::Direction;
///
/// let graph = MemoryGraph::new();
/// let node = graph.add_node("decoder");
/// let port = graph.add_port(
///   node,
///   Direction::Output,
///   &[(major::AUDIO, sub::PCM), (major::VIDEO, sub::H264)],
/// );
///
/// let handle = graph.port_handle(port);
/// assert_eq!(supports_major_type(handle.as_ref(), &major::VIDEO), Some(1));
/// assert_eq!(supports_major_type(handle.as_ref(), &major::TEXT), None);
/// ```
pub fn supports_major_type(port: &dyn MediaPort, major_type: &Guid) -> Option<usize> {
  supports(port, FormatField::MajorType, major_type)
}

/// Returns the position of the first descriptor with sub type `sub_type`.
pub fn supports_sub_type(port: &dyn MediaPort, sub_type: &Guid) -> Option<usize> {
  supports(port, FormatField::SubType, sub_type)
}

/// Returns `true` when the port's first descriptor has `field == value`.
pub fn prefers(port: &dyn MediaPort, field: FormatField, value: &Guid) -> bool {
  supports(port, field, value) == Some(0)
}

/// Returns the major type of the port's first descriptor.
pub fn first_major_type(port: &dyn MediaPort) -> Option<Guid> {
  let mut formats = port.media_formats().ok()?;
  formats.next().map(|descriptor| descriptor.major_type)
}

/// Display name of the port's first major type, `"Unknown"` if unavailable.
pub fn media_type_of(port: &dyn MediaPort) -> &'static str {
  major_type_name(first_major_type(port))
}
