//! # Format Descriptors
//!
//! A port advertises the formats it can produce or accept as a lazy sequence
//! of [`FormatDescriptor`]s. Each call to [`MediaPort::media_formats`] opens a
//! fresh, single-pass [`FormatEnumerator`]; re-reading the list means opening
//! it again from the port.
//!
//! Descriptors are not identity-stable: every enumeration hands out new
//! copies, each owning its payload. Dropping a descriptor releases the
//! payload together with any handle nested inside it.
//!
//! [`MediaPort::media_formats`]: crate::port::MediaPort::media_formats

use crate::media_type::Guid;
use std::any::Any;
use std::fmt;

/// Variable-length format block attached to a descriptor.
///
/// `handle` carries an optional reference owned by the block (for example an
/// allocator or a shared buffer). It is released when the payload is dropped.
#[derive(Default)]
pub struct FormatPayload {
  /// Raw format bytes (a `WAVEFORMATEX`, `VIDEOINFOHEADER`, ...).
  pub bytes: Vec<u8>,
  /// Nested handle owned by this block.
  pub handle: Option<Box<dyn Any>>,
}

impl FormatPayload {
  /// Creates a payload holding only format bytes.
  pub fn from_bytes(bytes: Vec<u8>) -> Self {
    Self {
      bytes,
      handle: None,
    }
  }
}

impl fmt::Debug for FormatPayload {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FormatPayload")
      .field("bytes", &self.bytes.len())
      .field("handle", &self.handle.as_ref().map(|_| "Some(handle)"))
      .finish()
  }
}

/// One format a port can carry.
#[derive(Debug)]
pub struct FormatDescriptor {
  /// Major type (audio, video, ...).
  pub major_type: Guid,
  /// Sub type (PCM, H.264, ...).
  pub sub_type: Guid,
  /// Owned format block.
  pub payload: FormatPayload,
}

impl FormatDescriptor {
  /// Creates a descriptor with an empty payload.
  pub fn new(major_type: Guid, sub_type: Guid) -> Self {
    Self {
      major_type,
      sub_type,
      payload: FormatPayload::default(),
    }
  }

  /// Replaces the payload.
  pub fn with_payload(mut self, payload: FormatPayload) -> Self {
    self.payload = payload;
    self
  }
}

/// Single-pass sequence of format descriptors opened from one port.
pub type FormatEnumerator<'a> = Box<dyn Iterator<Item = FormatDescriptor> + 'a>;
