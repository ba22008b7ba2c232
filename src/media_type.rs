//! # Media Types
//!
//! Format descriptors identify what a port carries by a pair of GUIDs: the
//! *major type* (audio, video, text, ...) and the *sub type* (PCM, H.264, ...).
//! This module holds the GUID type, the well-known identifiers, and the fixed
//! name table used when tracing a graph.

use uuid::Uuid;

/// 128-bit identifier for major types, sub types and node classes.
pub type Guid = Uuid;

/// Well-known major type identifiers.
pub mod major {
  use super::Guid;

  /// `MEDIATYPE_Audio`
  pub const AUDIO: Guid = Guid::from_u128(0x73647561_0000_0010_8000_00aa00389b71);
  /// `MEDIATYPE_AUXLine21Data`
  pub const AUX_LINE21_DATA: Guid = Guid::from_u128(0x670aea80_3a82_11d0_b79b_00aa003767a7);
  /// `MEDIATYPE_DVD_ENCRYPTED_PACK`
  pub const DVD_ENCRYPTED_PACK: Guid = Guid::from_u128(0xed0b916a_044d_11d1_aa78_00c04fc31d60);
  /// `MEDIATYPE_Interleaved`
  pub const INTERLEAVED: Guid = Guid::from_u128(0x73766169_0000_0010_8000_00aa00389b71);
  /// `MEDIATYPE_Midi`
  pub const MIDI: Guid = Guid::from_u128(0x7364696d_0000_0010_8000_00aa00389b71);
  /// `MEDIATYPE_MPEG2_PACK`
  pub const MPEG2_PACK: Guid = Guid::from_u128(0x36523b13_8ee5_11d1_8ca3_0060b057664a);
  /// `MEDIATYPE_MPEG2_PES`
  pub const MPEG2_PES: Guid = Guid::from_u128(0xe06d8020_db46_11cf_b4d1_00805f6cbbea);
  /// `MEDIATYPE_ScriptCommand`
  pub const SCRIPT_COMMAND: Guid = Guid::from_u128(0x73636d64_0000_0010_8000_00aa00389b71);
  /// `MEDIATYPE_Stream`
  pub const STREAM: Guid = Guid::from_u128(0xe436eb83_524f_11ce_9f53_0020af0ba770);
  /// `MEDIATYPE_Text`
  pub const TEXT: Guid = Guid::from_u128(0x73747874_0000_0010_8000_00aa00389b71);
  /// `MEDIATYPE_Timecode`
  pub const TIMECODE: Guid = Guid::from_u128(0x0482dee3_7817_11cf_8a03_00aa006ecb65);
  /// `MEDIATYPE_Video`
  pub const VIDEO: Guid = Guid::from_u128(0x73646976_0000_0010_8000_00aa00389b71);
}

/// A few common sub type identifiers.
pub mod sub {
  use super::Guid;

  /// `MEDIASUBTYPE_PCM`
  pub const PCM: Guid = Guid::from_u128(0x00000001_0000_0010_8000_00aa00389b71);
  /// `MEDIASUBTYPE_IEEE_FLOAT`
  pub const IEEE_FLOAT: Guid = Guid::from_u128(0x00000003_0000_0010_8000_00aa00389b71);
  /// `MEDIASUBTYPE_H264`
  pub const H264: Guid = Guid::from_u128(0x34363248_0000_0010_8000_00aa00389b71);
  /// `MEDIASUBTYPE_RGB32`
  pub const RGB32: Guid = Guid::from_u128(0xe436eb7e_524f_11ce_9f53_0020af0ba770);
  /// `MEDIASUBTYPE_YUY2`
  pub const YUY2: Guid = Guid::from_u128(0x32595559_0000_0010_8000_00aa00389b71);
}

/// Name reported for identifiers outside the table.
pub const UNKNOWN_MEDIA_TYPE: &str = "Unknown";

const MAJOR_TYPE_NAMES: &[(Guid, &str)] = &[
  (Guid::nil(), UNKNOWN_MEDIA_TYPE),
  (major::AUDIO, "Audio"),
  (major::AUX_LINE21_DATA, "AUXLine21Data"),
  (major::DVD_ENCRYPTED_PACK, "DVD_ENCRYPTED_PACK"),
  (major::INTERLEAVED, "Interleaved"),
  (major::MIDI, "Midi"),
  (major::MPEG2_PACK, "MPEG2_PACK"),
  (major::MPEG2_PES, "MPEG2_PES"),
  (major::SCRIPT_COMMAND, "ScriptCommand"),
  (major::STREAM, "Stream"),
  (major::TEXT, "Text"),
  (major::TIMECODE, "Timecode"),
  (major::VIDEO, "Video"),
];

/// Maps a major type to its display name.
///
/// `None` (no descriptor could be read) and identifiers outside the fixed
/// table both map to `"Unknown"`.
///
/// # Example
///
/// ```rust
/// use filtergraph_inspector::media_type::{major, major_type_name};
///
/// assert_eq!(major_type_name(Some(major::VIDEO)), "Video");
/// assert_eq!(major_type_name(None), "Unknown");
/// ```
pub fn major_type_name(major_type: Option<Guid>) -> &'static str {
  let Some(major_type) = major_type else {
    return UNKNOWN_MEDIA_TYPE;
  };
  MAJOR_TYPE_NAMES
    .iter()
    .find(|(guid, _)| *guid == major_type)
    .map(|(_, name)| *name)
    .unwrap_or(UNKNOWN_MEDIA_TYPE)
}
