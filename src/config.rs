//! Configuration for the graph inspector.
//!
//! Holds the placeholder strings used when a node's name cannot be read and
//! the naming and policy used when publishing a graph for diagnostic tools.

use crate::error::{InspectError, InspectResult};
use crate::registration::RegistrationFlags;
use crate::scanner::{NAME_PLACEHOLDER, TRACE_PLACEHOLDER};
use serde::{Deserialize, Serialize};

/// Configuration for [`GraphInspector`](crate::inspector::GraphInspector) and
/// [`Registrar`](crate::registration::Registrar).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
  /// Name listed for nodes whose name cannot be read.
  pub name_placeholder: String,
  /// Name traced for nodes whose name cannot be read.
  pub trace_placeholder: String,
  /// Delimiter of the item moniker a graph is published under.
  pub moniker_delimiter: String,
  /// First word of the published item name.
  pub moniker_prefix: String,
  /// Policy passed to the object table.
  pub registration_flags: RegistrationFlags,
}

impl Default for InspectorConfig {
  fn default() -> Self {
    Self {
      name_placeholder: NAME_PLACEHOLDER.to_string(),
      trace_placeholder: TRACE_PLACEHOLDER.to_string(),
      moniker_delimiter: "!".to_string(),
      moniker_prefix: "FilterGraph".to_string(),
      registration_flags: RegistrationFlags::KEEP_ALIVE,
    }
  }
}

impl InspectorConfig {
  /// Parses a configuration from JSON; missing fields take their defaults.
  ///
  /// # Errors
  ///
  /// Returns [`InspectError::InvalidConfig`] if the JSON is malformed or the
  /// result fails [`validate`](Self::validate).
  pub fn from_json_str(json: &str) -> InspectResult<Self> {
    let config: InspectorConfig =
      serde_json::from_str(json).map_err(|err| InspectError::InvalidConfig(err.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  /// Validates the config: every string must be non-empty.
  pub fn validate(&self) -> InspectResult<()> {
    let fields = [
      ("name_placeholder", &self.name_placeholder),
      ("trace_placeholder", &self.trace_placeholder),
      ("moniker_delimiter", &self.moniker_delimiter),
      ("moniker_prefix", &self.moniker_prefix),
    ];
    for (field, value) in fields {
      if value.is_empty() {
        return Err(InspectError::InvalidConfig(format!("{} must not be empty", field)));
      }
    }
    Ok(())
  }
}
