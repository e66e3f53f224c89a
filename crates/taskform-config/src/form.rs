use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::FieldDef;
use crate::lenient;

/// A deployed form definition: the top-level component list of a task or
/// start form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDef {
  /// Form id assigned by the editor, e.g. "Form_0x8f3k".
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<String>,

  /// Top-level fields in document order.
  #[serde(default, deserialize_with = "lenient::components")]
  pub components: Vec<FieldDef>,

  #[serde(
    default,
    deserialize_with = "lenient::count",
    skip_serializing_if = "Option::is_none"
  )]
  pub schema_version: Option<u32>,
}

impl FormDef {
  pub fn new(components: Vec<FieldDef>) -> Self {
    Self {
      id: None,
      components,
      schema_version: None,
    }
  }

  /// Load a full form object or a bare component array.
  pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
    match value {
      Value::Array(components) => Ok(Self::new(lenient::field_list(components))),
      other => serde_json::from_value(other),
    }
  }
}
