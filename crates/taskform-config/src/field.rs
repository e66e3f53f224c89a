use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::flag::Flag;
use crate::lenient;

/// A single form component as delivered by the engine.
///
/// The `type` string is kept verbatim here. Mapping it onto a typed field
/// kind happens in the resolver, so a definition with an unknown type still
/// loads. Attributes are read leniently, see [`FieldDef::from_value`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
  /// Editor-assigned id. Left empty by some hand-written definitions; the
  /// resolver then derives one from the field's position.
  #[serde(default, deserialize_with = "lenient::id")]
  pub id: String,

  /// Component type, e.g. "textfield", "group", "button".
  #[serde(rename = "type")]
  pub field_type: String,

  /// Name of the variable this field binds to.
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub key: Option<String>,

  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub label: Option<String>,

  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub description: Option<String>,

  /// Caption of a datetime field (used instead of `label`).
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub date_label: Option<String>,

  /// Datetime subtype: "date", "time" or "datetime".
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub subtype: Option<String>,

  /// Markdown source of a text component.
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub text: Option<String>,

  /// Markup of an html component.
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub content: Option<String>,

  /// Image source.
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub source: Option<String>,

  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub url: Option<String>,

  #[serde(
    default,
    deserialize_with = "lenient::count",
    skip_serializing_if = "Option::is_none"
  )]
  pub height: Option<u32>,

  /// Button action: "submit" or "reset".
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub action: Option<String>,

  /// Static options of select, checklist and radio components.
  #[serde(
    default,
    deserialize_with = "lenient::options",
    skip_serializing_if = "Vec::is_empty"
  )]
  pub values: Vec<ValueOption>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default_value: Option<serde_json::Value>,

  #[serde(default)]
  pub disabled: Flag,

  #[serde(default)]
  pub readonly: Flag,

  #[serde(default)]
  pub multiple: Flag,

  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub accept: Option<String>,

  #[serde(default)]
  pub show_outline: Flag,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub validate: Option<ValidateDef>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub appearance: Option<AppearanceDef>,

  /// Free-form custom properties set in the form editor.
  #[serde(
    default,
    deserialize_with = "lenient::properties",
    skip_serializing_if = "HashMap::is_empty"
  )]
  pub properties: HashMap<String, String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub layout: Option<LayoutDef>,

  /// Children of a group component.
  #[serde(
    default,
    deserialize_with = "lenient::components",
    skip_serializing_if = "Vec::is_empty"
  )]
  pub components: Vec<FieldDef>,

  /// Why the component could not be read, when it could not. The resolver
  /// turns such a component into a placeholder.
  #[serde(skip)]
  pub malformed: Option<String>,
}

impl FieldDef {
  /// Read one component from JSON.
  ///
  /// Never fails: a component that still cannot be read after lenient
  /// attribute parsing keeps its id and type and records the error in
  /// `malformed`.
  pub fn from_value(value: Value) -> Self {
    let id = value
      .get("id")
      .and_then(lenient::scalar_text)
      .unwrap_or_default();
    let field_type = value
      .get("type")
      .and_then(lenient::scalar_text)
      .unwrap_or_default();

    serde_json::from_value(value).unwrap_or_else(|e: serde_json::Error| Self {
      id,
      field_type,
      malformed: Some(e.to_string()),
      ..Default::default()
    })
  }

  pub fn new(id: impl Into<String>, field_type: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      field_type: field_type.into(),
      ..Default::default()
    }
  }

  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = Some(key.into());
    self
  }

  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.label = Some(label.into());
    self
  }

  pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.properties.insert(name.into(), value.into());
    self
  }

  /// Place the field in a layout row, optionally with an explicit column span.
  pub fn in_row(mut self, row: impl Into<String>, columns: Option<u32>) -> Self {
    self.layout = Some(LayoutDef {
      row: Some(row.into()),
      columns,
    });
    self
  }

  pub fn with_components(mut self, components: Vec<FieldDef>) -> Self {
    self.components = components;
    self
  }

  /// Look up a custom property, treating empty strings as unset.
  pub fn property(&self, name: &str) -> Option<&str> {
    self
      .properties
      .get(name)
      .map(String::as_str)
      .filter(|v| !v.is_empty())
  }
}

/// An option of a select, checklist or radio component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueOption {
  pub label: String,
  pub value: String,
}

impl ValueOption {
  pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      label: label.into(),
      value: value.into(),
    }
  }
}

/// Validation attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDef {
  #[serde(default)]
  pub required: Flag,
  #[serde(
    default,
    deserialize_with = "lenient::count",
    skip_serializing_if = "Option::is_none"
  )]
  pub min_length: Option<u32>,
  #[serde(
    default,
    deserialize_with = "lenient::count",
    skip_serializing_if = "Option::is_none"
  )]
  pub max_length: Option<u32>,
  #[serde(
    default,
    deserialize_with = "lenient::number",
    skip_serializing_if = "Option::is_none"
  )]
  pub min: Option<f64>,
  #[serde(
    default,
    deserialize_with = "lenient::number",
    skip_serializing_if = "Option::is_none"
  )]
  pub max: Option<f64>,
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub pattern: Option<String>,
  /// "email" or "phone" for text fields.
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub validation_type: Option<String>,
}

/// Input adorners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceDef {
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub prefix_adorner: Option<String>,
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub suffix_adorner: Option<String>,
}

/// Grid placement hint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDef {
  /// Row id; fields sharing a row id are laid out side by side.
  #[serde(
    default,
    deserialize_with = "lenient::text",
    skip_serializing_if = "Option::is_none"
  )]
  pub row: Option<String>,
  /// Explicit column span. `None` lets the layout solver share out the rest.
  #[serde(
    default,
    deserialize_with = "lenient::count",
    skip_serializing_if = "Option::is_none"
  )]
  pub columns: Option<u32>,
}
