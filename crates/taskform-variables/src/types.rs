use std::fmt;

use serde::{Deserialize, Serialize};

/// Type the process engine declared for a variable.
///
/// Serialized as the engine's type name ("String", "Boolean", ...). Names
/// the engine may send that taskform has no coercion rule for are kept
/// verbatim in [`TypeTag::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
  #[default]
  String,
  Boolean,
  Short,
  Integer,
  Long,
  Double,
  Date,
  Json,
  Object,
  Other(String),
}

impl TypeTag {
  pub fn as_str(&self) -> &str {
    match self {
      TypeTag::String => "String",
      TypeTag::Boolean => "Boolean",
      TypeTag::Short => "Short",
      TypeTag::Integer => "Integer",
      TypeTag::Long => "Long",
      TypeTag::Double => "Double",
      TypeTag::Date => "Date",
      TypeTag::Json => "Json",
      TypeTag::Object => "Object",
      TypeTag::Other(name) => name,
    }
  }

  /// Whole-number types.
  pub fn is_integral(&self) -> bool {
    matches!(self, TypeTag::Short | TypeTag::Integer | TypeTag::Long)
  }

  pub fn is_numeric(&self) -> bool {
    self.is_integral() || matches!(self, TypeTag::Double)
  }
}

impl From<String> for TypeTag {
  fn from(name: String) -> Self {
    match name.as_str() {
      "String" => TypeTag::String,
      "Boolean" => TypeTag::Boolean,
      "Short" => TypeTag::Short,
      "Integer" => TypeTag::Integer,
      "Long" => TypeTag::Long,
      "Double" => TypeTag::Double,
      "Date" => TypeTag::Date,
      "Json" => TypeTag::Json,
      "Object" => TypeTag::Object,
      _ => TypeTag::Other(name),
    }
  }
}

impl From<&str> for TypeTag {
  fn from(name: &str) -> Self {
    TypeTag::from(name.to_string())
  }
}

impl From<TypeTag> for String {
  fn from(tag: TypeTag) -> Self {
    match tag {
      TypeTag::Other(name) => name,
      other => other.as_str().to_string(),
    }
  }
}

impl fmt::Display for TypeTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A named, typed value exchanged with the process engine.
///
/// On the wire a variable is `{ "value", "type", "label", "valueInfo" }`
/// keyed by its name; the name itself lives in the enclosing map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
  #[serde(skip)]
  pub name: String,

  #[serde(default)]
  pub value: serde_json::Value,

  #[serde(rename = "type", default)]
  pub declared_type: TypeTag,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,

  /// Opaque engine metadata (`valueInfo`), carried through untouched.
  #[serde(rename = "valueInfo", default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<serde_json::Value>,
}

impl Variable {
  pub fn new(name: impl Into<String>, value: serde_json::Value, declared_type: TypeTag) -> Self {
    Self {
      name: name.into(),
      value,
      declared_type,
      label: None,
      metadata: None,
    }
  }

  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.label = Some(label.into());
    self
  }

  /// The value rendered as display text: strings verbatim, null as empty.
  pub fn value_text(&self) -> String {
    match &self.value {
      serde_json::Value::Null => String::new(),
      serde_json::Value::String(s) => s.clone(),
      other => other.to_string(),
    }
  }

  /// Display caption: the label when set, otherwise the variable name.
  pub fn caption(&self) -> &str {
    self
      .label
      .as_deref()
      .filter(|l| !l.is_empty())
      .unwrap_or(&self.name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_type_tag_round_trips_engine_names() {
    let tag: TypeTag = serde_json::from_value(json!("Long")).unwrap();
    assert_eq!(tag, TypeTag::Long);

    let unknown: TypeTag = serde_json::from_value(json!("File")).unwrap();
    assert_eq!(unknown, TypeTag::Other("File".to_string()));
    assert_eq!(serde_json::to_value(&unknown).unwrap(), json!("File"));
  }

  #[test]
  fn test_type_tag_classes() {
    assert!(TypeTag::Short.is_integral());
    assert!(TypeTag::Double.is_numeric());
    assert!(!TypeTag::Double.is_integral());
  }

  #[test]
  fn test_value_text() {
    let var = Variable::new("form_count", json!(3), TypeTag::Integer);
    assert_eq!(var.value_text(), "3");

    let var = Variable::new("form_name", json!(null), TypeTag::String);
    assert_eq!(var.value_text(), "");
    assert_eq!(var.caption(), "form_name");
  }
}
