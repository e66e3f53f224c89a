//! Tolerant deserializers for component attributes.
//!
//! Hand-written and older editor output often puts numbers in strings, or
//! strings in number slots. Scalars are converted where the meaning is
//! clear; anything else reads as unset instead of failing the component.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::field::{FieldDef, ValueOption};

/// Display text of a scalar. `None` for null, arrays and objects.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
  Ok(scalar_text(&Value::deserialize(deserializer)?))
}

pub(crate) fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(text(deserializer)?.unwrap_or_default())
}

/// A non-negative whole number, clamped to `u32`.
pub(crate) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
  let n = match Value::deserialize(deserializer)? {
    Value::Number(n) => n
      .as_u64()
      .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
    Value::String(s) => s.trim().parse::<u64>().ok(),
    _ => None,
  };
  Ok(n.map(|n| u32::try_from(n).unwrap_or(u32::MAX)))
}

pub(crate) fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
    _ => None,
  })
}

/// Custom properties. Scalar values are kept as text; nested values dropped.
pub(crate) fn properties<'de, D: Deserializer<'de>>(
  deserializer: D,
) -> Result<HashMap<String, String>, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::Object(map) => map
      .into_iter()
      .filter_map(|(name, value)| scalar_text(&value).map(|v| (name, v)))
      .collect(),
    _ => HashMap::new(),
  })
}

/// Static choice options. Bare scalars become options labelled by their
/// value; entries without a usable value are dropped.
pub(crate) fn options<'de, D: Deserializer<'de>>(
  deserializer: D,
) -> Result<Vec<ValueOption>, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::Array(items) => items.iter().filter_map(option).collect(),
    _ => Vec::new(),
  })
}

fn option(item: &Value) -> Option<ValueOption> {
  match item {
    Value::Object(map) => {
      let value = map.get("value").and_then(scalar_text)?;
      let label = map
        .get("label")
        .and_then(scalar_text)
        .unwrap_or_else(|| value.clone());
      Some(ValueOption::new(label, value))
    }
    other => scalar_text(other).map(|v| ValueOption::new(v.clone(), v)),
  }
}

/// Child components, each read on its own so one bad entry stays local.
pub(crate) fn components<'de, D: Deserializer<'de>>(
  deserializer: D,
) -> Result<Vec<FieldDef>, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::Array(items) => field_list(items),
    _ => Vec::new(),
  })
}

pub(crate) fn field_list(items: Vec<Value>) -> Vec<FieldDef> {
  items.into_iter().map(FieldDef::from_value).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_option_shapes() {
    let options: Vec<_> = [
      json!({ "label": "One", "value": 1 }),
      json!({ "value": true }),
      json!("plain"),
      json!({ "label": "No value" }),
      json!([1, 2]),
    ]
    .iter()
    .filter_map(option)
    .collect();

    assert_eq!(
      options,
      vec![
        ValueOption::new("One", "1"),
        ValueOption::new("true", "true"),
        ValueOption::new("plain", "plain"),
      ]
    );
  }

  #[test]
  fn test_count_accepts_numeric_strings() {
    let read = |value: Value| count(value).unwrap();
    assert_eq!(read(json!("300")), Some(300));
    assert_eq!(read(json!(" 12 ")), Some(12));
    assert_eq!(read(json!(8.0)), Some(8));
    assert_eq!(read(json!(-4)), None);
    assert_eq!(read(json!("tall")), None);
    assert_eq!(read(json!(u64::MAX)), Some(u32::MAX));
  }
}
