use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A boolean attribute that some form editors emit as the string `"on"`.
///
/// Accepts `true`/`false`, `"on"`/`"off"`, `"true"`/`"false"` and `0`/`1`.
/// Always serializes as a plain boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag(pub bool);

impl Flag {
  pub fn is_set(self) -> bool {
    self.0
  }
}

impl From<bool> for Flag {
  fn from(value: bool) -> Self {
    Flag(value)
  }
}

impl Serialize for Flag {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(self.0)
  }
}

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
  type Value = Flag;

  fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("a boolean or one of \"on\", \"off\", \"true\", \"false\"")
  }

  fn visit_bool<E: de::Error>(self, v: bool) -> Result<Flag, E> {
    Ok(Flag(v))
  }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<Flag, E> {
    Ok(Flag(matches!(v, "on" | "true")))
  }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<Flag, E> {
    Ok(Flag(v != 0))
  }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<Flag, E> {
    Ok(Flag(v != 0))
  }

  fn visit_unit<E: de::Error>(self) -> Result<Flag, E> {
    Ok(Flag(false))
  }
}

impl<'de> Deserialize<'de> for Flag {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(FlagVisitor)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_flag_accepts_bool_and_on() {
    let on: Flag = serde_json::from_str(r#""on""#).unwrap();
    let yes: Flag = serde_json::from_str("true").unwrap();
    let off: Flag = serde_json::from_str(r#""off""#).unwrap();
    let null: Flag = serde_json::from_str("null").unwrap();
    let one: Flag = serde_json::from_str("1").unwrap();

    assert!(on.is_set());
    assert!(yes.is_set());
    assert!(!off.is_set());
    assert!(!null.is_set());
    assert!(one.is_set());
  }

  #[test]
  fn test_flag_serializes_as_bool() {
    assert_eq!(serde_json::to_string(&Flag(true)).unwrap(), "true");
  }
}
