//! `${...}` template interpolation.
//!
//! Display strings of a form (labels, descriptions, markdown, placeholders)
//! may reference variables:
//!
//! ```text
//! Hello ${form_name}! You own ${ form_tokens | length } tokens.
//! ```
//!
//! A token whose body is exactly a variable name is replaced with that
//! variable's value. Any other body is evaluated as a minijinja expression
//! against a context of `name -> value`, so filters and attribute access work.
//!
//! Interpolation never fails. A token that cannot be resolved renders as an
//! empty string, and an unterminated `${` is kept as literal text.

use minijinja::{Environment, Value};
use taskform_variables::VariableStore;

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Renders templates against one variable store.
///
/// Build once per interpretation pass and reuse it for every string.
pub struct Interpolator<'s> {
  env: Environment<'static>,
  store: &'s VariableStore,
  context: Value,
}

impl<'s> Interpolator<'s> {
  pub fn new(store: &'s VariableStore) -> Self {
    Self {
      env: Environment::new(),
      store,
      context: Value::from_serialize(store.values()),
    }
  }

  /// Replace every `${...}` token in `text`.
  pub fn render(&self, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
      out.push_str(&rest[..start]);
      let after = &rest[start + OPEN.len()..];

      match after.find(CLOSE) {
        Some(end) => {
          out.push_str(&self.resolve(&after[..end]));
          rest = &after[end + 1..];
        }
        None => {
          out.push_str(&rest[start..]);
          return out;
        }
      }
    }

    out.push_str(rest);
    out
  }

  /// Render optional text, keeping `None` as `None`.
  pub fn render_opt(&self, text: Option<&str>) -> Option<String> {
    text.map(|t| self.render(t))
  }

  fn resolve(&self, body: &str) -> String {
    let name = body.trim();
    if name.is_empty() {
      return String::new();
    }

    if let Some(variable) = self.store.get(name) {
      return value_text(&variable.value);
    }

    match self.evaluate(name) {
      Ok(value) => value,
      Err(e) => {
        tracing::debug!(expression = %name, error = %e, "unresolved template token");
        String::new()
      }
    }
  }

  fn evaluate(&self, expression: &str) -> Result<String, minijinja::Error> {
    let value = self.env.compile_expression(expression)?.eval(&self.context)?;
    if value.is_undefined() || value.is_none() {
      return Ok(String::new());
    }

    Ok(match serde_json::to_value(&value) {
      Ok(json) => value_text(&json),
      Err(_) => value.to_string(),
    })
  }
}

/// Replace every `${...}` token in `text` with values from `store`.
pub fn interpolate(text: &str, store: &VariableStore) -> String {
  Interpolator::new(store).render(text)
}

/// String form of a JSON value: strings verbatim, null as empty, everything
/// else as compact JSON.
pub(crate) fn value_text(value: &serde_json::Value) -> String {
  match value {
    serde_json::Value::Null => String::new(),
    serde_json::Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use taskform_variables::{TypeTag, Variable};

  fn store() -> VariableStore {
    [
      Variable::new("form_name", json!("Ada"), TypeTag::String),
      Variable::new("form_count", json!(3), TypeTag::Integer),
      Variable::new("form_ok", json!(true), TypeTag::Boolean),
      Variable::new("form_none", json!(null), TypeTag::String),
      Variable::new("form_obj", json!({"a": 1, "b": [1, 2]}), TypeTag::Json),
      Variable::new("form-dashed", json!("dash"), TypeTag::String),
    ]
    .into_iter()
    .collect()
  }

  #[test]
  fn test_direct_lookup() {
    let store = store();
    assert_eq!(interpolate("Hello ${form_name}!", &store), "Hello Ada!");
    assert_eq!(interpolate("${ form_count } items", &store), "3 items");
    assert_eq!(interpolate("${form_ok}", &store), "true");
    assert_eq!(interpolate("[${form_none}]", &store), "[]");
    assert_eq!(interpolate("${form-dashed}", &store), "dash");
  }

  #[test]
  fn test_structured_values_render_as_json() {
    let store = store();
    assert_eq!(interpolate("${form_obj}", &store), r#"{"a":1,"b":[1,2]}"#);
    assert_eq!(interpolate("${form_obj.b}", &store), "[1,2]");
  }

  #[test]
  fn test_expressions() {
    let store = store();
    assert_eq!(interpolate("${ form_name | upper }", &store), "ADA");
    assert_eq!(interpolate("${form_obj.a}", &store), "1");
    assert_eq!(interpolate("${form_count + 1}", &store), "4");
  }

  #[test]
  fn test_unresolved_tokens_are_empty() {
    let store = store();
    assert_eq!(interpolate("a${missing}b", &store), "ab");
    assert_eq!(interpolate("a${}b", &store), "ab");
    assert_eq!(interpolate("a${ (( }b", &store), "ab");
    assert_eq!(interpolate("${form_obj.nope}", &store), "");
  }

  #[test]
  fn test_unterminated_token_is_literal() {
    let store = store();
    assert_eq!(interpolate("cost: ${form_count", &store), "cost: ${form_count");
    assert_eq!(
      interpolate("${form_name} and ${oops", &store),
      "Ada and ${oops"
    );
  }

  #[test]
  fn test_text_without_tokens_is_unchanged() {
    let store = store();
    assert_eq!(interpolate("plain $text {here}", &store), "plain $text {here}");
    assert_eq!(interpolate("", &store), "");
  }

  #[test]
  fn test_interpolator_reuse() {
    let store = store();
    let interpolator = Interpolator::new(&store);
    assert_eq!(interpolator.render("${form_name}"), "Ada");
    assert_eq!(interpolator.render("${form_count}"), "3");
    assert_eq!(interpolator.render_opt(None), None);
  }
}
