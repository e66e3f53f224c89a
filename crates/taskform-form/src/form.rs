use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::field::{ButtonAction, Field, FieldKind};

/// Index of a field inside its [`Form`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub(crate) usize);

/// `<button ... type="submit">` inside html content.
static HTML_SUBMIT_BUTTON: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?i)<button[^>]+type=["']submit["'][^>]*>"#).expect("valid submit regex")
});

/// A locked form ready for interpretation.
///
/// Built through [`crate::FormBuilder`], which guarantees every field is
/// reachable from exactly one root or group and that no group contains an
/// ancestor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
  pub form_id: Option<String>,
  pub(crate) fields: Vec<Field>,
  pub(crate) parents: Vec<Option<FieldId>>,
  pub(crate) roots: Vec<FieldId>,
}

impl Form {
  /// Top-level fields in document order.
  pub fn roots(&self) -> &[FieldId] {
    &self.roots
  }

  pub fn get(&self, id: FieldId) -> Option<&Field> {
    self.fields.get(id.0)
  }

  /// Get a field by the editor-assigned id.
  pub fn find(&self, field_id: &str) -> Option<FieldId> {
    self
      .fields
      .iter()
      .position(|f| f.field_id == field_id)
      .map(FieldId)
  }

  pub fn children(&self, id: FieldId) -> &[FieldId] {
    self.get(id).map(Field::children).unwrap_or(&[])
  }

  pub fn parent(&self, id: FieldId) -> Option<FieldId> {
    self.parents.get(id.0).copied().flatten()
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  /// Depth-first post-order: every group comes after all of its children.
  pub fn post_order(&self) -> Vec<FieldId> {
    fn visit(form: &Form, id: FieldId, out: &mut Vec<FieldId>) {
      for &child in form.children(id) {
        visit(form, child, out);
      }
      out.push(id);
    }

    let mut out = Vec::with_capacity(self.fields.len());
    for &root in &self.roots {
      visit(self, root, &mut out);
    }
    out
  }

  /// Check whether the form carries its own submit control.
  ///
  /// A submit button, a button with `properties.type == "submit"`, or html
  /// markup containing a submit button all count. When none exists the host
  /// is expected to add one.
  pub fn has_submit_control(&self) -> bool {
    self.fields.iter().any(|field| match &field.kind {
      FieldKind::Button(button) => {
        button.action == ButtonAction::Submit || field.property("type") == Some("submit")
      }
      FieldKind::Html { content } => HTML_SUBMIT_BUTTON.is_match(content),
      _ => false,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::builder::FormBuilder;
  use crate::field::{ButtonSpec, Group, TextInput};

  fn text(id: &str, key: &str) -> Field {
    let mut field = Field::new(id, FieldKind::TextField(TextInput::default()));
    field.key = Some(key.to_string());
    field
  }

  fn group(id: &str) -> Field {
    Field::new(id, FieldKind::Group(Group::default()))
  }

  #[test]
  fn test_post_order_visits_children_before_group() {
    let mut builder = FormBuilder::new();
    let outer = builder.add_root(group("outer")).unwrap();
    let inner = builder.add(group("inner"));
    let a = builder.add(text("a", "form_a"));
    let b = builder.add(text("b", "form_b"));
    let c = builder.add_root(text("c", "form_c")).unwrap();
    builder.attach(outer, a).unwrap();
    builder.attach(outer, inner).unwrap();
    builder.attach(inner, b).unwrap();
    let form = builder.build().unwrap();

    assert_eq!(form.post_order(), vec![a, b, inner, outer, c]);
    assert_eq!(form.parent(b), Some(inner));
  }

  #[test]
  fn test_has_submit_control_from_button() {
    let mut builder = FormBuilder::new();
    builder
      .add_root(Field::new(
        "submit",
        FieldKind::Button(ButtonSpec {
          action: ButtonAction::Submit,
          ..Default::default()
        }),
      ))
      .unwrap();
    assert!(builder.build().unwrap().has_submit_control());
  }

  #[test]
  fn test_has_submit_control_from_html() {
    let mut builder = FormBuilder::new();
    builder
      .add_root(Field::new(
        "markup",
        FieldKind::Html {
          content: "<div><BUTTON class='x' type='submit'>Go</BUTTON></div>".to_string(),
        },
      ))
      .unwrap();
    assert!(builder.build().unwrap().has_submit_control());
  }

  #[test]
  fn test_no_submit_control() {
    let mut builder = FormBuilder::new();
    builder.add_root(text("a", "form_a")).unwrap();
    builder
      .add_root(Field::new(
        "markup",
        FieldKind::Html {
          content: "<button type=\"button\">Nope</button>".to_string(),
        },
      ))
      .unwrap();
    assert!(!builder.build().unwrap().has_submit_control());
  }

  #[test]
  fn test_find_by_field_id() {
    let mut builder = FormBuilder::new();
    let id = builder.add_root(text("Field_9", "form_x")).unwrap();
    let form = builder.build().unwrap();
    assert_eq!(form.find("Field_9"), Some(id));
    assert_eq!(form.find("missing"), None);
  }
}
