use crate::error::FormError;
use crate::field::{Field, FieldKind};
use crate::form::{FieldId, Form};

/// Incrementally assembles a [`Form`].
///
/// Fields are added to the arena first and then placed either at the top
/// level or inside a group. Placement is checked eagerly so the finished
/// form is always a tree.
#[derive(Debug, Default)]
pub struct FormBuilder {
  form_id: Option<String>,
  fields: Vec<Field>,
  parents: Vec<Option<FieldId>>,
  roots: Vec<FieldId>,
}

impl FormBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_form_id(mut self, form_id: Option<String>) -> Self {
    self.form_id = form_id;
    self
  }

  /// Add a detached field to the arena.
  ///
  /// Any children listed in a group's `children` are ignored; use
  /// [`FormBuilder::attach`] to place fields inside groups.
  pub fn add(&mut self, mut field: Field) -> FieldId {
    if let FieldKind::Group(group) = &mut field.kind {
      group.children.clear();
    }
    let id = FieldId(self.fields.len());
    self.fields.push(field);
    self.parents.push(None);
    id
  }

  /// Add a field and place it at the top level.
  pub fn add_root(&mut self, field: Field) -> Result<FieldId, FormError> {
    let id = self.add(field);
    self.push_root(id)?;
    Ok(id)
  }

  /// Place an already added field at the top level.
  pub fn push_root(&mut self, id: FieldId) -> Result<(), FormError> {
    self.check_exists(id)?;
    if self.parents[id.0].is_some() || self.roots.contains(&id) {
      return Err(FormError::AlreadyAttached {
        field_id: self.fields[id.0].field_id.clone(),
      });
    }
    self.roots.push(id);
    Ok(())
  }

  /// Append `child` to the children of the group `parent`.
  pub fn attach(&mut self, parent: FieldId, child: FieldId) -> Result<(), FormError> {
    self.check_exists(parent)?;
    self.check_exists(child)?;

    if !self.fields[parent.0].is_group() {
      return Err(FormError::NotAGroup {
        field_id: self.fields[parent.0].field_id.clone(),
      });
    }

    if self.is_ancestor_or_self(child, parent) {
      return Err(FormError::CycleDetected {
        parent: self.fields[parent.0].field_id.clone(),
        child: self.fields[child.0].field_id.clone(),
      });
    }

    if self.parents[child.0].is_some() || self.roots.contains(&child) {
      return Err(FormError::AlreadyAttached {
        field_id: self.fields[child.0].field_id.clone(),
      });
    }

    self.parents[child.0] = Some(parent);
    if let FieldKind::Group(group) = &mut self.fields[parent.0].kind {
      group.children.push(child);
    }
    Ok(())
  }

  /// Finish the form. Every field must be a root or inside a group.
  pub fn build(self) -> Result<Form, FormError> {
    for (index, parent) in self.parents.iter().enumerate() {
      if parent.is_none() && !self.roots.contains(&FieldId(index)) {
        return Err(FormError::Orphan {
          field_id: self.fields[index].field_id.clone(),
        });
      }
    }

    Ok(Form {
      form_id: self.form_id,
      fields: self.fields,
      parents: self.parents,
      roots: self.roots,
    })
  }

  fn check_exists(&self, id: FieldId) -> Result<(), FormError> {
    if id.0 < self.fields.len() {
      Ok(())
    } else {
      Err(FormError::FieldNotFound(id.0))
    }
  }

  /// Walk up from `node` and report whether `candidate` is on the path.
  fn is_ancestor_or_self(&self, candidate: FieldId, node: FieldId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
      if id == candidate {
        return true;
      }
      current = self.parents[id.0];
    }
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::field::{Group, TextInput};

  fn group(id: &str) -> Field {
    Field::new(id, FieldKind::Group(Group::default()))
  }

  fn text(id: &str) -> Field {
    Field::new(id, FieldKind::TextField(TextInput::default()))
  }

  #[test]
  fn test_attach_rejects_ancestor() {
    let mut builder = FormBuilder::new();
    let outer = builder.add_root(group("outer")).unwrap();
    let inner = builder.add(group("inner"));
    builder.attach(outer, inner).unwrap();

    let result = builder.attach(inner, outer);
    assert!(matches!(result, Err(FormError::CycleDetected { .. })));
  }

  #[test]
  fn test_attach_rejects_self() {
    let mut builder = FormBuilder::new();
    let g = builder.add(group("g"));
    assert!(matches!(
      builder.attach(g, g),
      Err(FormError::CycleDetected { .. })
    ));
  }

  #[test]
  fn test_attach_rejects_second_parent() {
    let mut builder = FormBuilder::new();
    let a = builder.add_root(group("a")).unwrap();
    let b = builder.add_root(group("b")).unwrap();
    let child = builder.add(text("child"));
    builder.attach(a, child).unwrap();

    assert_eq!(
      builder.attach(b, child),
      Err(FormError::AlreadyAttached {
        field_id: "child".to_string()
      })
    );
  }

  #[test]
  fn test_attach_rejects_root_as_child() {
    let mut builder = FormBuilder::new();
    let a = builder.add_root(group("a")).unwrap();
    let b = builder.add_root(text("b")).unwrap();
    assert!(matches!(
      builder.attach(a, b),
      Err(FormError::AlreadyAttached { .. })
    ));
  }

  #[test]
  fn test_attach_requires_group_parent() {
    let mut builder = FormBuilder::new();
    let leaf = builder.add_root(text("leaf")).unwrap();
    let child = builder.add(text("child"));
    assert!(matches!(
      builder.attach(leaf, child),
      Err(FormError::NotAGroup { .. })
    ));
  }

  #[test]
  fn test_build_rejects_orphans() {
    let mut builder = FormBuilder::new();
    builder.add_root(text("a")).unwrap();
    builder.add(text("floating"));
    assert_eq!(
      builder.build(),
      Err(FormError::Orphan {
        field_id: "floating".to_string()
      })
    );
  }

  #[test]
  fn test_unknown_field_id() {
    let mut builder = FormBuilder::new();
    let g = builder.add_root(group("g")).unwrap();
    assert_eq!(
      builder.attach(g, FieldId(42)),
      Err(FormError::FieldNotFound(42))
    );
  }
}
