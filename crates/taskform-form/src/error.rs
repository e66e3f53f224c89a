use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
  #[error("field not found: {0}")]
  FieldNotFound(usize),

  /// Attaching the child would make a group contain one of its ancestors.
  #[error("cycle detected: field '{child}' is an ancestor of group '{parent}'")]
  CycleDetected { parent: String, child: String },

  #[error("field '{field_id}' already has a parent")]
  AlreadyAttached { field_id: String },

  #[error("field '{field_id}' is not a group and cannot have children")]
  NotAGroup { field_id: String },

  /// A field that is neither a root nor a child of a group.
  #[error("field '{field_id}' is not reachable from the form root")]
  Orphan { field_id: String },
}
