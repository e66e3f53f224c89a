//! Taskform Form
//!
//! This crate provides the "locked" form representation for taskform.
//! A locked form is the validated, typed form of a form definition that is
//! ready for interpretation.
//!
//! Key differences from `taskform-config`:
//! - Every field has a typed kind; unknown component types are kept as
//!   [`FieldKind::Unknown`] instead of failing the whole form
//! - Fields live in an arena and groups refer to children by [`FieldId`]
//! - The tree is acyclic by construction ([`FormBuilder::attach`] refuses to
//!   place a group inside its own subtree)

mod builder;
mod error;
mod field;
mod form;

pub use builder::FormBuilder;
pub use error::FormError;
pub use field::{
  ButtonAction, ButtonSpec, Choice, ChoiceStyle, DateInput, DateSubtype, Field, FieldKind,
  FileInput, Group, Layout, NumberInput, TextFormat, TextInput, WidgetKind,
};
pub use form::{FieldId, Form};
