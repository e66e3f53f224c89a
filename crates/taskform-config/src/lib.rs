//! Taskform Config
//!
//! This crate contains the serializable form definition types for taskform.
//! These types mirror the component tree a process engine delivers for a
//! deployed task or start form, before it is resolved into a typed form.
//!
//! Definitions can be loaded from:
//! - JSON files (via CLI with `taskform render form.json`)
//! - The engine's deployed-form endpoint (as JSON blobs)
//!
//! The resolver takes these types, validates them, and turns them into the
//! typed field tree the interpreter walks.

mod field;
mod flag;
mod form;
mod lenient;

pub use field::{AppearanceDef, FieldDef, LayoutDef, ValidateDef, ValueOption};
pub use flag::Flag;
pub use form::FormDef;
