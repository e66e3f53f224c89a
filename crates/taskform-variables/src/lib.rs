//! Taskform Variables
//!
//! The variable store is the typed key/value bag describing a task's data:
//! each variable carries its current value, the type the process engine
//! declared for it, an optional display label and opaque engine metadata.
//!
//! The declared type drives coercion at submission time. It is never
//! inferred from the JSON shape of the value.

mod error;
mod store;
mod types;

pub use error::VariableError;
pub use store::VariableStore;
pub use types::{TypeTag, Variable};
