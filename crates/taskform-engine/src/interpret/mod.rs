//! Field tree interpretation.
//!
//! A form is described either by an explicit component tree (schema mode) or
//! by nothing but the task's variables, whose name prefixes decide how each
//! one is shown (convention mode). Both produce a [`RenderedForm`].

mod convention;
mod schema;

use serde_json::Value;
use taskform_config::FormDef;
use taskform_form::Form;
use taskform_resolver::{Resolver, StandardResolver};
use taskform_variables::VariableStore;
use tracing::instrument;

use crate::classify::{BucketSet, classify};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::host::HostContext;
use crate::interpolate::Interpolator;
use crate::render::{FormMode, RenderedForm};

/// A form definition ready for interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
  /// An explicit component tree.
  Schema(Form),
  /// Variables grouped by naming convention.
  Convention(BucketSet),
}

impl Definition {
  pub fn mode(&self) -> FormMode {
    match self {
      Definition::Schema(_) => FormMode::Schema,
      Definition::Convention(_) => FormMode::Convention,
    }
  }
}

/// A form definition as loaded from JSON, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSource {
  Schema(FormDef),
  Variables(VariableStore),
}

impl FormSource {
  /// Decide the definition mode from the JSON shape.
  ///
  /// An array of components, or an object with a `components` array, is a
  /// component tree. Any other object is a variable map.
  pub fn from_json(value: Value) -> Result<Self, EngineError> {
    let is_schema = match &value {
      Value::Array(_) => true,
      Value::Object(map) => map.get("components").is_some_and(Value::is_array),
      _ => {
        return Err(EngineError::InvalidSource {
          message: "expected a JSON object or array".to_string(),
        });
      }
    };

    if !is_schema {
      return VariableStore::from_json(value)
        .map(FormSource::Variables)
        .map_err(|e| EngineError::InvalidSource {
          message: e.to_string(),
        });
    }

    FormDef::from_value(value)
      .map(FormSource::Schema)
      .map_err(|e| EngineError::InvalidSource {
        message: e.to_string(),
      })
  }

  /// Variables carried by a convention source.
  pub fn variables(&self) -> Option<&VariableStore> {
    match self {
      FormSource::Variables(store) => Some(store),
      FormSource::Schema(_) => None,
    }
  }

  /// Resolve a component tree or classify a variable map.
  pub fn into_definition(self) -> Result<Definition, EngineError> {
    match self {
      FormSource::Schema(def) => Ok(Definition::Schema(StandardResolver::new().resolve(def)?)),
      FormSource::Variables(store) => Ok(Definition::Convention(classify(&store))),
    }
  }
}

/// Interpret a definition against the current variables.
///
/// Never fails: unknown field types and buckets are rendered as placeholders
/// or skipped, and unresolved templates render empty.
#[instrument(skip_all, fields(mode = ?definition.mode()))]
pub fn interpret(
  definition: &Definition,
  store: &VariableStore,
  host: &HostContext,
  config: &EngineConfig,
) -> RenderedForm {
  let interpolator = Interpolator::new(store);

  let form = match definition {
    Definition::Schema(form) => schema::interpret(form, &interpolator, host, config),
    Definition::Convention(buckets) => {
      convention::interpret(buckets, store, &interpolator, host, config)
    }
  };

  tracing::debug!(
    rows = form.body.len(),
    needs_default_submit = form.needs_default_submit,
    "interpreted form"
  );

  form
}
