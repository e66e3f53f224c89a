//! Engine error types.

use taskform_resolver::ResolveError;

/// Errors surfaced to the host.
///
/// Everything else the engine encounters (unknown buckets, unsupported field
/// types, unparsable values) is absorbed and logged.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  /// Submission was attempted before the variable store was loaded.
  #[error("variable store not loaded")]
  MissingVariableStore,

  /// Files selected for deferred upload have not finished uploading.
  #[error("upload still in progress for: {}", fields.join(", "))]
  UploadInFlight { fields: Vec<String> },

  /// The form definition could not be resolved into a form.
  #[error("failed to resolve form: {0}")]
  Resolve(#[from] ResolveError),

  /// The definition JSON is neither a component tree nor a variable map.
  #[error("invalid form source: {message}")]
  InvalidSource { message: String },
}
