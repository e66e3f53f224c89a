use thiserror::Error;

/// Errors that can occur during form resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// The field tree could not be assembled.
  #[error("invalid form structure: {0}")]
  Structure(#[from] taskform_form::FormError),
}
