use thiserror::Error;

#[derive(Debug, Error)]
pub enum VariableError {
  /// The payload is not a JSON object of variables.
  #[error("invalid variable store: {0}")]
  Parse(#[from] serde_json::Error),
}
