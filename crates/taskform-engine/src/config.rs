use serde::{Deserialize, Serialize};

use crate::reconcile::{NumericFallback, ReconcileOptions};

/// Default grid width in columns.
pub const DEFAULT_TOTAL_COLUMNS: u32 = 16;

/// Engine configuration.
///
/// Every field has a default, so a partial `config.json` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Width of the layout grid.
  pub total_columns: u32,

  /// Value used when a numeric variable cannot be parsed.
  pub numeric_fallback: NumericFallback,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      total_columns: DEFAULT_TOTAL_COLUMNS,
      numeric_fallback: NumericFallback::default(),
    }
  }
}

impl EngineConfig {
  pub fn reconcile_options(&self) -> ReconcileOptions {
    ReconcileOptions {
      numeric_fallback: self.numeric_fallback,
    }
  }
}
