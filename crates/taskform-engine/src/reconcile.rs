//! Submission reconciliation.
//!
//! The host collects raw control values into a [`SubmissionDraft`]. The
//! reconciler merges that draft with the variables the task was loaded with
//! and coerces every submitted value to the type the engine declared for it.
//!
//! Reconciliation never fails on a single value. Anything that cannot be
//! coerced falls back to a fixed value and is reported as a
//! [`CoercionWarning`].

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskform_variables::{TypeTag, Variable, VariableStore};
use tracing::instrument;

use crate::error::EngineError;

/// Raw values captured from the rendered form at submit time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionDraft {
  /// Control name to raw value.
  pub raw: IndexMap<String, Value>,

  /// Value contributed by the control that submitted the form.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub trigger: Option<IndexMap<String, Value>>,

  /// File fields whose deferred upload has not completed.
  #[serde(skip_serializing_if = "BTreeSet::is_empty")]
  pub pending: BTreeSet<String>,
}

impl SubmissionDraft {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
    self.raw.insert(name.into(), value);
    self
  }

  /// Record the button that submitted the form, with its value as given.
  ///
  /// The value is coerced like any other submitted value, so an action
  /// button's `"true"` becomes a boolean only for a Boolean variable.
  pub fn with_submitter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self
      .trigger
      .get_or_insert_with(IndexMap::new)
      .insert(name.into(), Value::String(value.into()));
    self
  }

  /// Mark a file field as still uploading.
  pub fn with_pending(mut self, name: impl Into<String>) -> Self {
    self.pending.insert(name.into());
    self
  }
}

/// What to submit when a numeric value cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericFallback {
  /// Submit `0`.
  #[default]
  Zero,
  /// Submit the value the variable had when the task was loaded.
  RetainPrevious,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
  pub numeric_fallback: NumericFallback,
}

/// A value that could not be coerced as declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercionWarning {
  pub name: String,
  #[serde(flatten)]
  pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum WarningKind {
  /// Not a number; the numeric fallback was used.
  InvalidNumber { raw: String },
  /// Not a recognizable date; the previous value was kept.
  InvalidDate { raw: String },
  /// Not a JSON object or array; null was submitted.
  InvalidJson { raw: String },
  /// The declared type is not one taskform knows; the value was passed through.
  UnsupportedType { type_name: String },
}

/// The reconciled variables to send back to the process engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Submission {
  pub variables: VariableStore,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub business_key: Option<String>,

  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub warnings: Vec<CoercionWarning>,
}

impl Submission {
  /// The immediate completion of a cancel or back button: only the
  /// button's own value, as a string.
  pub fn cancel(name: impl Into<String>, value: impl Into<String>) -> Self {
    let variable = Variable::new(name, Value::String(value.into()), TypeTag::String);
    Self {
      variables: std::iter::once(variable).collect(),
      business_key: None,
      warnings: Vec::new(),
    }
  }
}

/// Merge a draft with the original variables and coerce it.
///
/// 1. Submitted values are coerced by the original variable's declared type.
/// 2. Original variables that were not submitted keep their value as is.
/// 3. The trigger wins over a submitted value of the same name.
/// 4. Names the original store does not know are passed through untyped,
///    unless they are null or empty.
pub fn reconcile(
  draft: &SubmissionDraft,
  original: &VariableStore,
  options: &ReconcileOptions,
) -> Submission {
  let mut submitted = draft.raw.clone();
  if let Some(trigger) = &draft.trigger {
    for (name, value) in trigger {
      submitted.insert(name.clone(), value.clone());
    }
  }

  let mut coercer = Coercer {
    options,
    warnings: Vec::new(),
  };
  let mut variables = VariableStore::new();

  for previous in original.iter() {
    let mut variable = previous.clone();
    if let Some(raw) = submitted.shift_remove(&previous.name) {
      variable.value = coercer.coerce(previous, raw);
    }
    variables.insert(variable);
  }

  for (name, value) in submitted {
    if is_blank(&value) {
      continue;
    }
    variables.insert(Variable::new(name, value, TypeTag::String));
  }

  Submission {
    variables,
    business_key: None,
    warnings: coercer.warnings,
  }
}

/// Host entry point: check preconditions, then reconcile.
///
/// Fails only when the original store was never loaded or a deferred upload
/// is still running.
#[instrument(skip_all, fields(business_key = ?business_key))]
pub fn submit(
  draft: &SubmissionDraft,
  original: Option<&VariableStore>,
  business_key: Option<String>,
  options: &ReconcileOptions,
) -> Result<Submission, EngineError> {
  let original = original.ok_or(EngineError::MissingVariableStore)?;

  if !draft.pending.is_empty() {
    return Err(EngineError::UploadInFlight {
      fields: draft.pending.iter().cloned().collect(),
    });
  }

  let mut submission = reconcile(draft, original, options);
  submission.business_key = business_key.filter(|k| !k.is_empty());

  tracing::debug!(
    variables = submission.variables.len(),
    warnings = submission.warnings.len(),
    "reconciled submission"
  );

  Ok(submission)
}

fn is_blank(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::String(s) => s.is_empty(),
    _ => false,
  }
}

struct Coercer<'a> {
  options: &'a ReconcileOptions,
  warnings: Vec<CoercionWarning>,
}

impl Coercer<'_> {
  fn coerce(&mut self, previous: &Variable, raw: Value) -> Value {
    match &previous.declared_type {
      TypeTag::Boolean => Value::Bool(parse_bool(&raw)),

      TypeTag::Short | TypeTag::Integer | TypeTag::Long => match parse_integer(&raw) {
        Some(n) => Value::from(n),
        None => self.numeric_fallback(previous, &raw),
      },

      TypeTag::Double => match parse_double(&raw) {
        Some(n) => Value::from(n),
        None => self.numeric_fallback(previous, &raw),
      },

      TypeTag::Date => match parse_date(&raw) {
        Some(date) => Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => {
          self.warn(previous, WarningKind::InvalidDate { raw: raw_text(&raw) });
          previous.value.clone()
        }
      },

      TypeTag::Json | TypeTag::Object => match parse_structured(&raw) {
        Some(value) => value,
        None => {
          if !raw.is_null() {
            self.warn(previous, WarningKind::InvalidJson { raw: raw_text(&raw) });
          }
          Value::Null
        }
      },

      TypeTag::String => raw,

      TypeTag::Other(type_name) => {
        self.warn(
          previous,
          WarningKind::UnsupportedType {
            type_name: type_name.clone(),
          },
        );
        raw
      }
    }
  }

  fn numeric_fallback(&mut self, previous: &Variable, raw: &Value) -> Value {
    self.warn(previous, WarningKind::InvalidNumber { raw: raw_text(raw) });
    match self.options.numeric_fallback {
      NumericFallback::Zero => Value::from(0),
      NumericFallback::RetainPrevious => previous.value.clone(),
    }
  }

  fn warn(&mut self, previous: &Variable, kind: WarningKind) {
    tracing::warn!(
      variable = %previous.name,
      declared_type = %previous.declared_type,
      warning = ?kind,
      "coercion fallback"
    );
    self.warnings.push(CoercionWarning {
      name: previous.name.clone(),
      kind,
    });
  }
}

fn raw_text(raw: &Value) -> String {
  match raw {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

fn parse_bool(raw: &Value) -> bool {
  match raw {
    Value::Bool(b) => *b,
    Value::String(s) => s == "true" || s == "on",
    _ => false,
  }
}

/// Integer parsing in the manner of a lenient form: surrounding whitespace is
/// ignored, and a leading run of digits is accepted even when followed by
/// other characters (`"12px"` is 12).
fn parse_integer(raw: &Value) -> Option<i64> {
  match raw {
    Value::Number(n) => n
      .as_i64()
      .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
    Value::String(s) => leading_integer(s.trim()),
    _ => None,
  }
}

fn leading_integer(s: &str) -> Option<i64> {
  let (negative, digits) = match s.as_bytes().first() {
    Some(b'-') => (true, &s[1..]),
    Some(b'+') => (false, &s[1..]),
    _ => (false, s),
  };

  let end = digits
    .bytes()
    .position(|b| !b.is_ascii_digit())
    .unwrap_or(digits.len());
  if end == 0 {
    return None;
  }

  let n: i64 = digits[..end].parse().ok()?;
  Some(if negative { -n } else { n })
}

fn parse_double(raw: &Value) -> Option<f64> {
  match raw {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  }
  .filter(|f| f.is_finite())
}

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn parse_date(raw: &Value) -> Option<DateTime<Utc>> {
  match raw {
    Value::String(s) => {
      let s = s.trim();
      if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.with_timezone(&Utc));
      }
      for format in NAIVE_DATETIME_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(s, format) {
          return Some(date.and_utc());
        }
      }
      NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
    }
    Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
    _ => None,
  }
}

fn parse_structured(raw: &Value) -> Option<Value> {
  match raw {
    Value::Object(_) | Value::Array(_) => Some(raw.clone()),
    Value::String(s) => serde_json::from_str::<Value>(s)
      .ok()
      .filter(|v| v.is_object() || v.is_array()),
    _ => None,
  }
}
