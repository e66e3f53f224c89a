//! Property tests for classification, layout, interpolation and
//! reconciliation.

use proptest::prelude::*;
use serde_json::{Value, json};
use taskform_engine::{
  Laid, ReconcileOptions, SubmissionDraft, bucket_of, classify, interpolate, layout, reconcile,
};
use taskform_variables::{TypeTag, Variable, VariableStore};

#[derive(Debug, Clone, PartialEq)]
struct Cell {
  index: usize,
  row: Option<String>,
  columns: Option<u32>,
}

impl Laid for Cell {
  fn row(&self) -> Option<&str> {
    self.row.as_deref()
  }

  fn columns(&self) -> Option<u32> {
    self.columns
  }
}

fn arb_name() -> impl Strategy<Value = String> {
  prop_oneof![
    "[a-zA-Z]{1,8}_[a-zA-Z0-9_]{0,8}",
    "[a-z0-9_]{1,10}",
    ".{0,12}",
  ]
}

fn arb_type() -> impl Strategy<Value = TypeTag> {
  prop::sample::select(vec![
    TypeTag::String,
    TypeTag::Boolean,
    TypeTag::Short,
    TypeTag::Integer,
    TypeTag::Long,
    TypeTag::Double,
    TypeTag::Date,
    TypeTag::Json,
    TypeTag::Object,
  ])
}

fn arb_value() -> impl Strategy<Value = Value> {
  prop_oneof![
    Just(Value::Null),
    any::<bool>().prop_map(Value::from),
    any::<i32>().prop_map(Value::from),
    ".{0,16}".prop_map(Value::from),
  ]
}

fn arb_store() -> impl Strategy<Value = VariableStore> {
  prop::collection::vec((arb_name(), arb_value(), arb_type()), 0..16).prop_map(|vars| {
    vars
      .into_iter()
      .map(|(name, value, declared_type)| Variable::new(name, value, declared_type))
      .collect()
  })
}

fn arb_cells() -> impl Strategy<Value = Vec<Cell>> {
  prop::collection::vec(
    (
      prop::option::of(prop::sample::select(vec!["a", "b", "c"])),
      prop::option::of(0u32..8),
    ),
    0..12,
  )
  .prop_map(|cells| {
    cells
      .into_iter()
      .enumerate()
      .map(|(index, (row, columns))| Cell {
        index,
        row: row.map(String::from),
        columns,
      })
      .collect()
  })
}

proptest! {
  /// Every variable lands in exactly one bucket, the one its name maps to.
  #[test]
  fn classification_is_total(store in arb_store()) {
    let buckets = classify(&store);

    let total: usize = buckets.iter().map(|(_, vars)| vars.len()).sum();
    prop_assert_eq!(total, store.len());

    for variable in store.iter() {
      let bucket = bucket_of(&variable.name);
      let found = buckets.get(&bucket).and_then(|b| b.get(&variable.name));
      prop_assert_eq!(found, Some(variable));
    }
  }

  /// Classifying the same store twice gives the same result.
  #[test]
  fn classification_is_deterministic(store in arb_store()) {
    prop_assert_eq!(classify(&store), classify(&store));
  }

  /// Every field appears exactly once, in its original relative order.
  #[test]
  fn layout_is_complete_and_stable(cells in arb_cells(), total in 1u32..24) {
    let rows = layout(cells.clone(), total);

    let mut seen: Vec<usize> = Vec::new();
    for row in rows.iter() {
      let indices: Vec<usize> = row.entries.iter().map(|(c, _)| c.index).collect();
      let mut sorted = indices.clone();
      sorted.sort();
      prop_assert_eq!(&indices, &sorted);
      seen.extend(indices);
    }
    seen.sort();
    prop_assert_eq!(seen, (0..cells.len()).collect::<Vec<_>>());
  }

  /// Explicit spans are kept and dynamic fields in a row share equally.
  #[test]
  fn layout_spans(cells in arb_cells(), total in 1u32..24) {
    for row in layout(cells, total).iter() {
      let fixed: u32 = row.entries.iter().filter_map(|(c, _)| c.columns).sum();
      let dynamic: Vec<u32> = row
        .entries
        .iter()
        .filter(|(c, _)| c.columns.is_none())
        .map(|(_, span)| *span)
        .collect();

      for (cell, span) in &row.entries {
        if let Some(columns) = cell.columns {
          prop_assert_eq!(*span, columns);
        }
      }
      if let Some(first) = dynamic.first() {
        prop_assert!(dynamic.iter().all(|s| s == first));
        prop_assert_eq!(*first, total.saturating_sub(fixed) / dynamic.len() as u32);
      }
      if fixed <= total {
        prop_assert!(row.total_span() <= total);
      }
    }
  }

  /// Interpolation accepts any input.
  #[test]
  fn interpolation_never_panics(text in ".{0,64}", store in arb_store()) {
    let _ = interpolate(&text, &store);
  }

  /// Text without a template opener comes back unchanged.
  #[test]
  fn interpolation_without_tokens_is_identity(text in "[^$]{0,64}", store in arb_store()) {
    prop_assert_eq!(interpolate(&text, &store), text);
  }

  /// An empty draft leaves every variable exactly as it was.
  #[test]
  fn reconcile_keeps_untouched_fields(store in arb_store()) {
    let submission = reconcile(&SubmissionDraft::new(), &store, &ReconcileOptions::default());
    prop_assert_eq!(submission.variables, store);
    prop_assert!(submission.warnings.is_empty());
  }

  /// Submitted values always come back in the shape their type demands.
  #[test]
  fn reconcile_type_fidelity(declared_type in arb_type(), raw in arb_value()) {
    let store: VariableStore =
      std::iter::once(Variable::new("form_x", json!(null), declared_type.clone())).collect();
    let draft = SubmissionDraft::new().with_value("form_x", raw.clone());
    let submission = reconcile(&draft, &store, &ReconcileOptions::default());
    let value = &submission.variables.get("form_x").unwrap().value;

    match declared_type {
      TypeTag::Boolean => prop_assert!(value.is_boolean()),
      TypeTag::Short | TypeTag::Integer | TypeTag::Long => prop_assert!(value.is_i64()),
      TypeTag::Double => prop_assert!(value.is_number()),
      TypeTag::Json | TypeTag::Object => {
        prop_assert!(value.is_null() || value.is_object() || value.is_array())
      }
      TypeTag::Date => prop_assert!(value.is_null() || value.is_string()),
      _ => prop_assert_eq!(value, &raw),
    }
  }
}
