//! Row/column layout on a fixed-width grid.
//!
//! Fields are grouped into rows by their row id. Within a row, fields with an
//! explicit column count keep it, and whatever width is left is shared
//! equally (rounded down) among the fields without one.

use indexmap::IndexMap;
use taskform_form::Field;

/// Row used for fields that do not name one.
pub const DEFAULT_ROW: &str = "default";

/// Anything that can be placed on the grid.
pub trait Laid {
  /// Row id, if the field names one.
  fn row(&self) -> Option<&str>;

  /// Explicit column span, if set.
  fn columns(&self) -> Option<u32>;
}

impl<T: Laid + ?Sized> Laid for &T {
  fn row(&self) -> Option<&str> {
    (**self).row()
  }

  fn columns(&self) -> Option<u32> {
    (**self).columns()
  }
}

impl Laid for Field {
  fn row(&self) -> Option<&str> {
    self.layout.row.as_deref()
  }

  fn columns(&self) -> Option<u32> {
    self.layout.columns
  }
}

/// One laid out row.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow<T> {
  pub row_id: String,
  /// Fields in their original order with the computed span.
  pub entries: Vec<(T, u32)>,
}

impl<T> LayoutRow<T> {
  pub fn total_span(&self) -> u32 {
    self
      .entries
      .iter()
      .map(|(_, span)| *span)
      .fold(0, u32::saturating_add)
  }

  /// Fixed spans in this row add up to more than the grid width.
  pub fn is_overflowing(&self, total_columns: u32) -> bool {
    self.total_span() > total_columns
  }
}

/// Rows in the order their first field appeared.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRows<T> {
  rows: Vec<LayoutRow<T>>,
}

impl<T> LayoutRows<T> {
  pub fn iter(&self) -> impl Iterator<Item = &LayoutRow<T>> {
    self.rows.iter()
  }

  pub fn get(&self, row_id: &str) -> Option<&LayoutRow<T>> {
    self.rows.iter().find(|r| r.row_id == row_id)
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  pub fn into_inner(self) -> Vec<LayoutRow<T>> {
    self.rows
  }
}

impl<T> IntoIterator for LayoutRows<T> {
  type Item = LayoutRow<T>;
  type IntoIter = std::vec::IntoIter<LayoutRow<T>>;

  fn into_iter(self) -> Self::IntoIter {
    self.rows.into_iter()
  }
}

/// Lay out fields on a grid `total_columns` wide.
pub fn layout<T, I>(fields: I, total_columns: u32) -> LayoutRows<T>
where
  T: Laid,
  I: IntoIterator<Item = T>,
{
  let mut grouped: IndexMap<String, Vec<T>> = IndexMap::new();
  for field in fields {
    let row_id = field
      .row()
      .filter(|r| !r.is_empty())
      .unwrap_or(DEFAULT_ROW)
      .to_string();
    grouped.entry(row_id).or_default().push(field);
  }

  let rows = grouped
    .into_iter()
    .map(|(row_id, fields)| solve_row(row_id, fields, total_columns))
    .collect();

  LayoutRows { rows }
}

fn solve_row<T: Laid>(row_id: String, fields: Vec<T>, total_columns: u32) -> LayoutRow<T> {
  let fixed: u32 = fields
    .iter()
    .filter_map(|f| f.columns())
    .fold(0, u32::saturating_add);
  let dynamic = fields.iter().filter(|f| f.columns().is_none()).count() as u32;

  let remaining = total_columns.saturating_sub(fixed);
  let share = if dynamic == 0 { 0 } else { remaining / dynamic };

  let row = LayoutRow {
    entries: fields
      .into_iter()
      .map(|f| {
        let span = f.columns().unwrap_or(share);
        (f, span)
      })
      .collect(),
    row_id,
  };

  if row.is_overflowing(total_columns) {
    tracing::debug!(
      row = %row.row_id,
      span = row.total_span(),
      total_columns,
      "row exceeds grid width"
    );
  }

  row
}
