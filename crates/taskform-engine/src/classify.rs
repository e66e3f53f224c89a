//! Naming-convention classification of variables.
//!
//! A variable named `form_email` belongs to the `form` bucket, `action_ok` to
//! the `action` bucket. Names without a letters-only prefix followed by an
//! underscore go to [`DEFAULT_BUCKET`].

use std::borrow::Cow;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use taskform_variables::{Variable, VariableStore};

/// Bucket for names without a recognizable prefix.
pub const DEFAULT_BUCKET: &str = "default";

static PREFIX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([a-zA-Z]+)_(.*)").expect("valid prefix regex"));

/// Variables grouped by name prefix.
///
/// Buckets appear in the order their first variable appears in the store, and
/// each bucket keeps the store's order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BucketSet {
  buckets: IndexMap<String, IndexMap<String, Variable>>,
}

impl BucketSet {
  pub fn get(&self, bucket: &str) -> Option<&IndexMap<String, Variable>> {
    self.buckets.get(bucket)
  }

  pub fn contains(&self, bucket: &str) -> bool {
    self.buckets.contains_key(bucket)
  }

  /// Variables of a bucket; empty when the bucket does not exist.
  pub fn variables(&self, bucket: &str) -> impl Iterator<Item = &Variable> {
    self.get(bucket).into_iter().flat_map(|b| b.values())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<String, Variable>)> {
    self.buckets.iter().map(|(k, v)| (k.as_str(), v))
  }

  /// Bucket names in first-seen order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.buckets.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.buckets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buckets.is_empty()
  }

  pub fn into_inner(self) -> IndexMap<String, IndexMap<String, Variable>> {
    self.buckets
  }
}

/// Bucket key of a single variable name.
///
/// The prefix is lower-cased; nothing else is normalized.
pub fn bucket_of(name: &str) -> Cow<'_, str> {
  match PREFIX.captures(name).and_then(|c| c.get(1)) {
    Some(prefix) if prefix.as_str().bytes().any(|b| b.is_ascii_uppercase()) => {
      Cow::Owned(prefix.as_str().to_ascii_lowercase())
    }
    Some(prefix) => Cow::Borrowed(prefix.as_str()),
    None => Cow::Borrowed(DEFAULT_BUCKET),
  }
}

/// The part of a name after its bucket prefix, if it has one.
pub(crate) fn suffix_of(name: &str) -> Option<&str> {
  PREFIX
    .captures(name)
    .and_then(|c| c.get(2))
    .map(|m| m.as_str())
}

/// Partition a store into buckets.
pub fn classify(store: &VariableStore) -> BucketSet {
  let mut buckets: IndexMap<String, IndexMap<String, Variable>> = IndexMap::new();

  for variable in store.iter() {
    buckets
      .entry(bucket_of(&variable.name).into_owned())
      .or_default()
      .insert(variable.name.clone(), variable.clone());
  }

  tracing::debug!(
    variables = store.len(),
    buckets = buckets.len(),
    "classified variables"
  );

  BucketSet { buckets }
}
