use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VariableError;
use crate::types::Variable;

/// Ordered mapping of variable name to [`Variable`].
///
/// Names are unique: inserting a variable whose name already exists replaces
/// it in place. Iteration follows insertion order, which is the order the
/// engine delivered the variables in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
  variables: IndexMap<String, Variable>,
}

impl VariableStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse the engine's variable map JSON.
  pub fn from_json(value: serde_json::Value) -> Result<Self, VariableError> {
    Ok(serde_json::from_value(value)?)
  }

  /// Insert a variable, returning the one it replaced.
  pub fn insert(&mut self, variable: Variable) -> Option<Variable> {
    self.variables.insert(variable.name.clone(), variable)
  }

  pub fn get(&self, name: &str) -> Option<&Variable> {
    self.variables.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.variables.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.variables.len()
  }

  pub fn is_empty(&self) -> bool {
    self.variables.is_empty()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.variables.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Variable> {
    self.variables.values()
  }

  /// `name -> value` object, the shape template expressions evaluate against.
  pub fn values(&self) -> serde_json::Map<String, serde_json::Value> {
    self
      .variables
      .iter()
      .map(|(name, var)| (name.clone(), var.value.clone()))
      .collect()
  }
}

impl FromIterator<Variable> for VariableStore {
  fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
    let mut store = VariableStore::new();
    for variable in iter {
      store.insert(variable);
    }
    store
  }
}

impl IntoIterator for VariableStore {
  type Item = Variable;
  type IntoIter = indexmap::map::IntoValues<String, Variable>;

  fn into_iter(self) -> Self::IntoIter {
    self.variables.into_values()
  }
}

impl<'a> IntoIterator for &'a VariableStore {
  type Item = &'a Variable;
  type IntoIter = indexmap::map::Values<'a, String, Variable>;

  fn into_iter(self) -> Self::IntoIter {
    self.variables.values()
  }
}

impl Serialize for VariableStore {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(self.variables.iter())
  }
}

impl<'de> Deserialize<'de> for VariableStore {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = IndexMap::<String, Variable>::deserialize(deserializer)?;
    let variables = raw
      .into_iter()
      .map(|(name, mut var)| {
        var.name = name.clone();
        (name, var)
      })
      .collect();
    Ok(Self { variables })
  }
}
