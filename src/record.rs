//! # Record
//!
//! A record is one parsed log line, or one aggregate result, stored as a flat
//! map of string fields. Typed views are computed on demand so a record never
//! needs a schema: a field is a float only when someone asks for it as one.
//!
//! Records move between tasks by value. Whoever received a record last owns
//! it, so no two reducers ever touch the same record at once.

use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Field storage of a [`Record`].
pub type Fields = HashMap<String, String>;

/// Placeholder used by [`Record::fields_hash`] for absent fields.
pub const NULL_VALUE: &str = "NULL";

/// Separator between `'name'=value` pairs in [`Record::fields_hash`].
pub const HASH_DELIMITER: &str = ";";

/// A mapping of field names to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
  fields: Fields,
}

impl Record {
  /// Creates a record owning the given fields.
  pub fn new(fields: Fields) -> Self {
    Self { fields }
  }

  /// Creates a record with no fields, the starting point of every aggregate.
  pub fn empty() -> Self {
    Self::default()
  }

  /// Number of fields.
  pub fn len(&self) -> usize {
    self.fields.len()
  }

  /// Returns `true` when the record has no fields.
  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  /// Read-only access to the underlying map.
  pub fn fields(&self) -> &Fields {
    &self.fields
  }

  /// Consumes the record, returning its fields.
  pub fn into_fields(self) -> Fields {
    self.fields
  }

  /// Returns the raw value of a field.
  pub fn field(&self, name: &str) -> Result<&str, FieldError> {
    self
      .fields
      .get(name)
      .map(String::as_str)
      .ok_or_else(|| FieldError::Missing(name.to_string()))
  }

  /// Returns a field parsed as a signed integer.
  pub fn int_field(&self, name: &str) -> Result<i64, FieldError> {
    self.typed_field(name, "integer")
  }

  /// Returns a field parsed as an unsigned integer.
  pub fn uint_field(&self, name: &str) -> Result<u64, FieldError> {
    self.typed_field(name, "unsigned integer")
  }

  /// Returns a field parsed as a float.
  pub fn float_field(&self, name: &str) -> Result<f64, FieldError> {
    self.typed_field(name, "float")
  }

  fn typed_field<T: FromStr>(&self, name: &str, kind: &'static str) -> Result<T, FieldError> {
    let value = self.field(name)?;
    value.parse().map_err(|_| FieldError::Invalid {
      name: name.to_string(),
      value: value.to_string(),
      kind,
    })
  }

  /// Sets a field, replacing any previous value.
  pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.fields.insert(name.into(), value.into());
  }

  /// Sets a field to the base-10 form of a signed integer.
  pub fn set_int_field(&mut self, name: impl Into<String>, value: i64) {
    self.set_field(name, value.to_string());
  }

  /// Sets a field to the base-10 form of an unsigned integer.
  pub fn set_uint_field(&mut self, name: impl Into<String>, value: u64) {
    self.set_field(name, value.to_string());
  }

  /// Sets a field to a float written with two decimal places.
  pub fn set_float_field(&mut self, name: impl Into<String>, value: f64) {
    self.set_field(name, format!("{:.2}", value));
  }

  /// Copies every field of `other` into this record. On a name collision the
  /// value from `other` wins.
  pub fn merge(&mut self, other: Record) {
    self.fields.extend(other.fields);
  }

  /// Builds a new record holding only the listed fields. Names the record
  /// does not have are skipped.
  pub fn partial<S: AsRef<str>>(&self, names: &[S]) -> Record {
    let fields = names
      .iter()
      .filter_map(|name| {
        let name = name.as_ref();
        self
          .fields
          .get(name)
          .map(|value| (name.to_string(), value.clone()))
      })
      .collect();
    Record { fields }
  }

  /// Deterministic key over the listed fields, in the given order:
  /// `'a'=1;'b'=2`. An absent field is rendered as `'name'=NULL`.
  pub fn fields_hash<S: AsRef<str>>(&self, names: &[S]) -> String {
    names
      .iter()
      .map(|name| {
        let name = name.as_ref();
        let value = self.fields.get(name).map_or(NULL_VALUE, String::as_str);
        format!("'{}'={}", name, value)
      })
      .collect::<Vec<_>>()
      .join(HASH_DELIMITER)
  }
}

impl fmt::Display for Record {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut names: Vec<&String> = self.fields.keys().collect();
    names.sort();
    f.write_str(&self.fields_hash(names.as_slice()))
  }
}

impl From<Fields> for Record {
  fn from(fields: Fields) -> Self {
    Self::new(fields)
  }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Record
where
  K: Into<String>,
  V: Into<String>,
{
  fn from(pairs: [(K, V); N]) -> Self {
    pairs.into_iter().collect()
  }
}

impl<K, V> FromIterator<(K, V)> for Record
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      fields: iter
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect(),
    }
  }
}
