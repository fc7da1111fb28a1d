//! Ordered records of named cell values.

use crate::value::CellValue;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A record of `column -> value` pairs that keeps insertion order.
///
/// Spreadsheet rows, parser results and store rows all use this shape.
/// Column order matters for display and for export, so a `HashMap` is not
/// used. Serializes as a JSON object with keys in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(Vec<(String, CellValue)>);

impl Row {
    /// Empty row.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Value for a column, if present.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.iter().find(|(k, _)| k == column).map(|(_, v)| v)
    }

    /// Value for a column, `Null` when absent.
    pub fn value(&self, column: &str) -> CellValue {
        self.get(column).cloned().unwrap_or_default()
    }

    /// Set a column, replacing an existing value in place or appending.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == column) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((column, value)),
        }
    }

    /// Builder form of [`Row::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// New row with exactly `columns`, in that order; missing columns are `Null`.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Row {
        Row(columns
            .iter()
            .map(|c| (c.as_ref().to_string(), self.value(c.as_ref())))
            .collect())
    }

    /// Convert to a JSON object (key order follows serde_json's map).
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .0
            .iter()
            .map(|(k, v)| {
                let json = serde_json::to_value(v).unwrap_or(serde_json::Value::Null);
                (k.clone(), json)
            })
            .collect();
        serde_json::Value::Object(map)
    }

    /// Build from a JSON object; non-object input yields `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Row> {
        let obj = value.as_object()?;
        Some(
            obj.iter()
                .map(|(k, v)| (k.clone(), CellValue::from_json(v)))
                .collect(),
        )
    }
}

impl FromIterator<(String, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, CellValue);
    type IntoIter = std::vec::IntoIter<(String, CellValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = Row;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of column names to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
        let mut row = Row::new();
        while let Some((k, v)) = access.next_entry::<String, CellValue>()? {
            row.set(k, v);
        }
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Row, D::Error> {
        deserializer.deserialize_map(RowVisitor)
    }
}

#[cfg(test)]
#[path = "row_test.rs"]
mod tests;
