// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute tables: one record per shape, fields kept in insertion order.

use rustc_hash::FxHashMap;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// One row of an attribute table.
pub type Record = FxHashMap<String, Value>;

/// Records index-aligned with a layer's shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeTable {
    fields: Vec<String>,
    records: Vec<Record>,
}

impl AttributeTable {
    /// Creates an empty table with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from rows of `(field, value)` pairs.
    ///
    /// Field order is the order in which names are first seen.
    pub fn from_records<I, R, K>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut table = Self::new();
        for row in rows {
            table.push_record(row);
        }
        table
    }

    /// Appends a record, registering any new field names.
    pub fn push_record<R, K>(&mut self, row: R)
    where
        R: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut record = Record::default();
        for (key, value) in row {
            let key = key.into();
            if !self.fields.contains(&key) {
                self.fields.push(key.clone());
            }
            record.insert(key, value);
        }
        self.records.push(record);
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field_exists(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Value of `field` in record `index`; `None` if either is missing.
    pub fn get(&self, index: usize, field: &str) -> Option<&Value> {
        self.records.get(index).and_then(|r| r.get(field))
    }

    /// Keeps the records whose index satisfies `keep`.
    pub fn retain_indices<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        let mut index = 0;
        self.records.retain(|_| {
            let k = keep(index);
            index += 1;
            k
        });
    }
}
