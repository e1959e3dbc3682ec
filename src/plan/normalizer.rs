//! Attribute change normalization
//!
//! A resource's change record spreads each attribute over up to three maps:
//! `before`, `after` and `after_unknown`. [`normalize`] merges them into one
//! [`AttributeChangeRow`] per attribute name and decides whether that
//! attribute changed.
//!
//! The overlay order matters and is fixed:
//!
//! 1. seed a row for every `after_unknown` key (values start null);
//! 2. overlay `after` values, defaulting `changed` to false;
//! 3. overlay `before` values and compare them against the row's `after`.
//!
//! A key seen only in `before` is a removal and is always changed. A key
//! whose `after_unknown` flag is `true` keeps that flag even when step 2 gives
//! it a concrete value, and is always reported as changed.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::model::Change;

/// The merged view of one attribute across before/after/after_unknown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChangeRow {
    /// Attribute name within the resource
    pub address: String,

    /// Value before the change, null when absent
    pub before: Value,

    /// Value after the change, null when absent or not yet known
    pub after: Value,

    /// Whether the resulting value is only known after apply
    #[serde(rename = "isAfterUnknown")]
    pub is_after_unknown: bool,

    pub changed: bool,

    /// Marked sensitive in `before_sensitive` or `after_sensitive`
    pub sensitive: bool,
}

impl AttributeChangeRow {
    fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            before: Value::Null,
            after: Value::Null,
            is_after_unknown: false,
            changed: false,
            sensitive: false,
        }
    }

    /// Attribute name with underscores shown as spaces
    pub fn display_name(&self) -> String {
        self.address.replace('_', " ")
    }

    pub fn formatted_before(&self) -> String {
        format_value(&self.before)
    }

    pub fn formatted_after(&self) -> String {
        format_value(&self.after)
    }
}

const REDACTED: &str = "(sensitive)";

/// Rows of one change, in first-seen order, addressable by attribute name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    rows: Vec<AttributeChangeRow>,
    index: HashMap<String, usize>,
}

impl ChangeSet {
    fn entry(&mut self, address: &str) -> (&mut AttributeChangeRow, bool) {
        match self.index.get(address).copied() {
            Some(position) => (&mut self.rows[position], true),
            None => {
                self.index.insert(address.to_string(), self.rows.len());
                self.rows.push(AttributeChangeRow::new(address));
                let last = self.rows.len() - 1;
                (&mut self.rows[last], false)
            }
        }
    }

    /// All rows, changed or not
    pub fn rows(&self) -> &[AttributeChangeRow] {
        &self.rows
    }

    /// Rows shown in the "what changed" list
    pub fn changed(&self) -> impl Iterator<Item = &AttributeChangeRow> {
        self.rows.iter().filter(|row| row.changed)
    }

    pub fn changed_count(&self) -> usize {
        self.changed().count()
    }

    /// Rows suppressed from the detail view because nothing changed
    pub fn unchanged_count(&self) -> usize {
        self.rows.len() - self.changed_count()
    }

    /// Replace present values of sensitive rows with a placeholder
    pub fn redact_sensitive(&mut self) {
        for row in self.rows.iter_mut().filter(|row| row.sensitive) {
            for value in [&mut row.before, &mut row.after] {
                if !value.is_null() {
                    *value = Value::String(REDACTED.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
impl ChangeSet {
    pub fn get(&self, address: &str) -> Option<&AttributeChangeRow> {
        self.index.get(address).map(|&position| &self.rows[position])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for ChangeSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(&row.address, row)?;
        }
        map.end()
    }
}

/// Merge a change's attribute maps into one row per attribute
pub fn normalize(change: &Change) -> ChangeSet {
    let mut set = ChangeSet::default();

    for (key, value) in &change.after_unknown {
        let (row, _) = set.entry(key);
        row.is_after_unknown = *value == Value::Bool(true);
        row.changed = row.is_after_unknown;
    }

    for (key, value) in &change.after {
        let (row, _) = set.entry(key);
        row.after = value.clone();
        row.changed = false;
    }

    for (key, value) in &change.before {
        let (row, existed) = set.entry(key);
        row.before = value.clone();
        row.changed = !existed || values_differ(value, &row.after);
    }

    for row in &mut set.rows {
        row.changed |= row.is_after_unknown;
        row.sensitive = change.is_sensitive(&row.address);
    }

    set
}

/// Deep inequality of two attribute values
///
/// Sequences and maps compare structurally and order-sensitively, which is
/// the same as comparing their order-preserving serialized form. Numbers
/// compare by numeric value. Everything else uses strict equality, so a value
/// is never equal to null unless it is null.
pub fn values_differ(a: &Value, b: &Value) -> bool {
    !values_equal(a, b)
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left.iter().zip(right).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|((lk, lv), (rk, rv))| lk == rk && values_equal(lv, rv))
        }
        (Value::Number(left), Value::Number(right)) => match (left.as_f64(), right.as_f64()) {
            (Some(l), Some(r)) => l == r,
            _ => left == right,
        },
        _ => a == b,
    }
}

/// Strings are shown raw; everything else as 2-space indented JSON
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
