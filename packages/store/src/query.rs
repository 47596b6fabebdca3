//! Filter and order evaluation shared by the in-process stores.

use std::cmp::Ordering;

use serde_json::Value;

use crate::record::{Filter, Order};

/// True when every filter column equals the row's value for that column.
pub fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| row.get(&f.column) == Some(&f.value))
}

/// Stable-sort rows by a single column. Rows missing the column sort first.
pub fn sort_rows(rows: &mut [Value], order: &Order) {
    rows.sort_by(|a, b| {
        let ord = cmp_values(a.get(&order.column), b.get(&order.column));
        if order.descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

/// Shallow-merge the patch object's keys into the row. Non-object patches
/// leave the row untouched.
pub fn merge(row: &mut Value, patch: &Value) {
    if let (Value::Object(row), Value::Object(patch)) = (row, patch) {
        for (key, value) in patch {
            row.insert(key.clone(), value.clone());
        }
    }
}

fn cmp_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
