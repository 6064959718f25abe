//! The two deep-merge strategies used when assembling activities.
//!
//! They differ only in arrays: [`merge_recursive`] concatenates them,
//! [`replace_recursive`] overwrites them element by element.

use serde_json::{Map, Value};

/// Merge `overlay` into `base`. Objects merge key-wise, arrays are
/// concatenated, and any other conflict is won by `overlay`.
pub fn merge_recursive(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match base.get_mut(key) {
            Some(existing) => merge_value(existing, value),
            None => {
                base.insert(key.clone(), value.clone());
            },
        }
    }
}

fn merge_value(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => merge_recursive(base, overlay),
        (Value::Array(base), Value::Array(overlay)) => base.extend(overlay.iter().cloned()),
        (slot, overlay) => *slot = overlay.clone(),
    }
}

/// Replace values in `base` with those from `overlay`, descending into
/// objects and arrays. Arrays are replaced index by index and grow when
/// `overlay` is longer.
pub fn replace_recursive(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match base.get_mut(key) {
            Some(existing) => replace_value(existing, value),
            None => {
                base.insert(key.clone(), value.clone());
            },
        }
    }
}

fn replace_value(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => replace_recursive(base, overlay),
        (Value::Array(base), Value::Array(overlay)) => {
            for (index, item) in overlay.iter().enumerate() {
                match base.get_mut(index) {
                    Some(existing) => replace_value(existing, item),
                    None => base.push(item.clone()),
                }
            }
        },
        (slot, overlay) => *slot = overlay.clone(),
    }
}
