//! Option values and structural equality.
//!
//! Options carry no identity beyond their value. Two options are equal when
//! their canonical serializations match: the option is serialized with
//! `serde_json`, record keys are sorted recursively, and the resulting text
//! is compared. `{"a": 1, "b": 2}` and `{"b": 2, "a": 1}` are therefore the
//! same option.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SelectResult;

/// Types that can be offered as options.
///
/// Blanket-implemented for every cloneable, serializable, thread-safe type,
/// so `String`, `&'static str`, [`OptionItem`], `serde_json::Value` and
/// host-defined `#[derive(Serialize)]` records all work.
pub trait SelectOption: Clone + Serialize + Send + Sync + 'static {}

impl<T> SelectOption for T where T: Clone + Serialize + Send + Sync + 'static {}

/// A ready-made option type: either plain text or a structured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionItem {
    /// An opaque string option.
    Text(String),
    /// A structured record option.
    Record(Map<String, Value>),
}

impl OptionItem {
    /// Build an item from a JSON value.
    ///
    /// Strings become [`OptionItem::Text`], objects become
    /// [`OptionItem::Record`]; anything else is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text)),
            Value::Object(map) => Some(Self::Record(map)),
            _ => None,
        }
    }

    /// The text of a text option.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Record(_) => None,
        }
    }
}

impl From<&str> for OptionItem {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for OptionItem {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Map<String, Value>> for OptionItem {
    fn from(map: Map<String, Value>) -> Self {
        Self::Record(map)
    }
}

/// Serialize an option into its canonical form: JSON with record keys
/// sorted at every depth.
pub fn canonical_json<T: Serialize + ?Sized>(option: &T) -> SelectResult<String> {
    let value = serde_json::to_value(option)?;
    let mut out = String::new();
    write_canonical(&value, &mut out);
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Display on a JSON string value yields the escaped literal.
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Deep structural equality between two options.
pub fn options_equal<T: Serialize + ?Sized>(a: &T, b: &T) -> SelectResult<bool> {
    Ok(canonical_json(a)? == canonical_json(b)?)
}

/// Position of the first element of `items` structurally equal to `option`.
pub fn position_of<T: Serialize>(items: &[T], option: &T) -> SelectResult<Option<usize>> {
    let key = canonical_json(option)?;
    for (i, item) in items.iter().enumerate() {
        if canonical_json(item)? == key {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

/// The default display string of an option.
///
/// String options display as themselves; anything else displays as its
/// canonical JSON.
pub fn display_string<T: Serialize + ?Sized>(option: &T) -> SelectResult<String> {
    match serde_json::to_value(option)? {
        Value::String(text) => Ok(text),
        other => {
            let mut out = String::new();
            write_canonical(&other, &mut out);
            Ok(out)
        }
    }
}
