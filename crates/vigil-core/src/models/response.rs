use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{json_kind, CoreError};

/// A raw response normalized into one strict shape.
///
/// The presentation layer sends numbers, `"Yes"`/`"No"`, stringified option
/// values and checkbox sentinels. They are folded into this enum once, at the
/// boundary, and evaluators only ever see the normalized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Number(f64),
    YesNo(bool),
    Checked(bool),
    Selected(f64),
}

impl Answer {
    /// Normalize one raw JSON answer. `None` means "unanswered".
    pub fn from_raw(raw: &Value) -> Option<Self> {
        match raw {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(Self::Number),
            Value::Bool(b) => Some(Self::Checked(*b)),
            Value::String(s) => Self::from_text(s),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn from_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match text.to_ascii_lowercase().as_str() {
            "yes" => return Some(Self::YesNo(true)),
            "no" => return Some(Self::YesNo(false)),
            "true" | "on" => return Some(Self::Checked(true)),
            "false" | "off" => return Some(Self::Checked(false)),
            _ => {}
        }
        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::Selected)
    }

    /// Numeric reading of the answer. Booleans and yes/no have none.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) | Self::Selected(n) => Some(*n),
            Self::YesNo(_) | Self::Checked(_) => None,
        }
    }

    /// Checkbox reading of the answer: true, 1, "1", "true" and "Yes" are
    /// checked; false, 0, "0", "false" and "No" are unchecked.
    pub fn is_checked(&self) -> Option<bool> {
        match self {
            Self::Checked(b) | Self::YesNo(b) => Some(*b),
            Self::Number(n) | Self::Selected(n) => {
                if *n == 1.0 {
                    Some(true)
                } else if *n == 0.0 {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }
}

/// An immutable snapshot of every answer collected so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Responses {
    answers: BTreeMap<String, Answer>,
}

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a flat JSON object of raw answers.
    ///
    /// Entries that do not normalize (null, empty or free text, nested
    /// values) are dropped and count as unanswered.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        let Value::Object(map) = value else {
            return Err(CoreError::NotAnObject {
                what: "responses",
                found: json_kind(value),
            });
        };
        Ok(map.iter().collect())
    }

    pub fn insert(&mut self, key: impl Into<String>, answer: Answer) {
        self.answers.insert(key.into(), answer);
    }

    pub fn get(&self, key: &str) -> Option<Answer> {
        self.answers.get(key).copied()
    }

    /// Answer for an item, preferring the instrument-qualified key
    /// `"<instrument>.<item>"` over the bare item key.
    pub fn lookup(&self, instrument_id: &str, item_key: &str) -> Option<Answer> {
        self.answers
            .get(&format!("{instrument_id}.{item_key}"))
            .or_else(|| self.answers.get(item_key))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl<'a, K: AsRef<str>> FromIterator<(K, &'a Value)> for Responses {
    fn from_iter<T: IntoIterator<Item = (K, &'a Value)>>(iter: T) -> Self {
        let mut responses = Self::new();
        for (key, raw) in iter {
            let key = key.as_ref();
            match Answer::from_raw(raw) {
                Some(answer) => responses.insert(key, answer),
                None => tracing::debug!(key, raw = %raw, "dropping unreadable answer"),
            }
        }
        responses
    }
}
