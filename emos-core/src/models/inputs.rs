use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::InputField;
use crate::ProcessingError;

/// A `{value, label}` pair from an auxiliary multi-select group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub value: String,
    pub label: String,
}

impl Selection {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Value of one input as it travels over the wire.
///
/// Text-like controls send strings, checkboxes send booleans, auxiliary
/// groups send lists of selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Flag(bool),
    Number(f64),
    Text(String),
    Selections(Vec<Selection>),
}

impl InputValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Short human rendering, as shown next to a field.
    pub fn display(&self) -> String {
        match self {
            Self::Flag(true) => "[x]".to_string(),
            Self::Flag(false) => "[ ]".to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Selections(items) => items
                .iter()
                .map(|s| s.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Flat mapping of every input value of one panel, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelInputs(BTreeMap<String, InputValue>);

impl PanelInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs holding each field's default value.
    pub fn defaults_for(fields: &[InputField]) -> Self {
        Self(
            fields
                .iter()
                .map(|f| (f.key.to_string(), f.default_value()))
                .collect(),
        )
    }

    pub fn insert(&mut self, key: impl Into<String>, value: InputValue) -> Option<InputValue> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InputValue)> {
        self.0.iter()
    }

    /// Text of a field, `None` when absent or blank.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(InputValue::Text(s)) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    /// Text of a field, or `default` when absent or blank.
    pub fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.text(key).unwrap_or(default)
    }

    /// Checkbox state; absent reads as `default`.
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(InputValue::Flag(b)) => *b,
            Some(InputValue::Text(s)) => matches!(s.as_str(), "true" | "on" | "1"),
            _ => default,
        }
    }

    /// Numeric value of a field. Blank reads as `None`, garbage is an error.
    pub fn number(&self, key: &str, label: &str) -> Result<Option<f64>, ProcessingError> {
        match self.0.get(key) {
            Some(InputValue::Number(n)) => Ok(Some(*n)),
            Some(InputValue::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(InputValue::Text(s)) => {
                s.trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| ProcessingError::InvalidNumber {
                        label: label.to_string(),
                        value: s.clone(),
                    })
            }
            _ => Ok(None),
        }
    }

    /// Selections of an auxiliary group; absent reads as empty.
    pub fn selections(&self, key: &str) -> &[Selection] {
        match self.0.get(key) {
            Some(InputValue::Selections(items)) => items,
            _ => &[],
        }
    }

    /// Fail with [`ProcessingError::MissingInput`] for the first required
    /// field left blank.
    pub fn require(&self, fields: &[InputField]) -> Result<(), ProcessingError> {
        for field in fields.iter().filter(|f| f.required) {
            let present = match self.0.get(field.key) {
                Some(InputValue::Text(s)) => !s.trim().is_empty(),
                Some(_) => true,
                None => false,
            };
            if !present {
                return Err(ProcessingError::MissingInput(field.label.to_string()));
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, InputValue)> for PanelInputs {
    fn from_iter<I: IntoIterator<Item = (String, InputValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
