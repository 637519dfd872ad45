use serde::Serialize;

use super::InputValue;

/// One entry of a select input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub text: &'static str,
}

/// Shorthand for building option tables.
pub const fn opt(value: &'static str, text: &'static str) -> SelectOption {
    SelectOption { value, text }
}

/// The control an input field is rendered as.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    Text {
        placeholder: &'static str,
    },
    Number {
        min: &'static str,
        max: &'static str,
        step: &'static str,
    },
    Select {
        options: Vec<SelectOption>,
    },
    File {
        accept: &'static str,
    },
    Checkbox {
        checked: bool,
    },
}

/// One panel input: key, label and kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputField {
    /// Key the value is sent under.
    pub key: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
}

impl InputField {
    pub fn text(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self::new(key, label, InputKind::Text { placeholder })
    }

    pub fn number(
        key: &'static str,
        label: &'static str,
        min: &'static str,
        max: &'static str,
        step: &'static str,
    ) -> Self {
        Self::new(key, label, InputKind::Number { min, max, step })
    }

    pub fn select(key: &'static str, label: &'static str, options: &[SelectOption]) -> Self {
        Self::new(
            key,
            label,
            InputKind::Select {
                options: options.to_vec(),
            },
        )
    }

    pub fn file(key: &'static str, label: &'static str, accept: &'static str) -> Self {
        Self::new(key, label, InputKind::File { accept })
    }

    pub fn checkbox(key: &'static str, label: &'static str, checked: bool) -> Self {
        Self::new(key, label, InputKind::Checkbox { checked })
    }

    fn new(key: &'static str, label: &'static str, kind: InputKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The value a freshly opened panel holds for this field.
    ///
    /// Selects start on their first option, checkboxes on their declared
    /// state, everything else empty.
    pub fn default_value(&self) -> InputValue {
        match &self.kind {
            InputKind::Checkbox { checked } => InputValue::Flag(*checked),
            InputKind::Select { options } => InputValue::Text(
                options
                    .first()
                    .map(|o| o.value.to_string())
                    .unwrap_or_default(),
            ),
            InputKind::Text { .. } | InputKind::Number { .. } | InputKind::File { .. } => {
                InputValue::Text(String::new())
            }
        }
    }

    /// Parse user-typed text into a value of this field's kind.
    ///
    /// Checkboxes accept the usual yes/no spellings; selects accept either an
    /// option value or its display text.
    pub fn parse_value(&self, raw: &str) -> Result<InputValue, String> {
        let raw = raw.trim();
        match &self.kind {
            InputKind::Checkbox { .. } => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" | "x" => Ok(InputValue::Flag(true)),
                "false" | "no" | "off" | "0" | "" => Ok(InputValue::Flag(false)),
                other => Err(format!("'{}' is not a checkbox value (use on/off)", other)),
            },
            InputKind::Select { options } => options
                .iter()
                .find(|o| o.value == raw || o.text.eq_ignore_ascii_case(raw))
                .map(|o| InputValue::Text(o.value.to_string()))
                .ok_or_else(|| {
                    let values: Vec<&str> = options.iter().map(|o| o.value).collect();
                    format!("'{}' is not one of: {}", raw, values.join(", "))
                }),
            InputKind::Number { .. } => {
                if raw.is_empty() || raw.parse::<f64>().is_ok() {
                    Ok(InputValue::Text(raw.to_string()))
                } else {
                    Err(format!("'{}' is not a number", raw))
                }
            }
            InputKind::Text { .. } | InputKind::File { .. } => {
                Ok(InputValue::Text(raw.to_string()))
            }
        }
    }
}

/// One panel output slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputField {
    /// Result key the slot displays.
    pub key: &'static str,
    pub label: &'static str,
    /// Rendered as a download link rather than plain text.
    pub link: bool,
}

impl OutputField {
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            link: false,
        }
    }

    pub fn link(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            link: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: &[SelectOption] = &[opt("dft", "DFT Calculation"), opt("gw", "GW Approximation")];

    #[test]
    fn select_defaults_to_first_option() {
        let field = InputField::select("method", "Method", OPTIONS);
        assert_eq!(field.default_value(), InputValue::Text("dft".into()));
    }

    #[test]
    fn checkbox_defaults_to_declared_state() {
        let field = InputField::checkbox("spin", "Spin", true);
        assert_eq!(field.default_value(), InputValue::Flag(true));
    }

    #[test]
    fn select_accepts_value_or_display_text() {
        let field = InputField::select("method", "Method", OPTIONS);
        assert_eq!(field.parse_value("gw").unwrap(), InputValue::Text("gw".into()));
        assert_eq!(
            field.parse_value("gw approximation").unwrap(),
            InputValue::Text("gw".into())
        );
        assert!(field.parse_value("hybrid").is_err());
    }

    #[test]
    fn number_rejects_non_numeric_text() {
        let field = InputField::number("k", "K-Points", "1", "20", "1");
        assert!(field.parse_value("12").is_ok());
        assert!(field.parse_value("").is_ok());
        assert!(field.parse_value("twelve").is_err());
    }

    #[test]
    fn checkbox_parses_on_off() {
        let field = InputField::checkbox("spin", "Spin", false);
        assert_eq!(field.parse_value("on").unwrap(), InputValue::Flag(true));
        assert_eq!(field.parse_value("OFF").unwrap(), InputValue::Flag(false));
        assert!(field.parse_value("maybe").is_err());
    }
}
