use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Named result strings, keyed like the panel's output fields.
pub type ResultFields = BTreeMap<String, String>;

/// Outcome of one processing run as held by the open panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingResult {
    Fields(ResultFields),
    Error(String),
}

impl ProcessingResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        match self {
            Self::Fields(fields) => fields.get(key).map(String::as_str),
            Self::Error(_) => None,
        }
    }
}

/// Severity of a backend log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the processing log shown under a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub message: String,
    #[serde(default = "default_level")]
    pub level: LogLevel,
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

impl LogLine {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }
}

/// Body of a successful `POST /api/process/{id}`.
///
/// The backend answers either the results mapping directly, or the results
/// together with the log lines produced while computing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessResponse {
    Detailed {
        results: ResultFields,
        #[serde(default)]
        logs: Vec<LogLine>,
    },
    Flat(ResultFields),
}

impl ProcessResponse {
    pub fn into_parts(self) -> (ResultFields, Vec<LogLine>) {
        match self {
            Self::Detailed { results, logs } => (results, logs),
            Self::Flat(results) => (results, Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_response_has_no_logs() {
        let response: ProcessResponse =
            serde_json::from_str(r#"{"materialsCount": "42 materials found"}"#).unwrap();
        let (results, logs) = response.into_parts();
        assert_eq!(results["materialsCount"], "42 materials found");
        assert!(logs.is_empty());
    }

    #[test]
    fn detailed_response_keeps_log_order() {
        let json = r#"{
            "results": {"feasibility": "78% (High)"},
            "logs": [
                {"message": "first", "level": "info"},
                {"message": "second", "level": "warning"}
            ]
        }"#;
        let (results, logs) = serde_json::from_str::<ProcessResponse>(json)
            .unwrap()
            .into_parts();
        assert_eq!(results["feasibility"], "78% (High)");
        assert_eq!(
            logs,
            vec![LogLine::info("first"), LogLine::warning("second")]
        );
    }

    #[test]
    fn processing_result_serializes_with_a_tag() {
        let json = serde_json::to_value(ProcessingResult::Error("boom".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "boom" }));
    }
}
