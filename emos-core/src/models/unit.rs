use serde::{Deserialize, Serialize};

use super::Selection;

/// Kind of information unit a user can select alongside a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Database,
    Generator,
    Predictor,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [Self::Database, Self::Generator, Self::Predictor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Generator => "generator",
            Self::Predictor => "predictor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "database" | "databases" | "db" => Some(Self::Database),
            "generator" | "generators" | "gen" => Some(Self::Generator),
            "predictor" | "predictors" | "pred" => Some(Self::Predictor),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Database => "Databases",
            Self::Generator => "Generators",
            Self::Predictor => "Predictors",
        }
    }

    /// Input key the active units of this kind are sent under.
    pub fn input_key(&self) -> &'static str {
        match self {
            Self::Database => "active_databases",
            Self::Generator => "active_generators",
            Self::Predictor => "active_predictors",
        }
    }
}

/// A database, generator or predictor from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InformationUnit {
    pub kind: UnitKind,
    /// Class name the backend knows the unit by.
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Whether the backend ships an implementation it can activate.
    pub available: bool,
}

impl InformationUnit {
    pub fn selection(&self) -> Selection {
        Selection::new(self.key, self.label)
    }
}
