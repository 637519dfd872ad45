use std::collections::{BTreeMap, BTreeSet};

use emos_core::catalog;
use emos_core::models::{InformationUnit, InputValue, PanelInputs, Selection, UnitKind};

use crate::config::ShellConfig;

/// Which information units are checked in the welcome view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitSelection {
    active: BTreeMap<UnitKind, BTreeSet<&'static str>>,
}

impl UnitSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection from the configured startup lists. Unknown keys are skipped.
    pub fn from_config(config: &ShellConfig) -> Self {
        let mut selection = Self::new();
        let groups = [
            (UnitKind::Database, &config.active_databases),
            (UnitKind::Generator, &config.active_generators),
            (UnitKind::Predictor, &config.active_predictors),
        ];
        for (kind, keys) in groups {
            for key in keys {
                match catalog::unit(kind, key) {
                    Some(unit) => selection.set(unit, true),
                    None => tracing::warn!("Ignoring unknown {} '{}' in config", kind.as_str(), key),
                }
            }
        }
        selection
    }

    pub fn is_active(&self, kind: UnitKind, key: &str) -> bool {
        self.active
            .get(&kind)
            .is_some_and(|keys| keys.contains(key))
    }

    pub fn set(&mut self, unit: &'static InformationUnit, active: bool) {
        let keys = self.active.entry(unit.kind).or_default();
        if active {
            keys.insert(unit.key);
        } else {
            keys.remove(unit.key);
        }
    }

    /// Active units of a kind, in catalog order.
    pub fn active(&self, kind: UnitKind) -> Vec<&'static InformationUnit> {
        catalog::units_of(kind)
            .filter(|u| self.is_active(kind, u.key))
            .collect()
    }

    pub fn selections(&self, kind: UnitKind) -> Vec<Selection> {
        self.active(kind).iter().map(|u| u.selection()).collect()
    }

    /// The non-empty groups, keyed the way the backend expects them.
    pub fn auxiliary_inputs(&self) -> PanelInputs {
        UnitKind::ALL
            .into_iter()
            .map(|kind| (kind, self.selections(kind)))
            .filter(|(_, selections)| !selections.is_empty())
            .map(|(kind, selections)| {
                (kind.input_key().to_string(), InputValue::Selections(selections))
            })
            .collect()
    }
}
