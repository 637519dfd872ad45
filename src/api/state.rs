use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use emos_core::catalog;
use emos_core::models::{Selection, UnitKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToggleError {
    #[error("Generator '{0}' not found")]
    UnknownGenerator(String),

    #[error("Generator '{0}' has no available implementation")]
    Unavailable(String),
}

/// Shared state of the backend service: which generators are switched on.
#[derive(Debug, Clone, Default)]
pub struct BackendState {
    generators: Arc<RwLock<BTreeMap<String, bool>>>,
}

impl BackendState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the new state of a generator.
    pub fn set_generator(&self, class_name: &str, active: bool) -> Result<(), ToggleError> {
        let unit = catalog::unit(UnitKind::Generator, class_name)
            .ok_or_else(|| ToggleError::UnknownGenerator(class_name.to_string()))?;
        if !unit.available {
            return Err(ToggleError::Unavailable(unit.label.to_string()));
        }

        self.generators
            .write()
            .expect("generator state lock poisoned")
            .insert(unit.key.to_string(), active);
        Ok(())
    }

    /// Generators switched on through `toggle_generator`, as run selections.
    pub fn active_generators(&self) -> Vec<Selection> {
        self.generators
            .read()
            .expect("generator state lock poisoned")
            .iter()
            .filter(|(_, active)| **active)
            .filter_map(|(key, _)| catalog::unit(UnitKind::Generator, key))
            .map(|unit| unit.selection())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_available_generator() {
        let state = BackendState::new();
        state.set_generator("mattergen", true).unwrap();
        assert_eq!(
            state.active_generators(),
            vec![Selection::new("mattergen", "MatterGen")]
        );

        state.set_generator("mattergen", false).unwrap();
        assert!(state.active_generators().is_empty());
    }

    #[test]
    fn rejects_unknown_and_unavailable() {
        let state = BackendState::new();
        assert_eq!(
            state.set_generator("nope", true),
            Err(ToggleError::UnknownGenerator("nope".into()))
        );
        assert_eq!(
            state.set_generator("gnome", true),
            Err(ToggleError::Unavailable("GNoME".into()))
        );
    }
}
