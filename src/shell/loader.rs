//! Loading feature implementations on first use.
//!
//! A [`ModuleSource`] turns a [`FeatureModuleRef`] into a factory. The
//! [`ModuleLoader`] asks its source at most once per id and reuses the factory
//! for every later resolve.

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;

use emos_core::catalog::{self, FeatureDefinition, FeatureFactory};
use emos_core::models::{FeatureDescriptor, FeatureId, FeatureModuleRef};

use super::registry::FeatureRegistry;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModuleLoadError {
    #[error("{key} is not published at {location}")]
    Missing { key: String, location: String },

    #[error("failed to load {location}: {reason}")]
    Source { location: String, reason: String },
}

/// Where feature implementations are fetched from.
pub trait ModuleSource: Send + Sync {
    fn fetch(
        &self,
        module: &FeatureModuleRef,
    ) -> impl Future<Output = Result<FeatureFactory, ModuleLoadError>> + Send;
}

/// Implementations compiled into the binary, found by implementation key.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinModules;

impl ModuleSource for BuiltinModules {
    async fn fetch(&self, module: &FeatureModuleRef) -> Result<FeatureFactory, ModuleLoadError> {
        catalog::lookup_implementation(&module.implementation_key)
            .map(|entry| entry.build)
            .ok_or_else(|| ModuleLoadError::Missing {
                key: module.implementation_key.clone(),
                location: module.source_location.clone(),
            })
    }
}

/// Caches loaded factories by feature id.
#[derive(Debug)]
pub struct ModuleLoader<S> {
    source: S,
    loaded: HashMap<FeatureId, FeatureFactory>,
}

impl<S: ModuleSource> ModuleLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            loaded: HashMap::new(),
        }
    }

    pub fn is_loaded(&self, id: FeatureId) -> bool {
        self.loaded.contains_key(&id)
    }

    /// Resolve a fresh definition for `descriptor.id`.
    ///
    /// `Ok(None)` means the registry has no module for the id. A failed load
    /// is not cached, so the next resolve tries again.
    pub async fn resolve(
        &mut self,
        registry: &FeatureRegistry,
        descriptor: FeatureDescriptor,
    ) -> Result<Option<FeatureDefinition>, ModuleLoadError> {
        let id = descriptor.id;
        let Some(module) = registry.module_ref(id) else {
            return Ok(None);
        };

        let factory = match self.loaded.get(&id) {
            Some(factory) => *factory,
            None => {
                tracing::debug!(feature = %id, location = %module.source_location, "Loading feature module");
                let factory = self.source.fetch(&module).await?;
                self.loaded.insert(id, factory);
                factory
            }
        };
        Ok(Some(factory(descriptor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtin_source_finds_catalogued_keys() {
        let registry = FeatureRegistry::builtin();
        let mut loader = ModuleLoader::new(BuiltinModules);

        let definition = loader
            .resolve(&registry, registry.descriptor(FeatureId(3)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(definition.descriptor.name, "Database Extractor");
        assert!(loader.is_loaded(FeatureId(3)));
    }

    #[tokio::test]
    async fn unregistered_id_is_not_an_error() {
        let registry = FeatureRegistry::builtin();
        let mut loader = ModuleLoader::new(BuiltinModules);

        let resolved = loader
            .resolve(&registry, FeatureDescriptor::placeholder(FeatureId(99)))
            .await
            .unwrap();
        assert!(resolved.is_none());
        assert!(!loader.is_loaded(FeatureId(99)));
    }

    #[tokio::test]
    async fn missing_implementation_is_a_load_error() {
        let module = FeatureModuleRef {
            id: FeatureId(1),
            implementation_key: "NoSuchFeature".into(),
            source_location: "/Features/Nowhere".into(),
        };
        let err = BuiltinModules.fetch(&module).await.unwrap_err();
        assert_eq!(err.to_string(), "NoSuchFeature is not published at /Features/Nowhere");
    }
}
