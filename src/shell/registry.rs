use std::collections::BTreeMap;

use emos_core::catalog::{self, CatalogEntry};
use emos_core::models::{FeatureDescriptor, FeatureId, FeatureModuleRef};

/// Id → implementation dispatch table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    entries: BTreeMap<FeatureId, &'static CatalogEntry>,
}

impl FeatureRegistry {
    /// Registry holding every catalogued feature.
    pub fn builtin() -> Self {
        catalog::ENTRIES.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: FeatureId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn entry(&self, id: FeatureId) -> Option<&'static CatalogEntry> {
        self.entries.get(&id).copied()
    }

    pub fn module_ref(&self, id: FeatureId) -> Option<FeatureModuleRef> {
        self.entry(id).map(CatalogEntry::module_ref)
    }

    /// Registered descriptor, or the placeholder for unknown ids.
    pub fn descriptor(&self, id: FeatureId) -> FeatureDescriptor {
        self.entry(id)
            .map(CatalogEntry::descriptor)
            .unwrap_or_else(|| FeatureDescriptor::placeholder(id))
    }

    pub fn entries(&self) -> impl Iterator<Item = &'static CatalogEntry> + '_ {
        self.entries.values().copied()
    }
}

impl FromIterator<&'static CatalogEntry> for FeatureRegistry {
    fn from_iter<I: IntoIterator<Item = &'static CatalogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.id, e)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_the_catalog() {
        let registry = FeatureRegistry::builtin();
        assert_eq!(registry.len(), 16);
        assert!(FeatureId::all().all(|id| registry.contains(id)));
    }

    #[test]
    fn unknown_id_gets_placeholder_descriptor() {
        let registry = FeatureRegistry::builtin();
        assert_eq!(registry.descriptor(FeatureId(42)).name, "Feature 42");
        assert!(registry.module_ref(FeatureId(42)).is_none());
    }

    #[test]
    fn partial_registry() {
        let registry: FeatureRegistry = catalog::ENTRIES.iter().take(2).collect();
        assert!(registry.contains(FeatureId(2)));
        assert!(!registry.contains(FeatureId(3)));
    }
}
