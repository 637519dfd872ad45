use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric identity of a feature panel.
///
/// The catalog only knows ids `1..=16`, but any id is a valid value: ids the
/// registry does not know resolve to the generic panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u32);

impl FeatureId {
    pub const FIRST: FeatureId = FeatureId(1);
    pub const LAST: FeatureId = FeatureId(16);

    pub fn get(self) -> u32 {
        self.0
    }

    /// Whether the id falls inside the catalog's id space.
    pub fn is_catalogued(self) -> bool {
        (Self::FIRST.0..=Self::LAST.0).contains(&self.0)
    }

    /// Every id in the catalog's id space, in order.
    pub fn all() -> impl Iterator<Item = FeatureId> {
        (Self::FIRST.0..=Self::LAST.0).map(FeatureId)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FeatureId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FeatureId)
    }
}

impl From<u32> for FeatureId {
    fn from(id: u32) -> Self {
        FeatureId(id)
    }
}

/// The two groups the catalog is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    MaterialsExploration,
    ElectronicsApplication,
}

impl FeatureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaterialsExploration => "materials_exploration",
            Self::ElectronicsApplication => "electronics_application",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::MaterialsExploration => "Materials Exploration",
            Self::ElectronicsApplication => "Electronics Application",
        }
    }

    /// Directory the category's modules are published under.
    pub fn directory(&self) -> &'static str {
        match self {
            Self::MaterialsExploration => "Materials_Exploration",
            Self::ElectronicsApplication => "Electronics_Application",
        }
    }
}

/// Identity of one feature panel. Immutable once defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    pub id: FeatureId,
    pub name: String,
    pub description: String,
}

impl FeatureDescriptor {
    pub fn new(id: FeatureId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Descriptor for an id nobody described, as shown by the generic panel.
    pub fn placeholder(id: FeatureId) -> Self {
        Self::new(id, format!("Feature {}", id), "")
    }
}

/// Maps a feature id to a loadable implementation and where it is loaded from.
///
/// One-to-one with [`FeatureDescriptor`] by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureModuleRef {
    pub id: FeatureId,
    pub implementation_key: String,
    pub source_location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogued_range_is_inclusive() {
        assert!(FeatureId(1).is_catalogued());
        assert!(FeatureId(16).is_catalogued());
        assert!(!FeatureId(0).is_catalogued());
        assert!(!FeatureId(17).is_catalogued());
        assert_eq!(FeatureId::all().count(), 16);
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        assert_eq!(" 12 ".parse::<FeatureId>().unwrap(), FeatureId(12));
        assert!("twelve".parse::<FeatureId>().is_err());
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&FeatureId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn placeholder_uses_the_id_as_name() {
        let descriptor = FeatureDescriptor::placeholder(FeatureId(99));
        assert_eq!(descriptor.name, "Feature 99");
        assert!(descriptor.description.is_empty());
    }
}
