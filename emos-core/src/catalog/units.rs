use crate::models::{InformationUnit, UnitKind};

const fn unit_of(
    kind: UnitKind,
    key: &'static str,
    label: &'static str,
    description: &'static str,
    available: bool,
) -> InformationUnit {
    InformationUnit {
        kind,
        key,
        label,
        description,
        available,
    }
}

use UnitKind::{Database as Db, Generator as Gen, Predictor as Pred};

static UNITS: &[InformationUnit] = &[
    unit_of(Db, "icsd", "ICSD", "Inorganic Crystal Structure Database, the world's largest database for inorganic crystal structures", true),
    unit_of(Db, "cod", "COD", "Crystallography Open Database", true),
    unit_of(Db, "materials_project", "Materials Project", "A comprehensive collection of computed materials properties", false),
    unit_of(Db, "aflowlib", "AFLOWLIB", "Automatic-FLOW database for high-throughput materials discovery", false),
    unit_of(Db, "oqmd", "OQMD", "Open Quantum Materials Database of DFT calculated structures and properties", false),
    unit_of(Db, "nomad", "NOMAD", "Novel Materials Discovery repository for computational materials science data", false),
    unit_of(Db, "jarvis", "JARVIS", "Joint Automated Repository for Various Integrated Simulations", false),
    unit_of(Db, "alexandria", "Alexandria", "A comprehensive database for materials discovery and design", false),
    unit_of(Gen, "mattergen", "MatterGen", "Diffusion model generating stable inorganic crystals", true),
    unit_of(Gen, "gnome", "GNoME", "Graph network for materials exploration", false),
    unit_of(Gen, "imatgen", "iMatGen", "Image-based inverse materials generator", false),
    unit_of(Gen, "matgan", "MatGAN", "Generative adversarial network for compositions", false),
    unit_of(Gen, "molgan", "MolGAN", "Generative adversarial network for molecular graphs", false),
    unit_of(Gen, "dfc-vae", "Cond-DFC-VAE", "Conditional variational autoencoder for crystal generation", false),
    unit_of(Gen, "mygen1", "MyGen1", "Custom generator #1", false),
    unit_of(Gen, "mygen2", "MyGen2", "Custom generator #2", false),
    unit_of(Pred, "mattersim", "MatterSim", "The MLIP for inorganic crystals, created by Microsoft", true),
    unit_of(Pred, "m3gnet", "M3GNet", "Materials 3-body Graph Network for universal property prediction", true),
    unit_of(Pred, "pfp", "PFP", "Physics-informed neural network for materials property prediction", true),
    unit_of(Pred, "deepmd", "DeepMD", "Deep Potential Molecular Dynamics for accurate force field prediction", true),
    unit_of(Pred, "synthnn", "SynthNN", "Synthesis Neural Network for predicting materials synthesis conditions", true),
    unit_of(Pred, "esen", "eSEN", "Enhanced Structure-Energy Network for advanced materials property prediction", true),
    unit_of(Pred, "mypred1", "MyPred1", "Custom predictor #1 for specialized materials property prediction tasks", true),
    unit_of(Pred, "mypred2", "MyPred2", "Custom predictor #2 for specialized materials property prediction tasks", true),
];

/// Every information unit, grouped by kind.
pub fn units() -> &'static [InformationUnit] {
    UNITS
}

pub fn units_of(kind: UnitKind) -> impl Iterator<Item = &'static InformationUnit> {
    UNITS.iter().filter(move |u| u.kind == kind)
}

pub fn unit(kind: UnitKind, key: &str) -> Option<&'static InformationUnit> {
    units_of(kind).find(|u| u.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_units_per_kind() {
        for kind in UnitKind::ALL {
            assert_eq!(units_of(kind).count(), 8, "{}", kind.as_str());
        }
    }

    #[test]
    fn only_mattergen_generates() {
        let available: Vec<_> = units_of(UnitKind::Generator)
            .filter(|u| u.available)
            .map(|u| u.key)
            .collect();
        assert_eq!(available, vec!["mattergen"]);
    }

    #[test]
    fn lookup_is_scoped_by_kind() {
        assert!(unit(UnitKind::Database, "icsd").is_some());
        assert!(unit(UnitKind::Generator, "icsd").is_none());
    }
}
