//! Static catalog of the sixteen feature panels and the information units.
//!
//! Every feature is a value: its input specs, its output specs and its local
//! mock computation. [`ENTRIES`] is the id → factory dispatch table the shell
//! builds its registry from.

mod electronics;
mod materials;
mod units;

use std::fmt;

use rand::RngCore;

use crate::models::*;
use crate::ProcessingError;

pub use units::{unit, units, units_of};

/// Local mock computation of a feature.
pub type MockCompute = fn(&PanelInputs, &mut dyn RngCore) -> Result<ResultFields, ProcessingError>;

/// Builds a fresh definition for the given descriptor.
pub type FeatureFactory = fn(FeatureDescriptor) -> FeatureDefinition;

/// Everything needed to render and locally compute one feature panel.
#[derive(Clone)]
pub struct FeatureDefinition {
    pub descriptor: FeatureDescriptor,
    /// Line shown above the input controls.
    pub inputs_intro: String,
    pub inputs: Vec<InputField>,
    /// Line shown above the output slots.
    pub outputs_intro: String,
    pub outputs: Vec<OutputField>,
    compute: MockCompute,
}

impl fmt::Debug for FeatureDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureDefinition")
            .field("descriptor", &self.descriptor)
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .finish_non_exhaustive()
    }
}

impl FeatureDefinition {
    pub fn new(
        descriptor: FeatureDescriptor,
        inputs_intro: impl Into<String>,
        inputs: Vec<InputField>,
        outputs_intro: impl Into<String>,
        outputs: Vec<OutputField>,
        compute: MockCompute,
    ) -> Self {
        Self {
            descriptor,
            inputs_intro: inputs_intro.into(),
            inputs,
            outputs_intro: outputs_intro.into(),
            outputs,
            compute,
        }
    }

    /// Definition with the stock "Configure parameters for ..." / "Results
    /// for ..." intro lines.
    fn standard(
        descriptor: FeatureDescriptor,
        inputs: Vec<InputField>,
        outputs: Vec<OutputField>,
        compute: MockCompute,
    ) -> Self {
        let inputs_intro = format!("Configure parameters for {}", descriptor.name);
        let outputs_intro = format!("Results for {}", descriptor.name);
        Self::new(descriptor, inputs_intro, inputs, outputs_intro, outputs, compute)
    }

    pub fn id(&self) -> FeatureId {
        self.descriptor.id
    }

    pub fn default_inputs(&self) -> PanelInputs {
        PanelInputs::defaults_for(&self.inputs)
    }

    /// Run the local mock. Required fields are checked first.
    pub fn compute(
        &self,
        inputs: &PanelInputs,
        rng: &mut dyn RngCore,
    ) -> Result<ResultFields, ProcessingError> {
        inputs.require(&self.inputs)?;
        (self.compute)(inputs, rng)
    }
}

/// The data-only panel used for ids the registry cannot back with a module.
///
/// Three free-text parameters, three result slots and the stock local
/// results. It never talks to the backend.
pub fn generic_definition(descriptor: FeatureDescriptor) -> FeatureDefinition {
    let inputs_intro = format!("Configure your input parameters for {}", descriptor.name);
    let outputs_intro = format!("Results for {}", descriptor.name);
    FeatureDefinition::new(
        descriptor,
        inputs_intro,
        vec![
            InputField::text("param1", "Parameter 1", "Enter value"),
            InputField::text("param2", "Parameter 2", "Enter value"),
            InputField::text("param3", "Parameter 3", "Enter value"),
        ],
        outputs_intro,
        vec![
            OutputField::new("result1", "Result 1"),
            OutputField::new("result2", "Result 2"),
            OutputField::new("result3", "Result 3"),
        ],
        generic_results,
    )
}

/// Result keys of the generic panel in reveal order.
pub const GENERIC_RESULT_KEYS: [&str; 3] = ["result1", "result2", "result3"];

fn generic_results(_: &PanelInputs, _: &mut dyn RngCore) -> Result<ResultFields, ProcessingError> {
    Ok(fields([
        ("result1", "Analysis complete - 98.5% accuracy".to_string()),
        ("result2", "Processing finished successfully".to_string()),
        ("result3", "Results generated and saved".to_string()),
    ]))
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub id: FeatureId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: FeatureCategory,
    /// Name the implementation is published under.
    pub implementation_key: &'static str,
    /// Folder under the category directory.
    pub folder: &'static str,
    pub build: FeatureFactory,
}

impl CatalogEntry {
    pub fn descriptor(&self) -> FeatureDescriptor {
        FeatureDescriptor::new(self.id, self.name, self.description)
    }

    pub fn module_ref(&self) -> FeatureModuleRef {
        FeatureModuleRef {
            id: self.id,
            implementation_key: self.implementation_key.to_string(),
            source_location: format!("/Features/{}/{}", self.category.directory(), self.folder),
        }
    }

    pub fn definition(&self) -> FeatureDefinition {
        (self.build)(self.descriptor())
    }
}

const fn entry(
    id: u32,
    name: &'static str,
    description: &'static str,
    category: FeatureCategory,
    implementation_key: &'static str,
    folder: &'static str,
    build: FeatureFactory,
) -> CatalogEntry {
    CatalogEntry {
        id: FeatureId(id),
        name,
        description,
        category,
        implementation_key,
        folder,
        build,
    }
}

use FeatureCategory::{ElectronicsApplication as Electronics, MaterialsExploration as Materials};

pub const ENTRIES: &[CatalogEntry] = &[
    entry(1, "Material Search", "Search and explore materials from comprehensive databases using various criteria", Materials, "MaterialSearchFeature", "Material_Search", materials::material_search),
    entry(2, "Material Generation", "Generate new material compositions using AI-powered algorithms and predictive models", Materials, "MaterialGenerationFeature", "Material_Generation", materials::material_generation),
    entry(3, "Database Extractor", "Extract and analyze specific material properties and data from integrated databases", Materials, "DatabaseExtractorFeature", "Database_Extractor", materials::database_extractor),
    entry(4, "Material Characterization", "Advanced materials analysis and characterization tools for comprehensive evaluation", Materials, "MaterialCharacterizationFeature", "Material_Characterization", materials::material_characterization),
    entry(5, "DFT Calculation", "Materials optimization workflows for enhanced performance characteristics", Materials, "DFTCalculationFeature", "DFT_Calculation", materials::dft_calculation),
    entry(6, "Crystallographic Analysis", "Simulation and modeling tools for predicting material behavior under various conditions", Materials, "CrystallographicAnalysisFeature", "Crystallographic_Analysis", materials::crystallographic_analysis),
    entry(7, "Quantum Mechanics", "Advanced computational methods for materials discovery and design", Materials, "QuantumMechanicsFeature", "Quantum_Mechanics", materials::quantum_mechanics),
    entry(8, "Tensor Analysis", "Comprehensive analysis tools for understanding material structure-property relationships", Materials, "TensorAnalysisFeature", "Tensor_Analysis", materials::tensor_analysis),
    entry(9, "Device Synthesizability", "Evaluate the feasibility and methods for synthesizing electronic devices from selected materials", Electronics, "DeviceSynthesizabilityFeature", "Device_Synthesizability", electronics::device_synthesizability),
    entry(10, "Interface Calculation", "Calculate and analyze interfaces between different materials in electronic applications", Electronics, "InterfaceCalculationFeature", "Interface_Calculation", electronics::interface_calculation),
    entry(11, "Property Prediction", "Electronic property prediction and optimization for semiconductor applications", Electronics, "PropertyPredictionFeature", "Property_Prediction", electronics::property_prediction),
    entry(12, "Band Structure", "Band structure calculations and electronic transport property analysis", Electronics, "BandStructureFeature", "Band_Structure", electronics::band_structure),
    entry(13, "Thermal Management", "Thermal management analysis for electronic device performance optimization", Electronics, "ThermalManagementFeature", "Thermal_Management", electronics::thermal_management),
    entry(14, "Reliability Assessment", "Reliability assessment and failure analysis for electronic materials", Electronics, "ReliabilityAssessmentFeature", "Reliability_Assessment", electronics::reliability_assessment),
    entry(15, "Process Integration", "Process integration workflows for electronic device manufacturing", Electronics, "ProcessIntegrationFeature", "Process_Integration", electronics::process_integration),
    entry(16, "Advanced Characterization", "Advanced characterization techniques for electronic materials evaluation", Electronics, "AdvancedCharacterizationFeature", "Advanced_Characterization", electronics::advanced_characterization),
];

/// Catalog row for an id.
pub fn lookup(id: FeatureId) -> Option<&'static CatalogEntry> {
    ENTRIES.iter().find(|e| e.id == id)
}

/// Catalog row by published implementation name.
pub fn lookup_implementation(key: &str) -> Option<&'static CatalogEntry> {
    ENTRIES.iter().find(|e| e.implementation_key == key)
}

pub fn descriptors() -> Vec<FeatureDescriptor> {
    ENTRIES.iter().map(CatalogEntry::descriptor).collect()
}

fn fields<const N: usize>(pairs: [(&str, String); N]) -> ResultFields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Fixed-string results, for features whose mock has no inputs to react to.
fn fixed<const N: usize>(pairs: [(&str, &str); N]) -> ResultFields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// `12345` → `"12,345"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
