//! Materials Exploration panels (ids 1-8).

use rand::{Rng, RngCore};

use super::{fields, fixed, group_thousands, FeatureDefinition};
use crate::models::*;
use crate::ProcessingError;

const PROPERTY_TYPES: &[SelectOption] = &[
    opt("", "Select Property"),
    opt("mechanical", "Mechanical"),
    opt("thermal", "Thermal"),
    opt("electrical", "Electrical"),
    opt("optical", "Optical"),
];

pub(super) fn material_search(descriptor: FeatureDescriptor) -> FeatureDefinition {
    FeatureDefinition::new(
        descriptor,
        "Search for materials by name, formula, or properties",
        vec![
            InputField::text("materialName", "Material Name/Formula", "e.g., Al2O3, Silicon, etc."),
            InputField::select("propertyType", "Property Type", PROPERTY_TYPES),
            InputField::number("minValue", "Minimum Value", "0", "10000", "0.1"),
            InputField::number("maxValue", "Maximum Value", "0", "10000", "0.1"),
            InputField::checkbox("includeComposites", "Include Composite Materials", true),
        ],
        "Search results and material information",
        vec![
            OutputField::new("materialsCount", "Materials Found"),
            OutputField::new("topMatch", "Top Match"),
            OutputField::new("propertyRange", "Property Range"),
            OutputField::link("downloadLink", "Download Results"),
        ],
        search_materials,
    )
}

fn search_materials(
    inputs: &PanelInputs,
    rng: &mut dyn RngCore,
) -> Result<ResultFields, ProcessingError> {
    let min = inputs.number("minValue", "Minimum Value")?;
    let max = inputs.number("maxValue", "Maximum Value")?;
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ProcessingError::Computation(format!(
                "Minimum Value ({}) exceeds Maximum Value ({})",
                min, max
            )));
        }
    }

    let count: u32 = rng.gen_range(10..60);
    Ok(fields([
        ("materialsCount", format!("{} materials found", count)),
        (
            "topMatch",
            inputs.text_or("materialName", "Silicon Carbide (SiC)").to_string(),
        ),
        (
            "propertyRange",
            format!("{} - {} GPa", min.unwrap_or(2.5), max.unwrap_or(45.2)),
        ),
        ("downloadLink", "search_results.csv (Ready)".to_string()),
    ]))
}

pub(super) fn material_generation(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const TARGETS: &[SelectOption] = &[
        opt("high_strength", "High Strength"),
        opt("thermal_conductivity", "Thermal Conductivity"),
        opt("electrical_insulator", "Electrical Insulator"),
        opt("semiconductor", "Semiconductor"),
        opt("superconductor", "Superconductor"),
    ];
    const BASES: &[SelectOption] = &[
        opt("metals", "Metals"),
        opt("ceramics", "Ceramics"),
        opt("polymers", "Polymers"),
        opt("composites", "Composites"),
    ];

    FeatureDefinition::new(
        descriptor,
        "Define target properties for new material generation",
        vec![
            InputField::select("targetProperty", "Target Property", TARGETS),
            InputField::select("baseElements", "Base Elements", BASES),
            InputField::number("numCompositions", "Number of Compositions", "1", "100", "1")
                .required(),
            InputField::number("targetValue", "Target Value", "0", "1000", "0.1"),
            InputField::checkbox("includeRareElements", "Include Rare Earth Elements", false),
            InputField::checkbox("optimizeForCost", "Optimize for Cost", true),
        ],
        "Generated material compositions",
        vec![
            OutputField::new("generatedCount", "Generated Compositions"),
            OutputField::new("bestCandidate", "Best Candidate"),
            OutputField::new("predictedPerformance", "Predicted Performance"),
            OutputField::new("synthesisDifficulty", "Synthesis Difficulty"),
            OutputField::link("exportData", "Export Data"),
        ],
        |inputs, _| {
            inputs.number("numCompositions", "Number of Compositions")?;
            inputs.number("targetValue", "Target Value")?;
            Ok(fixed([
                ("generatedCount", "15 compositions generated"),
                ("bestCandidate", "Ti3Al2C (MAX Phase)"),
                ("predictedPerformance", "8.5 GPa (92% of target)"),
                ("synthesisDifficulty", "Medium"),
                ("exportData", "compositions.json (Ready)"),
            ]))
        },
    )
}

pub(super) fn database_extractor(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const SOURCES: &[SelectOption] = &[
        opt("all", "All Databases"),
        opt("materials_project", "Materials Project"),
        opt("oqmd", "OQMD"),
        opt("aflow", "AFLOW"),
        opt("crystallography", "Crystallography Open Database"),
    ];
    const EXTRACTIONS: &[SelectOption] = &[
        opt("properties", "Material Properties"),
        opt("structures", "Crystal Structures"),
        opt("thermodynamics", "Thermodynamic Data"),
        opt("experimental", "Experimental Data"),
    ];

    FeatureDefinition::new(
        descriptor,
        "Configure data extraction parameters",
        vec![
            InputField::select("databaseSource", "Database Source", SOURCES),
            InputField::select("extractionType", "Extraction Type", EXTRACTIONS),
            InputField::text("filterCriteria", "Filter Criteria", "e.g., density > 5, bandgap < 2"),
            InputField::number("maxEntries", "Maximum Entries", "1", "10000", "1"),
            InputField::file("configFile", "Configuration File (optional)", ".json,.yaml"),
            InputField::checkbox("includeMetadata", "Include Metadata", true),
        ],
        "Extracted data summary",
        vec![
            OutputField::new("recordsExtracted", "Records Extracted"),
            OutputField::new("dataSize", "Data Size"),
            OutputField::new("fileFormat", "File Format"),
            OutputField::new("processingTime", "Processing Time"),
            OutputField::link("downloadPackage", "Download Package"),
        ],
        extract_records,
    )
}

fn extract_records(
    inputs: &PanelInputs,
    rng: &mut dyn RngCore,
) -> Result<ResultFields, ProcessingError> {
    let limit = match inputs.number("maxEntries", "Maximum Entries")? {
        Some(n) if n >= 1.0 => n as u64,
        _ => 1000,
    };
    let extracted = limit.min(rng.gen_range(500..5500));
    let format = if inputs.flag_or("includeMetadata", true) {
        "JSON with metadata"
    } else {
        "CSV format"
    };

    Ok(fields([
        ("recordsExtracted", format!("{} records", group_thousands(extracted))),
        ("dataSize", format!("{:.2} MB", extracted as f64 * 0.15)),
        ("fileFormat", format.to_string()),
        ("processingTime", format!("{:.1} seconds", extracted as f64 / 100.0)),
        ("downloadPackage", "extracted_data.zip (Ready)".to_string()),
    ]))
}

pub(super) fn material_characterization(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const ANALYSES: &[SelectOption] = &[
        opt("basic", "Basic Analysis"),
        opt("advanced", "Advanced Analysis"),
        opt("comprehensive", "Comprehensive Analysis"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::text("parameter1", "Material Formula", "e.g., Al2O3, SiC"),
            InputField::select("analysisType", "Analysis Type", ANALYSES),
            InputField::number("threshold", "Threshold Value", "0", "100", "0.1"),
            InputField::checkbox("exportResults", "Export Results", true),
        ],
        vec![
            OutputField::new("analysisStatus", "Analysis Status"),
            OutputField::new("materialProperties", "Material Properties"),
            OutputField::new("reportGeneration", "Report"),
        ],
        |inputs, _| {
            inputs.number("threshold", "Threshold Value")?;
            Ok(fixed([
                ("analysisStatus", "Analysis completed - 95.2% accuracy"),
                ("materialProperties", "Material properties calculated"),
                ("reportGeneration", "Report generated successfully"),
            ]))
        },
    )
}

pub(super) fn dft_calculation(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const TARGETS: &[SelectOption] = &[
        opt("performance", "Performance"),
        opt("cost", "Cost Reduction"),
        opt("efficiency", "Efficiency"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::select("optimizationTarget", "Optimization Target", TARGETS),
            InputField::number("iterations", "Max Iterations", "10", "1000", "10"),
            InputField::file("configFile", "Configuration File", ".json,.xml"),
            InputField::checkbox("verboseOutput", "Verbose Output", false),
        ],
        vec![
            OutputField::new("convergenceStatus", "Convergence"),
            OutputField::new("performanceImprovement", "Performance"),
            OutputField::new("configurationStatus", "Configuration"),
        ],
        |inputs, _| {
            inputs.number("iterations", "Max Iterations")?;
            Ok(fixed([
                ("convergenceStatus", "Optimization converged in 45 iterations"),
                ("performanceImprovement", "Performance improved by 23%"),
                ("configurationStatus", "Configuration saved"),
            ]))
        },
    )
}

pub(super) fn crystallographic_analysis(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const MODELS: &[SelectOption] = &[
        opt("linear", "Linear Model"),
        opt("nonlinear", "Non-linear Model"),
        opt("ml", "Machine Learning"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::text("inputData", "Input Data", "Enter data or formula"),
            InputField::select("modelType", "Model Type", MODELS),
            InputField::number("accuracy", "Required Accuracy (%)", "50", "99", "1"),
            InputField::checkbox("realTimeUpdate", "Real-time Updates", true),
        ],
        vec![
            OutputField::new("simulationStatus", "Simulation"),
            OutputField::new("modelValidation", "Model Validation"),
            OutputField::new("predictions", "Predictions"),
        ],
        |inputs, _| {
            inputs.number("accuracy", "Required Accuracy (%)")?;
            Ok(fixed([
                ("simulationStatus", "Simulation completed successfully"),
                ("modelValidation", "Model validation: 92% accuracy"),
                ("predictions", "Predictions generated"),
            ]))
        },
    )
}

pub(super) fn quantum_mechanics(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const METHODS: &[SelectOption] = &[
        opt("quantum", "Quantum Mechanics"),
        opt("classical", "Classical Mechanics"),
        opt("hybrid", "Hybrid Approach"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::select("computationMethod", "Computation Method", METHODS),
            InputField::number("precision", "Precision Level", "1", "10", "1"),
            InputField::text("boundary", "Boundary Conditions", "Specify conditions"),
            InputField::checkbox("parallelProcessing", "Parallel Processing", true),
        ],
        vec![
            OutputField::new("computationStatus", "Computation"),
            OutputField::new("discoveryPotential", "Discovery Potential"),
            OutputField::new("databaseExport", "Database Export"),
        ],
        |inputs, _| {
            inputs.number("precision", "Precision Level")?;
            Ok(fixed([
                ("computationStatus", "Computational analysis finished"),
                ("discoveryPotential", "Discovery potential: High"),
                ("databaseExport", "Results exported to database"),
            ]))
        },
    )
}

pub(super) fn tensor_analysis(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const TYPES: &[SelectOption] = &[
        opt("structural", "Structural Analysis"),
        opt("compositional", "Compositional Analysis"),
        opt("property", "Property Analysis"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::text("sampleId", "Sample ID", "Enter sample identifier"),
            InputField::select("characterizationType", "Characterization Type", TYPES),
            InputField::number("resolution", "Resolution (nm)", "0.1", "1000", "0.1"),
            InputField::file("sampleData", "Sample Data File", ".dat,.csv"),
        ],
        vec![
            OutputField::new("analysisComplete", "Analysis"),
            OutputField::new("correlationValue", "Correlation"),
            OutputField::new("visualizationData", "Visualization"),
        ],
        |inputs, _| {
            inputs.number("resolution", "Resolution (nm)")?;
            Ok(fixed([
                ("analysisComplete", "Comprehensive analysis complete"),
                ("correlationValue", "Structure-property correlation: 0.87"),
                ("visualizationData", "Visualization data ready"),
            ]))
        },
    )
}
