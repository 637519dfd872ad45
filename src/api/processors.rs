//! Server-side processors behind `POST /api/process/{id}`.
//!
//! Each processor reads the inputs it cares about (falling back to its own
//! defaults) and answers fixed result strings, every one tagged with
//! [`SERVER_TAG`] so a backend answer never reads like the panel's local
//! mock. Material Characterization and Device Synthesizability also report
//! which information units were active.

use emos_core::models::*;

type Processor = fn(&PanelInputs) -> ProcessResponse;

/// Appended to every result string the backend answers.
pub const SERVER_TAG: &str = " - server";

/// Processor registered for a feature id. Band Structure has none.
pub fn processor(id: FeatureId) -> Option<Processor> {
    let processor: Processor = match id.get() {
        1 => material_search,
        2 => material_generation,
        3 => database_extractor,
        4 => material_characterization,
        5 => dft_calculation,
        6 => crystallographic_analysis,
        7 => quantum_mechanics,
        8 => tensor_analysis,
        9 => device_synthesizability,
        10 => interface_calculation,
        11 => property_prediction,
        13 => thermal_management,
        14 => reliability_assessment,
        15 => process_integration,
        16 => advanced_characterization,
        _ => return None,
    };
    Some(processor)
}

fn results<const N: usize>(pairs: [(&str, &str); N]) -> ResultFields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), format!("{}{}", v, SERVER_TAG)))
        .collect()
}

fn flat<const N: usize>(pairs: [(&str, &str); N]) -> ProcessResponse {
    ProcessResponse::Flat(results(pairs))
}

/// Log lines describing the active databases, generators and predictors.
fn unit_logs(inputs: &PanelInputs, task: &str) -> Vec<LogLine> {
    let mut logs = vec![LogLine::info(format!("Initializing {}...", task))];
    for kind in UnitKind::ALL {
        let active = inputs.selections(kind.input_key());
        let noun = kind.title().to_lowercase();
        if active.is_empty() {
            logs.push(LogLine::warning(format!("No active {} found.", noun)));
        } else {
            let names: Vec<&str> = active.iter().map(|s| s.label.as_str()).collect();
            logs.push(LogLine::info(format!(
                "Active {} ({}): {}",
                noun,
                active.len(),
                names.join(", ")
            )));
        }
    }
    logs
}

fn material_search(inputs: &PanelInputs) -> ProcessResponse {
    let top_match = inputs.text_or("materialName", "Silicon Carbide (SiC)");
    flat([
        ("materialsCount", "42 materials found"),
        ("topMatch", top_match),
        ("propertyRange", "2.5 - 45.2 GPa"),
        ("downloadLink", "search_results.csv (Ready)"),
    ])
}

fn material_generation(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("generatedCount", "15 compositions generated"),
        ("bestCandidate", "Ti3Al2C (MAX Phase)"),
        ("predictedPerformance", "8.5 GPa (92% of target)"),
        ("synthesisDifficulty", "Medium"),
        ("exportData", "compositions.json (Ready)"),
    ])
}

fn database_extractor(inputs: &PanelInputs) -> ProcessResponse {
    let format = if inputs.flag_or("includeMetadata", true) {
        "JSON with metadata"
    } else {
        "CSV format"
    };
    flat([
        ("recordsExtracted", "2,847 records"),
        ("dataSize", "425.3 MB"),
        ("fileFormat", format),
        ("processingTime", "28.5 seconds"),
        ("downloadPackage", "extracted_data.zip (Ready)"),
    ])
}

fn material_characterization(inputs: &PanelInputs) -> ProcessResponse {
    let mut logs = unit_logs(inputs, "material characterization");
    logs.push(LogLine::info("Material characterization process"));

    ProcessResponse::Detailed {
        results: results([
            ("analysisStatus", "Analysis completed - 94.8% accuracy"),
            ("materialProperties", "Material properties calculated"),
            ("reportGeneration", "Report generated successfully"),
        ]),
        logs,
    }
}

fn dft_calculation(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("convergenceStatus", "Optimization converged in 67 iterations"),
        ("performanceImprovement", "Performance improved by 18.5%"),
        ("configurationStatus", "Configuration saved"),
    ])
}

fn crystallographic_analysis(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("simulationStatus", "Simulation completed successfully"),
        ("modelValidation", "Model validation: 91.3% accuracy"),
        ("predictions", "Structural predictions generated"),
    ])
}

fn quantum_mechanics(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("computationStatus", "Computational analysis finished"),
        ("discoveryPotential", "Discovery potential: High"),
        ("databaseExport", "Results exported to database"),
    ])
}

fn tensor_analysis(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("analysisComplete", "Comprehensive analysis complete"),
        ("correlationValue", "Structure-property correlation: 0.84"),
        ("visualizationData", "Visualization data ready"),
    ])
}

fn device_synthesizability(inputs: &PanelInputs) -> ProcessResponse {
    let mut logs = unit_logs(inputs, "device synthesizability");
    logs.push(LogLine::info("Device synthesizability process"));

    let method = inputs.text_or("fabricationMethod", "mocvd").to_uppercase();
    let process = format!("{} with 3-step annealing", method);
    ProcessResponse::Detailed {
        results: results([
            ("feasibility", "78% (High)"),
            ("recommendedProcess", process.as_str()),
            ("estimatedCost", "$245/wafer"),
            ("processTemp", "650°C"),
            ("yieldPrediction", "85%"),
        ]),
        logs,
    }
}

fn interface_calculation(inputs: &PanelInputs) -> ProcessResponse {
    let band_offset = if inputs.flag_or("calculateBandOffset", true) {
        "1.85 eV"
    } else {
        "Not calculated"
    };
    flat([
        ("interfaceEnergy", "1.247 J/m²"),
        ("bandOffset", band_offset),
        ("latticeMismatch", "2.3%"),
        ("interfaceStates", "3.24e12 states/cm²"),
        ("chargeTransfer", "0.285 e⁻"),
    ])
}

fn property_prediction(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("predictionStatus", "Electronic properties predicted"),
        ("bandGap", "Band gap: 2.7 eV (direct)"),
        ("carrierMobility", "Mobility: 745 cm²/Vs"),
    ])
}

fn thermal_management(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("optimizationStatus", "Thermal management optimized"),
        ("maxTemperature", "Max temperature: 73.5°C"),
        ("coolingSolution", "Cooling solution recommended"),
    ])
}

fn reliability_assessment(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("assessmentStatus", "Reliability assessment completed"),
        ("mttfValue", "MTTF: 18,750 hours"),
        ("failureAnalysis", "Failure modes identified"),
    ])
}

fn process_integration(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("integrationStatus", "Process integration optimized"),
        ("yieldPrediction", "Yield prediction: 82.3%"),
        ("recipeParameters", "Recipe parameters saved"),
    ])
}

fn advanced_characterization(_: &PanelInputs) -> ProcessResponse {
    flat([
        ("characterizationStatus", "Characterization completed"),
        ("materialQuality", "Material quality: Good"),
        ("analysisReport", "Analysis report generated"),
    ])
}

#[cfg(test)]
mod tests {
    use emos_core::catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn every_processor_answers_the_panel_outputs() {
        for entry in catalog::ENTRIES {
            let Some(process) = processor(entry.id) else {
                continue;
            };
            let (results, _) = process(&PanelInputs::new()).into_parts();
            for output in entry.definition().outputs {
                assert!(
                    results.contains_key(output.key),
                    "processor {} misses {}",
                    entry.id,
                    output.key
                );
            }
        }
    }

    /// Panel defaults with every required field filled in.
    fn runnable_inputs(definition: &catalog::FeatureDefinition) -> PanelInputs {
        let mut inputs = definition.default_inputs();
        for field in definition.inputs.iter().filter(|f| f.required) {
            let value = match field.kind {
                InputKind::Number { .. } => "10",
                _ => "GaN",
            };
            inputs.insert(field.key, InputValue::Text(value.to_string()));
        }
        inputs
    }

    #[test]
    fn server_results_never_match_local_results() {
        for entry in catalog::ENTRIES {
            let Some(process) = processor(entry.id) else {
                continue;
            };
            let definition = entry.definition();
            let inputs = runnable_inputs(&definition);

            let (server, _) = process(&inputs).into_parts();
            for seed in 0..8 {
                let local = definition
                    .compute(&inputs, &mut StdRng::seed_from_u64(seed))
                    .unwrap_or_else(|e| panic!("feature {} failed locally: {}", entry.id, e));
                for (key, value) in &local {
                    assert_ne!(
                        server.get(key),
                        Some(value),
                        "feature {} answers the local {} from the server",
                        entry.id,
                        key
                    );
                }
            }
            assert!(server.values().all(|v| v.ends_with(SERVER_TAG)));
        }
    }

    #[test]
    fn band_structure_has_no_processor() {
        assert!(processor(FeatureId(12)).is_none());
        assert!(processor(FeatureId(99)).is_none());
    }

    #[test]
    fn device_process_reflects_fabrication_method() {
        let mut inputs = PanelInputs::new();
        inputs.insert("fabricationMethod", InputValue::Text("mbe".into()));

        let (results, _) = device_synthesizability(&inputs).into_parts();
        assert_eq!(results["recommendedProcess"], "MBE with 3-step annealing - server");
    }

    #[test]
    fn unit_logs_warn_for_empty_groups() {
        let mut inputs = PanelInputs::new();
        inputs.insert(
            "active_databases",
            InputValue::Selections(vec![
                Selection::new("icsd", "ICSD"),
                Selection::new("cod", "COD"),
            ]),
        );

        let (_, logs) = device_synthesizability(&inputs).into_parts();
        assert_eq!(logs[0], LogLine::info("Initializing device synthesizability..."));
        assert_eq!(logs[1], LogLine::info("Active databases (2): ICSD, COD"));
        assert_eq!(logs[2], LogLine::warning("No active generators found."));
        assert_eq!(logs[3], LogLine::warning("No active predictors found."));
        assert_eq!(logs[4], LogLine::info("Device synthesizability process"));
    }
}
