//! Electronics Application panels (ids 9-16).

use rand::{Rng, RngCore};

use super::{fields, fixed, FeatureDefinition};
use crate::models::*;
use crate::ProcessingError;

pub(super) fn device_synthesizability(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const DEVICES: &[SelectOption] = &[
        opt("transistor", "Transistor"),
        opt("diode", "Diode"),
        opt("solar_cell", "Solar Cell"),
        opt("led", "LED"),
        opt("sensor", "Sensor"),
    ];
    const SUBSTRATES: &[SelectOption] = &[
        opt("silicon", "Silicon"),
        opt("sapphire", "Sapphire"),
        opt("sic", "Silicon Carbide"),
        opt("gan", "Gallium Nitride"),
    ];
    const METHODS: &[SelectOption] = &[
        opt("mocvd", "MOCVD"),
        opt("mbe", "MBE"),
        opt("sputtering", "Sputtering"),
        opt("cvd", "CVD"),
    ];

    FeatureDefinition::new(
        descriptor,
        "Configure device and material parameters",
        vec![
            InputField::select("deviceType", "Device Type", DEVICES),
            InputField::text("materialComposition", "Material Composition", "e.g., GaAs, SiC, InGaN"),
            InputField::select("substrateType", "Substrate Type", SUBSTRATES),
            InputField::number("operatingTemp", "Operating Temperature (°C)", "-50", "500", "1"),
            InputField::select("fabricationMethod", "Fabrication Method", METHODS),
        ],
        "Synthesizability assessment",
        vec![
            OutputField::new("feasibility", "Feasibility Score"),
            OutputField::new("recommendedProcess", "Recommended Process"),
            OutputField::new("estimatedCost", "Estimated Cost"),
            OutputField::new("processTemp", "Processing Temperature"),
            OutputField::new("yieldPrediction", "Yield Prediction"),
        ],
        assess_synthesizability,
    )
}

/// Qualitative band of a feasibility percentage.
pub fn feasibility_band(score: u32) -> &'static str {
    if score > 80 {
        "High"
    } else if score > 60 {
        "Medium"
    } else {
        "Low"
    }
}

fn assess_synthesizability(
    inputs: &PanelInputs,
    rng: &mut dyn RngCore,
) -> Result<ResultFields, ProcessingError> {
    inputs.number("operatingTemp", "Operating Temperature (°C)")?;
    let score: u32 = rng.gen_range(60..100);
    let method = inputs.text_or("fabricationMethod", "mocvd").to_uppercase();

    Ok(fields([
        ("feasibility", format!("{}% ({})", score, feasibility_band(score))),
        ("recommendedProcess", format!("{} with 3-step annealing", method)),
        ("estimatedCost", format!("${}/wafer", rng.gen_range(100..600))),
        ("processTemp", format!("{}°C", rng.gen_range(400..900))),
        ("yieldPrediction", format!("{}%", rng.gen_range(70..100))),
    ]))
}

pub(super) fn interface_calculation(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const INTERFACES: &[SelectOption] = &[
        opt("coherent", "Coherent"),
        opt("semicoherent", "Semi-coherent"),
        opt("incoherent", "Incoherent"),
        opt("grain_boundary", "Grain Boundary"),
    ];
    const METHODS: &[SelectOption] = &[
        opt("dft", "DFT"),
        opt("classical_md", "Classical MD"),
        opt("tight_binding", "Tight Binding"),
        opt("empirical", "Empirical Potentials"),
    ];

    FeatureDefinition::new(
        descriptor,
        "Define the two materials and the interface to calculate",
        vec![
            InputField::text("material1", "Material 1", "e.g., Si, GaAs").required(),
            InputField::text("material2", "Material 2", "e.g., SiO2, AlGaAs").required(),
            InputField::select("interfaceType", "Interface Type", INTERFACES),
            InputField::select("calculationMethod", "Calculation Method", METHODS),
            InputField::number("supercellSize", "Supercell Size (atoms)", "50", "1000", "10"),
            InputField::checkbox("includeStrain", "Include Strain Effects", true),
            InputField::checkbox("calculateBandOffset", "Calculate Band Offset", true),
        ],
        "Interface properties",
        vec![
            OutputField::new("interfaceEnergy", "Interface Energy"),
            OutputField::new("bandOffset", "Band Offset"),
            OutputField::new("latticeMismatch", "Lattice Mismatch"),
            OutputField::new("interfaceStates", "Interface States"),
            OutputField::new("chargeTransfer", "Charge Transfer"),
        ],
        calculate_interface,
    )
}

fn calculate_interface(
    inputs: &PanelInputs,
    rng: &mut dyn RngCore,
) -> Result<ResultFields, ProcessingError> {
    inputs.number("supercellSize", "Supercell Size (atoms)")?;
    let band_offset = if inputs.flag_or("calculateBandOffset", true) {
        format!("{:.2} eV", rng.gen_range(0.2..3.2))
    } else {
        "Not calculated".to_string()
    };

    Ok(fields([
        ("interfaceEnergy", format!("{:.3} J/m²", rng.gen_range(0.5..2.5))),
        ("bandOffset", band_offset),
        ("latticeMismatch", format!("{:.2}%", rng.gen_range(0.1..5.1))),
        (
            "interfaceStates",
            format!("{:.2e} states/cm²", rng.gen_range(1e12..6e12)),
        ),
        ("chargeTransfer", format!("{:.3} e⁻", rng.gen_range(0.1..0.6))),
    ]))
}

pub(super) fn property_prediction(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const PROPERTIES: &[SelectOption] = &[
        opt("bandgap", "Band Gap"),
        opt("mobility", "Carrier Mobility"),
        opt("conductivity", "Conductivity"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::text("materialSystem", "Material System", "e.g., III-V, II-VI"),
            InputField::select("propertyPrediction", "Property to Predict", PROPERTIES),
            InputField::number("temperature", "Temperature (K)", "0", "1000", "1"),
            InputField::checkbox("includeDefects", "Include Defects", false),
        ],
        vec![
            OutputField::new("predictionStatus", "Prediction"),
            OutputField::new("bandGap", "Band Gap"),
            OutputField::new("carrierMobility", "Carrier Mobility"),
        ],
        |inputs, _| {
            inputs.number("temperature", "Temperature (K)")?;
            Ok(fixed([
                ("predictionStatus", "Electronic properties predicted"),
                ("bandGap", "Band gap: 2.3 eV (direct)"),
                ("carrierMobility", "Mobility: 850 cm²/Vs"),
            ]))
        },
    )
}

pub(super) fn band_structure(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const CALCULATIONS: &[SelectOption] = &[
        opt("dft", "DFT Calculation"),
        opt("gw", "GW Approximation"),
        opt("hybrid", "Hybrid Functional"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::select("bandCalculationType", "Calculation Type", CALCULATIONS),
            InputField::number("kPoints", "K-Points Density", "1", "20", "1"),
            InputField::text("latticeParams", "Lattice Parameters", "a, b, c values"),
            InputField::checkbox("spinOrbit", "Include Spin-Orbit Coupling", false),
        ],
        vec![
            OutputField::new("calculationStatus", "Band Structure"),
            OutputField::new("transportProperties", "Transport Properties"),
            OutputField::new("dosAnalysis", "DOS Analysis"),
        ],
        |inputs, _| {
            inputs.number("kPoints", "K-Points Density")?;
            Ok(fixed([
                ("calculationStatus", "Band structure calculated"),
                ("transportProperties", "Transport properties computed"),
                ("dosAnalysis", "DOS analysis completed"),
            ]))
        },
    )
}

pub(super) fn thermal_management(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const PROPERTIES: &[SelectOption] = &[
        opt("conductivity", "Thermal Conductivity"),
        opt("expansion", "Thermal Expansion"),
        opt("capacity", "Heat Capacity"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::select("thermalProperty", "Thermal Property", PROPERTIES),
            InputField::number("operatingPower", "Operating Power (W)", "0.1", "1000", "0.1"),
            InputField::number("ambientTemp", "Ambient Temperature (°C)", "-50", "200", "1"),
            InputField::checkbox("includeConvection", "Include Convection", true),
        ],
        vec![
            OutputField::new("optimizationStatus", "Thermal Analysis"),
            OutputField::new("maxTemperature", "Max Temperature"),
            OutputField::new("coolingSolution", "Cooling Solution"),
        ],
        |inputs, _| {
            inputs.number("operatingPower", "Operating Power (W)")?;
            inputs.number("ambientTemp", "Ambient Temperature (°C)")?;
            Ok(fixed([
                ("optimizationStatus", "Thermal management optimized"),
                ("maxTemperature", "Max temperature: 87°C"),
                ("coolingSolution", "Cooling solution recommended"),
            ]))
        },
    )
}

pub(super) fn reliability_assessment(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const TESTS: &[SelectOption] = &[
        opt("thermal_cycling", "Thermal Cycling"),
        opt("humidity", "Humidity Test"),
        opt("voltage_stress", "Voltage Stress"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::select("reliabilityTest", "Reliability Test", TESTS),
            InputField::number("testDuration", "Test Duration (hours)", "1", "10000", "1"),
            InputField::number("failureCriteria", "Failure Criteria (%)", "1", "50", "1"),
            InputField::checkbox("acceleratedTest", "Accelerated Testing", false),
        ],
        vec![
            OutputField::new("assessmentStatus", "Assessment"),
            OutputField::new("mttfValue", "MTTF"),
            OutputField::new("failureAnalysis", "Failure Analysis"),
        ],
        |inputs, _| {
            inputs.number("testDuration", "Test Duration (hours)")?;
            inputs.number("failureCriteria", "Failure Criteria (%)")?;
            Ok(fixed([
                ("assessmentStatus", "Reliability assessment completed"),
                ("mttfValue", "MTTF: 15,000 hours"),
                ("failureAnalysis", "Failure modes identified"),
            ]))
        },
    )
}

pub(super) fn process_integration(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const STEPS: &[SelectOption] = &[
        opt("deposition", "Deposition"),
        opt("etching", "Etching"),
        opt("annealing", "Annealing"),
        opt("doping", "Doping"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::select("processStep", "Process Step", STEPS),
            InputField::number("processTemp", "Process Temperature (°C)", "20", "1200", "10"),
            InputField::text("gasFlow", "Gas Flow Rates", "sccm values"),
            InputField::checkbox("inSituMonitoring", "In-situ Monitoring", true),
        ],
        vec![
            OutputField::new("integrationStatus", "Integration"),
            OutputField::new("yieldPrediction", "Yield Prediction"),
            OutputField::new("recipeParameters", "Recipe"),
        ],
        |inputs, _| {
            inputs.number("processTemp", "Process Temperature (°C)")?;
            Ok(fixed([
                ("integrationStatus", "Process integration optimized"),
                ("yieldPrediction", "Yield prediction: 89%"),
                ("recipeParameters", "Recipe parameters saved"),
            ]))
        },
    )
}

pub(super) fn advanced_characterization(descriptor: FeatureDescriptor) -> FeatureDefinition {
    const TECHNIQUES: &[SelectOption] = &[
        opt("xrd", "X-Ray Diffraction"),
        opt("sem", "SEM"),
        opt("xps", "XPS"),
        opt("afm", "AFM"),
    ];

    FeatureDefinition::standard(
        descriptor,
        vec![
            InputField::select("characterizationTech", "Characterization Technique", TECHNIQUES),
            InputField::number("scanRange", "Scan Range", "1", "1000", "1"),
            InputField::file("referenceData", "Reference Data", ".ref,.std"),
            InputField::checkbox("automaticAnalysis", "Automatic Analysis", true),
        ],
        vec![
            OutputField::new("characterizationStatus", "Characterization"),
            OutputField::new("materialQuality", "Material Quality"),
            OutputField::new("analysisReport", "Analysis Report"),
        ],
        |inputs, _| {
            inputs.number("scanRange", "Scan Range")?;
            Ok(fixed([
                ("characterizationStatus", "Characterization completed"),
                ("materialQuality", "Material quality: Excellent"),
                ("analysisReport", "Analysis report generated"),
            ]))
        },
    )
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn definition(build: fn(FeatureDescriptor) -> FeatureDefinition) -> FeatureDefinition {
        build(FeatureDescriptor::new(FeatureId(0), "Test", ""))
    }

    #[test]
    fn feasibility_bands() {
        assert_eq!(feasibility_band(99), "High");
        assert_eq!(feasibility_band(80), "Medium");
        assert_eq!(feasibility_band(61), "Medium");
        assert_eq!(feasibility_band(60), "Low");
    }

    #[test]
    fn synthesizability_names_the_chosen_method() {
        let synth = definition(device_synthesizability);
        let mut inputs = synth.default_inputs();
        inputs.insert("fabricationMethod", InputValue::Text("sputtering".into()));

        let results = synth
            .compute(&inputs, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(results["recommendedProcess"], "SPUTTERING with 3-step annealing");
        assert!(results["estimatedCost"].starts_with('$'));
        assert!(results["estimatedCost"].ends_with("/wafer"));

        let score: u32 = results["feasibility"]
            .split('%')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!((60..100).contains(&score));
    }

    #[test]
    fn synthesizability_is_deterministic_for_a_seed() {
        let synth = definition(device_synthesizability);
        let inputs = synth.default_inputs();
        let a = synth.compute(&inputs, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = synth.compute(&inputs, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn interface_requires_both_materials() {
        let interface = definition(interface_calculation);
        let mut inputs = interface.default_inputs();
        inputs.insert("material1", InputValue::Text("Si".into()));

        let err = interface
            .compute(&inputs, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert_eq!(err, ProcessingError::MissingInput("Material 2".into()));
    }

    #[test]
    fn interface_skips_band_offset_when_unchecked() {
        let interface = definition(interface_calculation);
        let mut inputs = interface.default_inputs();
        inputs.insert("material1", InputValue::Text("Si".into()));
        inputs.insert("material2", InputValue::Text("SiO2".into()));
        inputs.insert("calculateBandOffset", InputValue::Flag(false));

        let results = interface
            .compute(&inputs, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(results["bandOffset"], "Not calculated");
        assert!(results["interfaceEnergy"].ends_with(" J/m²"));
        assert!(results["interfaceStates"].contains("e12"));
    }
}
