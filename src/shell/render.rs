//! Plain-text rendering of the three views.

use std::fmt::Write;

use emos_core::catalog;
use emos_core::models::*;

use super::chat::{ChatLog, Sender};
use super::panel::FeaturePanel;
use super::registry::FeatureRegistry;
use super::units::UnitSelection;

/// Shown in an output slot that has no value yet.
pub const PENDING: &str = "Pending...";

const PROGRESS_WIDTH: usize = 20;

fn branch(is_last: bool) -> &'static str {
    if is_last {
        "└── "
    } else {
        "├── "
    }
}

/// Feature list grouped by category, then the information units.
///
/// ```text
/// Materials Exploration
/// ├── [1] Material Search
/// └── [8] Tensor Analysis
/// ```
pub fn welcome(registry: &FeatureRegistry, units: &UnitSelection) -> String {
    let mut out = String::from("EMOS\n\n");

    for category in [
        FeatureCategory::MaterialsExploration,
        FeatureCategory::ElectronicsApplication,
    ] {
        let entries: Vec<_> = registry
            .entries()
            .filter(|e| e.category == category)
            .collect();
        if entries.is_empty() {
            continue;
        }
        out.push_str(category.title());
        out.push('\n');
        for (i, entry) in entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}[{}] {}",
                branch(i == entries.len() - 1),
                entry.id,
                entry.name
            );
        }
        out.push('\n');
    }

    out.push_str("Information Units\n");
    for kind in UnitKind::ALL {
        let _ = writeln!(out, "{}", kind.title());
        let all: Vec<_> = catalog::units_of(kind).collect();
        for (i, unit) in all.iter().enumerate() {
            let mark = if units.is_active(kind, unit.key) { "[x]" } else { "[ ]" };
            let note = if unit.available { "" } else { " (unavailable)" };
            let _ = writeln!(
                out,
                "{}{} {} ({}){}",
                branch(i == all.len() - 1),
                mark,
                unit.label,
                unit.key,
                note
            );
        }
    }
    out
}

fn input_hint(field: &InputField) -> String {
    match &field.kind {
        InputKind::Text { placeholder } if !placeholder.is_empty() => {
            format!("({})", placeholder)
        }
        InputKind::Text { .. } => String::new(),
        InputKind::Number { min, max, step } => format!("[{}..{} step {}]", min, max, step),
        InputKind::Select { options } => {
            let values: Vec<&str> = options
                .iter()
                .map(|o| if o.value.is_empty() { "-" } else { o.value })
                .collect();
            format!("{{{}}}", values.join("|"))
        }
        InputKind::File { accept } => format!("(file {})", accept),
        InputKind::Checkbox { .. } => "(on/off)".to_string(),
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = PROGRESS_WIDTH * usize::from(progress.min(100)) / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        progress
    )
}

/// The open panel: header, inputs, progress, outputs and log.
pub fn panel(panel: &FeaturePanel) -> String {
    let definition = panel.definition();
    let state = panel.snapshot();
    let mut out = String::new();

    let descriptor = &definition.descriptor;
    let _ = writeln!(out, "{} (#{})", descriptor.name, descriptor.id);
    if !descriptor.description.is_empty() {
        let _ = writeln!(out, "{}", descriptor.description);
    }
    out.push('\n');

    let _ = writeln!(out, "{}", definition.inputs_intro);
    for field in &definition.inputs {
        let value = state
            .inputs
            .get(field.key)
            .map(InputValue::display)
            .unwrap_or_default();
        let required = if field.required { "*" } else { "" };
        let _ = writeln!(
            out,
            "  {:<22} {}{}: {} {}",
            field.key,
            field.label,
            required,
            value,
            input_hint(field)
        );
    }
    out.push('\n');

    let source = state
        .source
        .map(|source| format!(" ({})", source.as_str()))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "{} {}{} {}",
        progress_bar(state.progress),
        state.status.as_str(),
        source,
        state.progress_text
    );
    out.push('\n');

    let _ = writeln!(out, "{}", definition.outputs_intro);
    match &state.result {
        Some(ProcessingResult::Error(message)) => {
            let _ = writeln!(out, "  Error: {}", message);
        }
        result => {
            for output in &definition.outputs {
                let value = result
                    .as_ref()
                    .and_then(|r| r.field(output.key))
                    .unwrap_or(PENDING);
                let link = if output.link && value != PENDING { " [download]" } else { "" };
                let _ = writeln!(out, "  {}: {}{}", output.label, value, link);
            }
        }
    }

    if !state.logs.is_empty() {
        out.push_str("\nLog\n");
        for line in &state.logs {
            let _ = writeln!(out, "  [{}] {}", line.level, line.message);
        }
    }
    out
}

pub fn chat(log: &ChatLog) -> String {
    let mut out = String::from("EMOS Assistant\n\n");
    if log.messages().is_empty() {
        out.push_str("Ask about crystal structures, mechanical or thermal properties, databases or predictive models.\n");
    }
    for message in log.messages() {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Assistant => "emos",
        };
        let _ = writeln!(out, "{} {:>4}: {}", message.at.format("%H:%M"), who, message.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use emos_core::catalog::generic_definition;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::client::{BackendError, Offline, ProcessBackend};
    use crate::config::Timings;

    struct Fixed;

    impl ProcessBackend for Fixed {
        async fn submit(&self, _: FeatureId, _: &PanelInputs) -> Result<ProcessResponse, BackendError> {
            let results = [("calculationStatus", "Done - server")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Ok(ProcessResponse::Flat(results))
        }

        async fn toggle_generator(&self, _: &str, _: bool) -> Result<String, BackendError> {
            Ok(String::new())
        }
    }

    async fn finished_panel<B: ProcessBackend>(backend: B) -> FeaturePanel {
        let entry = catalog::lookup(FeatureId(12)).unwrap();
        let panel = FeaturePanel::new(entry.definition(), false);
        panel
            .start(
                Arc::new(backend),
                PanelInputs::new(),
                Timings::instant(),
                StdRng::seed_from_u64(3),
            )
            .unwrap()
            .await
            .unwrap();
        panel
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0), "[--------------------]   0%");
        assert_eq!(progress_bar(50), "[##########----------]  50%");
        assert_eq!(progress_bar(100), "[####################] 100%");
    }

    #[test]
    fn generic_panel_shows_three_pending_slots() {
        let descriptor = FeatureDescriptor::new(FeatureId(99), "Custom Analysis", "Made up");
        let panel = FeaturePanel::new(generic_definition(descriptor), true);
        let text = super::panel(&panel);

        assert!(text.starts_with("Custom Analysis (#99)\nMade up\n"));
        assert!(text.contains("Configure your input parameters for Custom Analysis"));
        assert_eq!(text.matches(PENDING).count(), 3);
    }

    #[tokio::test]
    async fn status_line_marks_local_fallback() {
        let text = super::panel(&finished_panel(Offline).await);

        assert!(text.contains("0% idle (local)"), "{}", text);
        assert!(text.contains("Band structure calculated"));
    }

    #[tokio::test]
    async fn status_line_marks_backend_results() {
        let text = super::panel(&finished_panel(Fixed).await);

        assert!(text.contains("idle (backend)"), "{}", text);
        assert!(text.contains("Done - server"));
    }

    #[test]
    fn no_marker_before_the_first_run() {
        let panel = FeaturePanel::new(catalog::lookup(FeatureId(1)).unwrap().definition(), false);
        let text = super::panel(&panel);

        assert!(!text.contains("(local)"));
        assert!(!text.contains("(backend)"));
    }

    #[test]
    fn welcome_lists_both_categories_and_units() {
        let text = welcome(&FeatureRegistry::builtin(), &UnitSelection::new());
        assert!(text.contains("Materials Exploration\n├── [1] Material Search"));
        assert!(text.contains("└── [16] Advanced Characterization"));
        assert!(text.contains("[ ] MatterGen (mattergen)"));
        assert!(text.contains("GNoME (gnome) (unavailable)"));
    }

    #[test]
    fn select_hint_lists_values() {
        let field = InputField::select("t", "T", &[opt("", "Select"), opt("a", "A")]);
        assert_eq!(input_hint(&field), "{-|a}");
    }
}
