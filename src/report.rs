//! Human-readable rendering of a pipeline result.
//!
//! The core returns a `PipelineResult`; turning it into a report is a
//! presentation concern kept out of the pipeline itself.

use crate::pipeline::PipelineResult;
use crate::prompts::render_analysis;

/// Render one labeled block per result field.
pub fn render_report(result: &PipelineResult) -> String {
    let mut out = String::new();

    push_block(&mut out, "Input Data", &result.input_data);
    push_block(&mut out, "Analysis", &render_analysis(&result.analysis));
    push_block(&mut out, "Class Labels", &result.class_labels.join(", "));
    push_block(&mut out, "Chosen Template", result.chosen_template.skeleton());
    push_block(&mut out, "Filled Template", &result.filled_template);
    push_block(&mut out, "Final Output", &result.final_output);
    push_block(&mut out, "Final Answer", &result.final_answer);

    out
}

fn push_block(out: &mut String, title: &str, body: &str) {
    out.push_str(title);
    out.push_str(":\n");
    out.push_str(body);
    out.push_str("\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::AnalysisResult;
    use crate::templates::ReasoningTemplate;
    use uuid::Uuid;

    fn sample_result() -> PipelineResult {
        PipelineResult {
            id: Uuid::new_v4(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            input_data: "Explain why ice floats on water.".to_string(),
            analysis: AnalysisResult::from_pairs(vec![(
                "What is the main topic or subject?".to_string(),
                "Buoyancy and water density.".to_string(),
            )]),
            class_labels: vec!["physics".to_string(), "density".to_string()],
            chosen_template: ReasoningTemplate::Deductive,
            filled_template: "If water expands when frozen...".to_string(),
            final_output: "Summary of the reasoning process...".to_string(),
            final_answer: "Ice floats because it is less dense than water.".to_string(),
        }
    }

    #[test]
    fn report_has_one_block_per_field() {
        let report = render_report(&sample_result());
        for title in [
            "Input Data:",
            "Analysis:",
            "Class Labels:",
            "Chosen Template:",
            "Filled Template:",
            "Final Output:",
            "Final Answer:",
        ] {
            assert!(report.contains(title), "missing block {title}");
        }
    }

    #[test]
    fn report_prints_template_skeleton_verbatim() {
        let report = render_report(&sample_result());
        assert!(report.contains(ReasoningTemplate::Deductive.skeleton()));
    }

    #[test]
    fn report_joins_labels_with_commas() {
        let report = render_report(&sample_result());
        assert!(report.contains("physics, density"));
    }
}
