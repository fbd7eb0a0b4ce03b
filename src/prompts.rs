//! Prompt construction for the pipeline stages.
//!
//! Domain logic for rendering stage prompts. Provider-agnostic: every builder
//! returns plain text that the completion client wraps in messages.

use crate::pipeline::AnalysisResult;
use crate::templates::ReasoningTemplate;

// =============================================================================
// System roles
// =============================================================================

pub const ROLE_ANALYST: &str =
    "You are an expert in analyzing and answering questions about given contexts.";

pub const ROLE_LABELER: &str = "You are an expert in categorizing and labeling data.";

pub const ROLE_SELECTOR: &str =
    "You are an expert in selecting appropriate reasoning templates.";

pub const ROLE_FILLER: &str =
    "You are an expert in applying reasoning strategies and filling in templates.";

pub const ROLE_SYNTHESIZER: &str = "You are a meta-cognitive reasoning expert capable of \
     synthesizing information and providing insightful conclusions.";

// =============================================================================
// Rendering helpers
// =============================================================================

/// Render the analysis mapping as prompt text, one question/answer pair per
/// line, in analysis order.
pub fn render_analysis(analysis: &AnalysisResult) -> String {
    analysis
        .iter()
        .map(|(question, answer)| format!("- {question}: {answer}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the label list as prompt text.
pub fn render_labels(labels: &[String]) -> String {
    labels.join(", ")
}

// =============================================================================
// Stage prompts
// =============================================================================

/// Fan-out stage: one sub-question against the shared context.
pub fn question_prompt(context: &str, question: &str) -> String {
    format!(
        "Context: {context}\n\n\
         Question: {question}\n\n\
         Provide an accurate and concise answer."
    )
}

/// Labeler stage: derive a comma-separated label list from the analysis.
pub fn labels_prompt(analysis: &AnalysisResult) -> String {
    format!(
        "Based on the following analysis, generate a list of accurate value labels:\n\n\
         Analysis:\n{}\n\n\
         Provide your answer as a comma-separated list of labels.\n\
         Output only your answer as a comma-separated list of labels.",
        render_analysis(analysis)
    )
}

/// Selector stage: present the four enumerated templates, request the numeral.
pub fn selection_prompt(analysis: &AnalysisResult, labels: &[String]) -> String {
    let menu = ReasoningTemplate::ALL
        .iter()
        .map(|t| format!("{}. {}: \"{}\"", t.code(), t.name(), t.example()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Based on the following analysis and class labels, choose the most appropriate \
         reasoning template:\n\n\
         Analysis:\n{}\n\
         Class Labels: {}\n\n\
         Templates:\n{menu}\n\n\
         Provide your answer as the number of the chosen template. Output the number only.",
        render_analysis(analysis),
        render_labels(labels),
    )
}

/// Filler stage: substitute the skeleton's placeholders from the analysis.
pub fn fill_prompt(
    template: ReasoningTemplate,
    analysis: &AnalysisResult,
    labels: &[String],
) -> String {
    format!(
        "Fill in the following template based on the given analysis and class labels:\n\n\
         Template: {}\n\
         Analysis:\n{}\n\
         Class Labels: {}\n\n\
         Provide your answer as the completed template.",
        template.skeleton(),
        render_analysis(analysis),
        render_labels(labels),
    )
}

/// Synthesizer stage: structured write-up of the reasoning process.
pub fn synthesis_prompt(
    filled_template: &str,
    analysis: &AnalysisResult,
    labels: &[String],
) -> String {
    format!(
        "Based on the following filled template, analysis, and class labels, provide a \
         final completion that includes:\n\
         1. A summary of the reasoning process\n\
         2. An evaluation of the strength of the conclusion\n\
         3. Suggestions for further investigation or alternative perspectives\n\n\
         Context: {filled_template}\n\
         Analysis:\n{}\n\
         Class Labels: {}\n\n\
         Provide your answer in a clear, structured format.",
        render_analysis(analysis),
        render_labels(labels),
    )
}

/// Final-answer stage: direct completion of the original input, conditioned
/// on the filled template.
pub fn answer_prompt(input_data: &str, filled_template: &str) -> String {
    format!(
        "Below is a conversation between a user and a helpful assistant. Generate an \
         accurate completion based on the context.\n\n\
         Context: {filled_template}\n\
         Input: {input_data}\n\
         Output:"
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult::from_pairs(vec![
            ("What is the main topic?".to_string(), "Buoyancy.".to_string()),
            ("What is the complexity level?".to_string(), "Low.".to_string()),
        ])
    }

    #[test]
    fn analysis_renders_in_order() {
        let rendered = render_analysis(&sample_analysis());
        let topic = rendered.find("main topic").unwrap();
        let complexity = rendered.find("complexity level").unwrap();
        assert!(topic < complexity);
        assert!(rendered.contains("Buoyancy."));
    }

    #[test]
    fn question_prompt_embeds_both_parts() {
        let p = question_prompt("Ice floats.", "Why?");
        assert!(p.contains("Context: Ice floats."));
        assert!(p.contains("Question: Why?"));
        assert!(p.contains("accurate and concise answer"));
    }

    #[test]
    fn selection_prompt_enumerates_all_templates() {
        let p = selection_prompt(&sample_analysis(), &["physics".to_string()]);
        for template in ReasoningTemplate::ALL {
            assert!(p.contains(template.name()), "missing {}", template.name());
        }
        assert!(p.contains("Output the number only."));
    }

    #[test]
    fn fill_prompt_carries_skeleton_verbatim() {
        let p = fill_prompt(ReasoningTemplate::Abductive, &sample_analysis(), &[]);
        assert!(p.contains(ReasoningTemplate::Abductive.skeleton()));
    }

    #[test]
    fn answer_prompt_conditions_on_filled_template() {
        let p = answer_prompt("Why does ice float?", "The best explanation is density.");
        assert!(p.contains("Context: The best explanation is density."));
        assert!(p.contains("Input: Why does ice float?"));
        assert!(p.ends_with("Output:"));
    }
}
