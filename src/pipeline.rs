//! Meta-cognitive reasoning pipeline: analyze → label → select → fill →
//! synthesize → answer.
//!
//! Control flow is strictly linear across stages; only the question fan-out
//! is internally concurrent. Failure at any stage aborts the run with no
//! partial result.

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gateway::{Attribution, ChatGateway, ChatModel, ChatRequest, Message, ProviderError};
use crate::prompts;
use crate::templates::ReasoningTemplate;

// =============================================================================
// Fixed question set
// =============================================================================

/// The fixed analysis questions issued by the fan-out stage, in order.
///
/// The last entry runs two questions together with no separator. It is kept
/// as a single entry on purpose: splitting it would change the analysis key
/// set every downstream prompt is built from.
pub const FIXED_QUESTIONS: &[&str] = &[
    "What is the main topic or subject?",
    "What is the complexity level (low, medium, high)?",
    "What are the key concepts or ideas mentioned?",
    "What type of reasoning would be most appropriate (deductive, inductive, abductive, analogical)?",
    "Are there any apparent biases or logical fallacies?",
    "What additional information might be needed?What is the format of the reply being requested?",
];

// =============================================================================
// Types
// =============================================================================

/// Ordered question → answer mapping produced by the fan-out stage.
///
/// Entry order follows the question list, never completion order. Duplicate
/// question text collapses with insert semantics: the later answer overwrites
/// the earlier one and the first position is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AnalysisResult {
    entries: Vec<(String, String)>,
}

impl AnalysisResult {
    /// Build from (question, answer) pairs with collapsing insert semantics.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut entries: Vec<(String, String)> = Vec::with_capacity(pairs.len());
        for (question, answer) in pairs {
            match entries.iter_mut().find(|(q, _)| *q == question) {
                Some((_, existing)) => *existing = answer,
                None => entries.push((question, answer)),
            }
        }
        Self { entries }
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, a)| a.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(q, _)| q.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sampling configuration shared by every stage's completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Model to drive the pipeline with.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature for all stages.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Nucleus sampling cutoff for all stages.
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Maximum tokens per completion (provider default when unset).
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_temperature() -> f32 {
    0.6
}
fn default_top_p() -> f32 {
    0.7
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: None,
        }
    }
}

/// The full record of one completed pipeline run.
///
/// Constructed once after the final stage; there is no partial result on
/// failure. The chosen template serializes as its raw skeleton string.
#[derive(Debug, Serialize, Deserialize)]
pub struct PipelineResult {
    pub id: Uuid,
    pub created_at: String,
    pub input_data: String,
    pub analysis: AnalysisResult,
    pub class_labels: Vec<String>,
    pub chosen_template: ReasoningTemplate,
    pub filled_template: String,
    pub final_output: String,
    pub final_answer: String,
}

/// Pipeline failure, tagged with the stage that aborted the run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Question analysis failed: {0}")]
    Analysis(#[source] ProviderError),
    #[error("Label generation failed: {0}")]
    Labeling(#[source] ProviderError),
    #[error("Template selection failed: {0}")]
    Selection(#[source] ProviderError),
    #[error("Template filling failed: {0}")]
    Filling(#[source] ProviderError),
    #[error("Synthesis failed: {0}")]
    Synthesis(#[source] ProviderError),
    #[error("Final answer failed: {0}")]
    Answer(#[source] ProviderError),
}

// =============================================================================
// Input combination
// =============================================================================

/// Combine the input with optional additional context.
///
/// Empty context leaves the input unchanged; otherwise a labeled
/// "Additional Context" section is appended after a blank line.
pub fn combine_input(input_data: &str, context: &str) -> String {
    if context.is_empty() {
        input_data.to_string()
    } else {
        format!("{input_data}\n\nAdditional Context:\n{context}")
    }
}

// =============================================================================
// Label splitting
// =============================================================================

/// Split a comma-separated label response into trimmed labels.
///
/// Pure function of its text input: no dedup, no count bounds, and a
/// response with zero commas yields a single-element list.
pub fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',').map(|label| label.trim().to_string()).collect()
}

// =============================================================================
// Completion client
// =============================================================================

/// One completion call: a system role plus a user prompt, with the fixed
/// sampling parameters. No caching, no retries; the error propagates.
pub async fn complete(
    gateway: &dyn ChatGateway,
    cfg: &PipelineConfig,
    caller: &'static str,
    role: &str,
    prompt: &str,
) -> Result<String, ProviderError> {
    let mut req = ChatRequest::new(
        ChatModel::openai(&cfg.model),
        vec![Message::system(role), Message::user(prompt)],
        Attribution::new(caller),
    )
    .temperature(cfg.temperature)
    .top_p(cfg.top_p);

    if let Some(max) = cfg.max_tokens {
        req = req.max_tokens(max);
    }

    let resp = gateway.chat(req).await?;
    Ok(resp.content)
}

// =============================================================================
// Stages
// =============================================================================

/// Answer one analysis question against the shared context.
pub async fn ask_question(
    gateway: &dyn ChatGateway,
    cfg: &PipelineConfig,
    question: &str,
    context: &str,
) -> Result<String, ProviderError> {
    complete(
        gateway,
        cfg,
        "pipeline::ask",
        prompts::ROLE_ANALYST,
        &prompts::question_prompt(context, question),
    )
    .await
}

/// Fan-out: issue every question concurrently against one context and join.
///
/// This is a barrier, not a best-effort gather — if any sub-request fails the
/// whole stage fails and no partial mapping is produced. Entry order is
/// zipped from the input question order regardless of completion order.
pub async fn ask_all(
    gateway: &dyn ChatGateway,
    cfg: &PipelineConfig,
    questions: &[&str],
    context: &str,
) -> Result<AnalysisResult, ProviderError> {
    let answers = try_join_all(
        questions
            .iter()
            .map(|question| ask_question(gateway, cfg, question, context)),
    )
    .await?;

    Ok(AnalysisResult::from_pairs(
        questions
            .iter()
            .map(|q| q.to_string())
            .zip(answers)
            .collect(),
    ))
}

/// Derive a flat label list from the analysis via one completion call.
pub async fn generate_labels(
    gateway: &dyn ChatGateway,
    cfg: &PipelineConfig,
    analysis: &AnalysisResult,
) -> Result<Vec<String>, ProviderError> {
    let response = complete(
        gateway,
        cfg,
        "pipeline::labels",
        prompts::ROLE_LABELER,
        &prompts::labels_prompt(analysis),
    )
    .await?;

    Ok(split_labels(&response))
}

/// Choose one of the four reasoning templates via one completion call.
///
/// Unparseable selector output is absorbed by the deductive fallback; only a
/// provider failure can fail this stage.
pub async fn choose_template(
    gateway: &dyn ChatGateway,
    cfg: &PipelineConfig,
    analysis: &AnalysisResult,
    labels: &[String],
) -> Result<ReasoningTemplate, ProviderError> {
    let response = complete(
        gateway,
        cfg,
        "pipeline::select",
        prompts::ROLE_SELECTOR,
        &prompts::selection_prompt(analysis, labels),
    )
    .await?;

    Ok(ReasoningTemplate::from_code(&response))
}

/// Instantiate the chosen template's placeholders via one completion call.
/// The model's output is trusted verbatim; no structural check is made.
pub async fn fill_template(
    gateway: &dyn ChatGateway,
    cfg: &PipelineConfig,
    template: ReasoningTemplate,
    analysis: &AnalysisResult,
    labels: &[String],
) -> Result<String, ProviderError> {
    complete(
        gateway,
        cfg,
        "pipeline::fill",
        prompts::ROLE_FILLER,
        &prompts::fill_prompt(template, analysis, labels),
    )
    .await
}

/// Produce the structured write-up: summary, strength evaluation, and
/// alternative angles.
pub async fn synthesize(
    gateway: &dyn ChatGateway,
    cfg: &PipelineConfig,
    filled_template: &str,
    analysis: &AnalysisResult,
    labels: &[String],
) -> Result<String, ProviderError> {
    complete(
        gateway,
        cfg,
        "pipeline::synthesize",
        prompts::ROLE_SYNTHESIZER,
        &prompts::synthesis_prompt(filled_template, analysis, labels),
    )
    .await
}

/// Produce the direct answer to the original input, conditioned on the
/// filled template. Independent of the synthesizer's output.
pub async fn final_answer(
    gateway: &dyn ChatGateway,
    cfg: &PipelineConfig,
    input_data: &str,
    filled_template: &str,
) -> Result<String, ProviderError> {
    complete(
        gateway,
        cfg,
        "pipeline::answer",
        prompts::ROLE_SYNTHESIZER,
        &prompts::answer_prompt(input_data, filled_template),
    )
    .await
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Run the full seven-stage pipeline over a combined input string.
///
/// Stages run strictly in order, each threading its output into the later
/// stages. The first stage error aborts the run; there is no partial
/// `PipelineResult`.
pub async fn run_pipeline(
    gateway: &dyn ChatGateway,
    cfg: &PipelineConfig,
    input_data: String,
) -> Result<PipelineResult, PipelineError> {
    eprintln!(
        "[pipeline] analyzing input across {} questions...",
        FIXED_QUESTIONS.len()
    );
    let analysis = ask_all(gateway, cfg, FIXED_QUESTIONS, &input_data)
        .await
        .map_err(PipelineError::Analysis)?;

    eprintln!("[pipeline] generating class labels...");
    let class_labels = generate_labels(gateway, cfg, &analysis)
        .await
        .map_err(PipelineError::Labeling)?;
    eprintln!("[pipeline]   {} labels", class_labels.len());

    eprintln!("[pipeline] selecting reasoning template...");
    let chosen_template = choose_template(gateway, cfg, &analysis, &class_labels)
        .await
        .map_err(PipelineError::Selection)?;
    eprintln!("[pipeline]   {}", chosen_template.name());

    eprintln!("[pipeline] filling template...");
    let filled_template = fill_template(gateway, cfg, chosen_template, &analysis, &class_labels)
        .await
        .map_err(PipelineError::Filling)?;

    eprintln!("[pipeline] synthesizing...");
    let final_output = synthesize(gateway, cfg, &filled_template, &analysis, &class_labels)
        .await
        .map_err(PipelineError::Synthesis)?;

    eprintln!("[pipeline] producing final answer...");
    let answer = final_answer(gateway, cfg, &input_data, &filled_template)
        .await
        .map_err(PipelineError::Answer)?;

    Ok(PipelineResult {
        id: Uuid::new_v4(),
        created_at: chrono::Utc::now().to_rfc3339(),
        input_data,
        analysis,
        class_labels,
        chosen_template,
        filled_template,
        final_output,
        final_answer: answer,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_question_list_keeps_runon_entry() {
        assert_eq!(FIXED_QUESTIONS.len(), 6);
        // Two questions merged into one entry, with no separator.
        assert!(FIXED_QUESTIONS[5].contains("needed?What is the format"));
    }

    #[test]
    fn split_labels_trims_around_commas() {
        assert_eq!(
            split_labels("fast, inductive reasoning"),
            vec!["fast".to_string(), "inductive reasoning".to_string()]
        );
    }

    #[test]
    fn split_labels_without_commas_yields_one_label() {
        assert_eq!(split_labels("physics"), vec!["physics".to_string()]);
    }

    #[test]
    fn split_labels_keeps_empty_pieces() {
        assert_eq!(
            split_labels("a,,b"),
            vec!["a".to_string(), "".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn combine_input_without_context_is_unchanged() {
        assert_eq!(
            combine_input("Explain why ice floats on water.", ""),
            "Explain why ice floats on water."
        );
    }

    #[test]
    fn combine_input_appends_labeled_context_section() {
        assert_eq!(
            combine_input("Quarterly sales rose 5%.", "Focus on Q3."),
            "Quarterly sales rose 5%.\n\nAdditional Context:\nFocus on Q3."
        );
    }

    #[test]
    fn analysis_collapses_duplicate_questions() {
        let analysis = AnalysisResult::from_pairs(vec![
            ("q1".to_string(), "first".to_string()),
            ("q2".to_string(), "second".to_string()),
            ("q1".to_string(), "overwritten".to_string()),
        ]);
        assert_eq!(analysis.len(), 2);
        assert_eq!(analysis.get("q1"), Some("overwritten"));
        // First position is kept.
        assert_eq!(analysis.questions().next(), Some("q1"));
    }

    #[test]
    fn pipeline_config_defaults_match_fixed_sampling() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.model, "gpt-3.5-turbo");
        assert!((cfg.temperature - 0.6).abs() < 1e-6);
        assert!((cfg.top_p - 0.7).abs() < 1e-6);
        assert!(cfg.max_tokens.is_none());
    }

    #[test]
    fn pipeline_config_deserializes_with_defaults() {
        let cfg: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.model, "gpt-3.5-turbo");

        let cfg: PipelineConfig =
            serde_json::from_str(r#"{"model": "gpt-4o-mini", "max_tokens": 256}"#).unwrap();
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.max_tokens, Some(256));
        assert!((cfg.temperature - 0.6).abs() < 1e-6);
    }
}
