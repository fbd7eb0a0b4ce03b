#![forbid(unsafe_code)]

//! # metacog
//!
//! A fixed-stage pipeline that drives an LLM completion endpoint through a
//! sequence of dependent prompts to produce a structured "meta-cognitive"
//! answer to a user-supplied input.
//!
//! The stages run strictly in order — analyze (a concurrent question
//! fan-out), label, select one of four fixed reasoning templates, fill it,
//! synthesize a write-up, and answer the original input — threading each
//! stage's output into the later ones. Any stage failure aborts the run;
//! the one absorbed failure mode is an unparseable template selection,
//! which deterministically falls back to the deductive template.

pub mod gateway;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod templates;

pub use gateway::{Attribution, ChatGateway, ProviderError, ProviderGateway, UsageSink};
pub use pipeline::{
    ask_all, combine_input, run_pipeline, split_labels, AnalysisResult, PipelineConfig,
    PipelineError, PipelineResult, FIXED_QUESTIONS,
};
pub use templates::ReasoningTemplate;
