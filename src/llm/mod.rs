//! LLM-powered SQL synthesis and answer summarization.

pub mod client;
pub mod summarizer;
pub mod synthesizer;

pub use client::{LlmClient, LlmProvider};
pub use summarizer::EMPTY_RESULT_FALLBACK;
pub use synthesizer::{is_select_statement, SqlSynthesizer};
