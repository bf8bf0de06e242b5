//! Environment-driven configuration.
//!
//! All settings come from environment variables (a `.env` file is loaded by
//! the binary before this runs):
//! - `DB_URL`: PostgreSQL connection string (required)
//! - `PGCHAT_LLM`: chat model name (default: "gemini-2.5-flash")
//! - `PGCHAT_EMBEDDING`: embedding model name (default: "text-embedding-3-small")
//! - `GOOGLE_API_KEY` / `ANTHROPIC_API_KEY` / `OPENAI_API_KEY`: key for the
//!   provider implied by the model name

use crate::types::{ChatError, Result};

/// Runtime configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub db_url: String,

    /// Chat completion model name.
    pub llm_model: String,

    /// API key for the chat model's provider.
    pub llm_api_key: String,

    /// Embedding model name (OpenAI embeddings API).
    pub embedding_model: String,

    /// OpenAI API key for embeddings, if available.
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Config` if `DB_URL` is missing or the API key
    /// required by the selected chat model is not set.
    pub fn from_env() -> Result<Self> {
        let db_url = std::env::var("DB_URL")
            .map_err(|_| ChatError::Config("DB_URL environment variable not set".to_string()))?;

        let llm_model =
            std::env::var("PGCHAT_LLM").unwrap_or_else(|_| "gemini-2.5-flash".to_string());

        let llm_api_key = Self::api_key_for_model(&llm_model)?;

        let embedding_model = std::env::var("PGCHAT_EMBEDDING")
            .unwrap_or_else(|_| "text-embedding-3-small".to_string());

        Ok(Self {
            db_url,
            llm_model,
            llm_api_key,
            embedding_model,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
        })
    }

    /// Resolve the API key environment variable implied by a model name.
    ///
    /// Mirrors the provider detection used by the LLM client: `gemini*`
    /// reads `GOOGLE_API_KEY`, `claude*`/`anthropic*` reads
    /// `ANTHROPIC_API_KEY`, anything else reads `OPENAI_API_KEY`.
    pub fn api_key_for_model(model: &str) -> Result<String> {
        let var = Self::key_var_for_model(model);
        std::env::var(var)
            .map_err(|_| ChatError::Config(format!("{} environment variable not set", var)))
    }

    /// Name of the key environment variable for a model.
    pub fn key_var_for_model(model: &str) -> &'static str {
        if model.starts_with("gemini") || model.starts_with("models/gemini") {
            "GOOGLE_API_KEY"
        } else if model.starts_with("claude") || model.starts_with("anthropic") {
            "ANTHROPIC_API_KEY"
        } else {
            "OPENAI_API_KEY"
        }
    }
}
