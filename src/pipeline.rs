//! The three-stage request pipeline: introspect, synthesize, execute and
//! summarize.

use crate::catalog::CatalogSnapshot;
use crate::config::Config;
use crate::db::Database;
use crate::embeddings::OpenAiEmbedder;
use crate::fewshot::{builtin_examples, ExamplePair, ExampleSelector};
use crate::llm::{summarizer, LlmClient, SqlSynthesizer};
use crate::types::{ChatError, QueryTable, Result};
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::info;

/// One completed question/answer round trip.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub question: String,
    pub sql: String,
    pub table: QueryTable,
    pub answer: String,
}

/// Request pipeline over a memoized connection and catalog snapshot.
///
/// Each request runs to completion before the next begins; there is no
/// retry, cancellation, or timeout on any stage.
pub struct Pipeline {
    db: Database,
    llm: LlmClient,
    synthesizer: SqlSynthesizer,
    selector: Option<ExampleSelector>,
    schema: OnceCell<CatalogSnapshot>,
}

impl Pipeline {
    /// Connect and assemble the pipeline.
    ///
    /// With `with_examples` the few-shot selector is built up front, which
    /// embeds the built-in corpus once (requires `OPENAI_API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Connection` if the database is unreachable and
    /// `ChatError::Config`/`ChatError::Embedding` if the selector cannot be
    /// built.
    pub async fn from_config(config: &Config, with_examples: bool) -> Result<Self> {
        let db = Database::connect(&config.db_url).await?;
        let llm = LlmClient::new(config.llm_model.clone(), config.llm_api_key.clone());
        let synthesizer = SqlSynthesizer::new()?;

        let selector = if with_examples {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                ChatError::Config(
                    "OPENAI_API_KEY environment variable required for example retrieval"
                        .to_string(),
                )
            })?;
            let embedder = Box::new(OpenAiEmbedder::new(
                api_key,
                config.embedding_model.clone(),
            ));
            Some(
                ExampleSelector::build(embedder, builtin_examples(), ExampleSelector::DEFAULT_K)
                    .await?,
            )
        } else {
            None
        };

        Ok(Self {
            db,
            llm,
            synthesizer,
            selector,
            schema: OnceCell::new(),
        })
    }

    /// Rendered schema text, introspected on first use and memoized for the
    /// life of the process.
    pub async fn schema_text(&self) -> Result<String> {
        let snapshot = self
            .schema
            .get_or_try_init(|| CatalogSnapshot::introspect(&self.db))
            .await?;
        Ok(snapshot.render())
    }

    /// Drop the memoized snapshot and introspect again.
    pub async fn refresh_schema(&mut self) -> Result<String> {
        self.schema = OnceCell::new();
        self.schema_text().await
    }

    /// Generate the guarded SQL for a question without executing it.
    ///
    /// # Errors
    ///
    /// Same failure modes as the first half of [`Pipeline::ask`].
    pub async fn generate_sql(&self, question: &str) -> Result<String> {
        let schema_text = self.schema_text().await?;
        let examples = self.examples_for(question).await?;
        self.synthesizer
            .synthesize(&self.llm, &schema_text, question, &examples)
            .await
    }

    /// Answer a natural-language question.
    ///
    /// Runs the full pipeline: schema text, optional example retrieval, SQL
    /// synthesis with the SELECT guard, execution, summarization.
    ///
    /// # Errors
    ///
    /// Any stage failure aborts the request; see the error taxonomy on
    /// [`ChatError`].
    pub async fn ask(&self, question: &str) -> Result<Exchange> {
        info!(question = %question, "handling question");

        let sql = self.generate_sql(question).await?;
        let table = self.db.run_select(&sql).await?;

        info!(rows = table.row_count(), "query returned");

        let answer = summarizer::summarize(&self.llm, question, &table).await?;

        Ok(Exchange {
            question: question.to_string(),
            sql,
            table,
            answer,
        })
    }

    /// Database handle, for callers that need direct access (CSV loading).
    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn examples_for(&self, question: &str) -> Result<Vec<ExamplePair>> {
        match &self.selector {
            Some(selector) => selector.select(question).await,
            None => Ok(Vec::new()),
        }
    }
}
