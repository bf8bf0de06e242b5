//! Few-shot example retrieval by embedding similarity.
//!
//! Example questions are embedded once at startup and indexed in an HNSW
//! graph; each request retrieves the k nearest pairs for the prompt.

pub mod builtin;

use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::types::{ChatError, Result};
use instant_distance::{Builder, HnswMap, Search};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use builtin::builtin_examples;

/// A (question, SQL) example pair shown to the model as few-shot context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamplePair {
    pub question: String,
    pub sql: String,
}

/// Embedded question vector used as an index point.
#[derive(Clone)]
struct QuestionPoint(Vec<f32>);

impl instant_distance::Point for QuestionPoint {
    // Cosine distance; embeddings from the API are not guaranteed unit-norm
    fn distance(&self, other: &Self) -> f32 {
        1.0 - cosine_similarity(&self.0, &other.0)
    }
}

/// Nearest-neighbor selector over a fixed example corpus.
pub struct ExampleSelector {
    embedder: Box<dyn EmbeddingProvider>,
    index: HnswMap<QuestionPoint, ExamplePair>,
    k: usize,
}

impl ExampleSelector {
    /// Number of examples retrieved per question by default.
    pub const DEFAULT_K: usize = 3;

    /// Embed every example question and build the index.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Embedding` if the corpus is empty, the batch
    /// embedding call fails, or the provider returns a short batch.
    pub async fn build(
        embedder: Box<dyn EmbeddingProvider>,
        examples: Vec<ExamplePair>,
        k: usize,
    ) -> Result<Self> {
        if examples.is_empty() {
            return Err(ChatError::Embedding(
                "cannot build example selector from an empty corpus".to_string(),
            ));
        }

        let questions: Vec<String> = examples.iter().map(|e| e.question.clone()).collect();
        let vectors = embedder.embed_batch(&questions).await?;
        if vectors.len() != examples.len() {
            return Err(ChatError::Embedding(format!(
                "embedded {} of {} example questions",
                vectors.len(),
                examples.len()
            )));
        }

        let corpus_size = examples.len();
        let points: Vec<QuestionPoint> = vectors.into_iter().map(QuestionPoint).collect();
        let index = Builder::default().build(points, examples);

        info!(examples = corpus_size, k, "example selector ready");

        Ok(Self { embedder, index, k })
    }

    /// Retrieve the k example pairs nearest to a question.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Embedding` if embedding the question fails.
    pub async fn select(&self, question: &str) -> Result<Vec<ExamplePair>> {
        let vector = self.embedder.embed(question).await?;
        let mut search = Search::default();

        Ok(self
            .index
            .search(&QuestionPoint(vector), &mut search)
            .take(self.k)
            .map(|item| item.value.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic embedder: maps known phrases onto fixed unit vectors.
    struct StubEmbedder;

    fn stub_vector(text: &str) -> Vec<f32> {
        match text {
            t if t.contains("customer") || t.contains("Customer") => vec![1.0, 0.0, 0.0],
            t if t.contains("invoice") || t.contains("Invoice") => vec![0.0, 1.0, 0.0],
            _ => vec![0.0, 0.0, 1.0],
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(stub_vector(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| stub_vector(t)).collect())
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn corpus() -> Vec<ExamplePair> {
        vec![
            ExamplePair {
                question: "List all customers".to_string(),
                sql: r#"SELECT * FROM "Customer" LIMIT 20;"#.to_string(),
            },
            ExamplePair {
                question: "Count total invoices".to_string(),
                sql: r#"SELECT COUNT(*) FROM "Invoice";"#.to_string(),
            },
            ExamplePair {
                question: "Top 5 best selling tracks".to_string(),
                sql: r#"SELECT "TrackId" FROM "InvoiceLine" LIMIT 5;"#.to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_select_returns_nearest_pair_first() {
        let selector = ExampleSelector::build(Box::new(StubEmbedder), corpus(), 2)
            .await
            .unwrap();

        let picked = selector.select("show me every customer").await.unwrap();

        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].question, "List all customers");
    }

    #[tokio::test]
    async fn test_select_caps_at_k() {
        let selector = ExampleSelector::build(Box::new(StubEmbedder), corpus(), 1)
            .await
            .unwrap();

        let picked = selector.select("invoices please").await.unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].question, "Count total invoices");
    }

    #[tokio::test]
    async fn test_build_rejects_empty_corpus() {
        let result = ExampleSelector::build(Box::new(StubEmbedder), Vec::new(), 3).await;
        assert!(result.is_err());
    }
}
