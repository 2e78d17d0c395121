//! In-memory vector store with cosine-similarity retrieval.
//!
//! Small enough to live on the session: one resume produces a handful of
//! chunks, so brute-force nearest-neighbour search is the right tool.

use serde::{Deserialize, Serialize};

use crate::index::embeddings::Embedder;
use crate::llm_client::LlmError;

/// One indexed chunk: the text shown to the model plus its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A queryable semantic index over text chunks.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    chunks: Vec<IndexedChunk>,
}

impl VectorStore {
    /// Builds a store over the given chunks. Returns `None` when there is
    /// nothing to index (empty input or all-whitespace chunks).
    pub async fn build(
        texts: Vec<String>,
        embedder: &dyn Embedder,
    ) -> Result<Option<Self>, LlmError> {
        let texts: Vec<String> = texts
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .collect();
        if texts.is_empty() {
            return Ok(None);
        }

        let embeddings = embedder.embed(&texts).await?;
        let chunks = texts
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| IndexedChunk { text, embedding })
            .collect();

        Ok(Some(Self { chunks }))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embeds the query and returns the `k` most similar chunk texts.
    pub async fn query(
        &self,
        query: &str,
        k: usize,
        embedder: &dyn Embedder,
    ) -> Result<Vec<&str>, LlmError> {
        let query_embedding = embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyContent)?;
        Ok(self.top_k(&query_embedding, k))
    }

    /// Returns the `k` chunk texts most similar to `query`, best first.
    pub fn top_k(&self, query: &[f32], k: usize) -> Vec<&str> {
        let mut scored: Vec<(f32, &str)> = self
            .chunks
            .iter()
            .map(|c| (cosine_similarity(&c.embedding, query), c.text.as_str()))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().take(k).map(|(_, text)| text).collect()
    }
}

/// Cosine similarity of two vectors. Zero-magnitude or mismatched vectors
/// score 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
