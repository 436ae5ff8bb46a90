//! Retrieval: chunk the résumé, score fragments against a question, and
//! assemble the context window handed to answer synthesis.
//!
//! The embedding strategy is preferred when an embedder is configured. If the
//! backend turns out to be unavailable or misconfigured, retrieval falls back
//! to lexical scoring instead of failing the request. Transient backend
//! failures are returned to the caller untouched.

pub mod cache;
pub mod chunker;
pub mod context;
pub mod scoring;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::llm_client::{Embedder, LlmError};
use crate::retrieval::cache::EmbeddingCache;
use crate::retrieval::chunker::Fragment;
use crate::retrieval::scoring::{embedding_rank, lexical_rank, ScoredFragment};

pub const DEFAULT_TOP_K: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Embedding,
    Lexical,
}

#[derive(Debug, Clone)]
pub struct Retrieval {
    pub strategy: Strategy,
    pub fragments: Vec<ScoredFragment>,
}

pub struct Retriever {
    embedder: Option<Arc<dyn Embedder>>,
    cache: EmbeddingCache,
}

impl Retriever {
    pub fn new(embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self {
            embedder,
            cache: EmbeddingCache::new(),
        }
    }

    /// Lexical scoring only.
    #[cfg(test)]
    pub fn lexical() -> Self {
        Self::new(None)
    }

    pub fn configured_strategy(&self) -> Strategy {
        if self.embedder.is_some() {
            Strategy::Embedding
        } else {
            Strategy::Lexical
        }
    }

    /// Whether fragment embeddings for this set are already cached.
    pub fn is_warm(&self, fragments: &[Fragment]) -> bool {
        self.cache.is_warm(fragments)
    }

    /// Ranks `fragments` against `question`; at most `top_k` results, by
    /// non-increasing score.
    pub async fn retrieve(
        &self,
        question: &str,
        fragments: &[Fragment],
        top_k: usize,
    ) -> Result<Retrieval, LlmError> {
        let Some(embedder) = &self.embedder else {
            return Ok(self.lexical_retrieval(question, fragments, top_k));
        };

        if fragments.is_empty() || top_k == 0 {
            return Ok(Retrieval {
                strategy: Strategy::Embedding,
                fragments: Vec::new(),
            });
        }

        match self.embedding_retrieval(embedder.as_ref(), question, fragments, top_k).await {
            Ok(retrieval) => Ok(retrieval),
            Err(e) if e.is_transient() => Err(e),
            Err(e) => {
                warn!("Embedding backend unavailable ({e}); falling back to lexical scoring");
                Ok(self.lexical_retrieval(question, fragments, top_k))
            }
        }
    }

    async fn embedding_retrieval(
        &self,
        embedder: &dyn Embedder,
        question: &str,
        fragments: &[Fragment],
        top_k: usize,
    ) -> Result<Retrieval, LlmError> {
        let embedded = self.cache.get_or_embed(fragments, embedder).await?;

        let query = embedder
            .embed(&[question.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(LlmError::DimensionMismatch {
                expected: 1,
                got: 0,
            })?;

        let ranked = embedding_rank(&query, &embedded, top_k);
        debug!(
            "Embedding retrieval: {} of {} fragments, top score {:?}",
            ranked.len(),
            embedded.len(),
            ranked.first().map(|s| s.score)
        );

        Ok(Retrieval {
            strategy: Strategy::Embedding,
            fragments: ranked,
        })
    }

    fn lexical_retrieval(&self, question: &str, fragments: &[Fragment], top_k: usize) -> Retrieval {
        let ranked = lexical_rank(question, fragments, top_k);
        debug!(
            "Lexical retrieval: {} of {} fragments matched",
            ranked.len(),
            fragments.len()
        );
        Retrieval {
            strategy: Strategy::Lexical,
            fragments: ranked,
        }
    }
}
