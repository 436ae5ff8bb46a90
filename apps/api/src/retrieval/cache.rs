//! Process-wide fragment embedding cache.
//!
//! Keyed by a fingerprint of the fragment set. The cell for the current key is
//! a single-assignment async cell: every concurrent caller awaits the same
//! in-flight embedding call, so a cold start issues exactly one batch request
//! no matter how many requests arrive together. A new fragment set swaps the
//! cell out, which is the only invalidation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::llm_client::{Embedder, LlmError};
use crate::retrieval::chunker::Fragment;

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedFragment {
    pub fragment: Fragment,
    pub embedding: Vec<f32>,
}

type EmbeddedSet = Arc<Vec<EmbeddedFragment>>;

struct Slot {
    key: u64,
    cell: Arc<OnceCell<EmbeddedSet>>,
}

#[derive(Default)]
pub struct EmbeddingCache {
    slot: Mutex<Option<Slot>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the embedded fragment set, computing it at most once per
    /// fragment set. A failed computation leaves the cell empty so the next
    /// caller tries again.
    pub async fn get_or_embed(
        &self,
        fragments: &[Fragment],
        embedder: &dyn Embedder,
    ) -> Result<EmbeddedSet, LlmError> {
        let cell = self.cell_for(fingerprint(fragments));

        let embedded = cell
            .get_or_try_init(|| async {
                info!("Embedding {} résumé fragments", fragments.len());
                let texts: Vec<String> = fragments.iter().map(|f| f.text.clone()).collect();
                let vectors = embedder.embed(&texts).await?;

                if vectors.len() != fragments.len() {
                    return Err(LlmError::DimensionMismatch {
                        expected: fragments.len(),
                        got: vectors.len(),
                    });
                }

                let set: Vec<EmbeddedFragment> = fragments
                    .iter()
                    .cloned()
                    .zip(vectors)
                    .map(|(fragment, embedding)| EmbeddedFragment {
                        fragment,
                        embedding,
                    })
                    .collect();
                Ok(Arc::new(set))
            })
            .await?;

        Ok(Arc::clone(embedded))
    }

    /// Whether a computed set is cached for exactly these fragments.
    pub fn is_warm(&self, fragments: &[Fragment]) -> bool {
        let key = fingerprint(fragments);
        self.slot
            .lock()
            .map(|slot| {
                slot.as_ref()
                    .is_some_and(|s| s.key == key && s.cell.initialized())
            })
            .unwrap_or(false)
    }

    fn cell_for(&self, key: u64) -> Arc<OnceCell<EmbeddedSet>> {
        // The lock only guards the swap; nobody awaits while holding it.
        let mut slot = match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match slot.as_ref() {
            Some(s) if s.key == key => Arc::clone(&s.cell),
            _ => {
                if slot.is_some() {
                    debug!("Fragment set changed; invalidating embedding cache");
                }
                let cell = Arc::new(OnceCell::new());
                *slot = Some(Slot {
                    key,
                    cell: Arc::clone(&cell),
                });
                cell
            }
        }
    }
}

fn fingerprint(fragments: &[Fragment]) -> u64 {
    let mut hasher = DefaultHasher::new();
    fragments.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;

    /// Embedder stub: one-hot-ish vectors derived from text length, a call
    /// counter, and an artificial delay so concurrent callers overlap.
    pub(crate) struct CountingEmbedder {
        pub calls: AtomicUsize,
        pub batch_calls: AtomicUsize,
        pub delay: Duration,
        pub fail_with: Option<fn() -> LlmError>,
    }

    impl CountingEmbedder {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                batch_calls: AtomicUsize::new(0),
                delay: Duration::from_millis(20),
                fail_with: None,
            }
        }

        pub(crate) fn failing(fail_with: fn() -> LlmError) -> Self {
            Self {
                fail_with: Some(fail_with),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if texts.len() > 1 {
                self.batch_calls.fetch_add(1, Ordering::SeqCst);
            }
            tokio::time::sleep(self.delay).await;
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            Ok(texts.iter().map(|t| text_vector(t)).collect())
        }
    }

    /// Cheap deterministic "embedding": counts of a few marker words.
    pub(crate) fn text_vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        ["rust", "python", "university", "project"]
            .iter()
            .map(|w| lower.matches(w).count() as f32)
            .collect()
    }

    fn fragments(texts: &[&str]) -> Vec<Fragment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Fragment {
                id: format!("f-{i}"),
                text: t.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_concurrent_cold_start_embeds_once() {
        let cache = EmbeddingCache::new();
        let embedder = CountingEmbedder::new();
        let set = fragments(&["Rust services", "Python notebooks"]);

        let (a, b) = tokio::join!(
            cache.get_or_embed(&set, &embedder),
            cache.get_or_embed(&set, &embedder)
        );

        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    }

    #[tokio::test]
    async fn test_warm_cache_skips_backend() {
        let cache = EmbeddingCache::new();
        let embedder = CountingEmbedder::new();
        let set = fragments(&["Rust services", "Python notebooks"]);

        assert!(!cache.is_warm(&set));
        cache.get_or_embed(&set, &embedder).await.unwrap();
        assert!(cache.is_warm(&set));
        cache.get_or_embed(&set, &embedder).await.unwrap();
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_changed_fragment_set_invalidates() {
        let cache = EmbeddingCache::new();
        let embedder = CountingEmbedder::new();
        let first = fragments(&["Rust services", "Python notebooks"]);
        let second = fragments(&["Rust services", "University of Somewhere"]);

        cache.get_or_embed(&first, &embedder).await.unwrap();
        let embedded = cache.get_or_embed(&second, &embedder).await.unwrap();

        assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
        assert_eq!(embedded[1].fragment.text, "University of Somewhere");
        assert!(!cache.is_warm(&first));
    }

    #[tokio::test]
    async fn test_failed_embedding_is_not_cached() {
        let cache = EmbeddingCache::new();
        let failing = CountingEmbedder::failing(|| LlmError::MissingApiKey);
        let set = fragments(&["Rust services", "Python notebooks"]);

        assert!(cache.get_or_embed(&set, &failing).await.is_err());
        assert!(!cache.is_warm(&set));

        let working = CountingEmbedder::new();
        let embedded = cache.get_or_embed(&set, &working).await.unwrap();
        assert_eq!(embedded.len(), 2);
        assert_eq!(embedded[0].embedding, text_vector("Rust services"));
    }
}
