//! Relevance scoring for fragments against a question.
//!
//! Two strategies share one ranking rule: sort by score descending, keep the
//! original fragment order on ties (stable sort), truncate to `top_k`.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::retrieval::cache::EmbeddedFragment;
use crate::retrieval::chunker::Fragment;

/// A fragment scored against one question. Lives for one retrieval call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredFragment {
    pub fragment: Fragment,
    pub score: f32,
}

/// `dot(a, b) / (|a| * |b|)`. Zero when either vector has no magnitude or the
/// dimensions disagree.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (x as f64, y as f64);
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}

/// Lowercased alphanumeric tokens of the question, distinct, in order.
pub fn tokenize(question: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_string()))
        .map(String::from)
        .collect()
}

/// Lexical fallback: score = number of question tokens found as substrings of
/// the fragment text. Fragments scoring zero are dropped.
pub fn lexical_rank(question: &str, fragments: &[Fragment], top_k: usize) -> Vec<ScoredFragment> {
    let tokens = tokenize(question);
    if tokens.is_empty() {
        return Vec::new();
    }

    let scored = fragments
        .iter()
        .filter_map(|fragment| {
            let haystack = fragment.text.to_lowercase();
            let hits = tokens.iter().filter(|t| haystack.contains(t.as_str())).count();
            (hits > 0).then(|| ScoredFragment {
                fragment: fragment.clone(),
                score: hits as f32,
            })
        })
        .collect();

    rank(scored, top_k)
}

/// Embedding strategy: cosine similarity of each cached fragment vector with
/// the question vector.
pub fn embedding_rank(
    query: &[f32],
    embedded: &[EmbeddedFragment],
    top_k: usize,
) -> Vec<ScoredFragment> {
    let scored = embedded
        .iter()
        .map(|e| ScoredFragment {
            fragment: e.fragment.clone(),
            score: cosine_similarity(query, &e.embedding),
        })
        .collect();

    rank(scored, top_k)
}

fn rank(mut scored: Vec<ScoredFragment>, top_k: usize) -> Vec<ScoredFragment> {
    // sort_by is stable: equal scores keep chunking order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(id: &str, text: &str) -> Fragment {
        Fragment {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    fn embedded(id: &str, v: Vec<f32>) -> EmbeddedFragment {
        EmbeddedFragment {
            fragment: fragment(id, id),
            embedding: v,
        }
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        for v in [vec![1.0, 2.0, 3.0], vec![-0.3, 0.7], vec![1e-3, 5.0, -2.5, 0.0]] {
            let sim = cosine_similarity(&v, &v);
            assert!((sim - 1.0).abs() < 1e-6, "Similarity was {sim}");
        }
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_cosine_orthogonal_and_opposite() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_dimension_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_tokenize_lowercases_and_dedups() {
        assert_eq!(
            tokenize("What Rust projects? rust, SQL!"),
            vec!["what", "rust", "projects", "sql"]
        );
        assert!(tokenize("  ?! ").is_empty());
    }

    #[test]
    fn test_lexical_rank_excludes_zero_scores() {
        let fragments = vec![
            fragment("a", "Skills: Rust, SQL"),
            fragment("b", "Education: B.S. in History"),
            fragment("c", "Project: Rust CLI using SQL"),
        ];
        let ranked = lexical_rank("rust sql", &fragments, 6);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|s| s.score > 0.0));
        assert!(ranked.iter().all(|s| s.fragment.id != "b"));
    }

    #[test]
    fn test_lexical_rank_orders_by_score_then_source_order() {
        let fragments = vec![
            fragment("a", "rust"),
            fragment("b", "rust and kafka"),
            fragment("c", "kafka"),
        ];
        let ranked = lexical_rank("rust kafka", &fragments, 6);
        let ids: Vec<&str> = ranked.iter().map(|s| s.fragment.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_lexical_rank_respects_top_k() {
        let fragments: Vec<_> = (0..10)
            .map(|i| fragment(&format!("f{i}"), "rust"))
            .collect();
        assert_eq!(lexical_rank("rust", &fragments, 3).len(), 3);
        assert!(lexical_rank("rust", &fragments, 0).is_empty());
    }

    #[test]
    fn test_embedding_rank_sorted_and_truncated() {
        let items = vec![
            embedded("low", vec![0.0, 1.0]),
            embedded("high", vec![1.0, 0.0]),
            embedded("mid", vec![1.0, 1.0]),
            embedded("zero", vec![0.0, 0.0]),
        ];
        let ranked = embedding_rank(&[1.0, 0.0], &items, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].fragment.id, "high");
        assert_eq!(ranked[1].fragment.id, "mid");
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_embedding_rank_ties_keep_source_order() {
        let items = vec![
            embedded("first", vec![1.0, 0.0]),
            embedded("second", vec![2.0, 0.0]),
        ];
        let ranked = embedding_rank(&[1.0, 0.0], &items, 2);
        assert_eq!(ranked[0].fragment.id, "first");
        assert_eq!(ranked[1].fragment.id, "second");
    }
}
