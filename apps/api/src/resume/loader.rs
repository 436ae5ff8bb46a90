//! Document Loader: finds and parses the résumé JSON.
//!
//! Fail-open: a missing or broken file never becomes an error. The caller gets
//! an empty object and the rest of the pipeline degrades to "no data".

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::resume::models::RawDocument;

/// Relative locations tried when no explicit path is configured. Covers running
/// from the repo root, from the frontend directory and from a functions dir.
const RELATIVE_CANDIDATES: &[&str] = &[
    "data/resume.json",
    "frontend/src/data/resume.json",
    "src/data/resume.json",
    "../frontend/src/data/resume.json",
];

#[derive(Debug, Clone, Serialize)]
pub struct CandidateStatus {
    pub path: PathBuf,
    pub exists: bool,
}

/// Builds the ordered candidate list: the override first, then the defaults
/// resolved against `base`.
pub fn candidate_paths(override_path: Option<&Path>, base: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(RELATIVE_CANDIDATES.len() + 1);
    if let Some(p) = override_path {
        candidates.push(p.to_path_buf());
    }
    candidates.extend(RELATIVE_CANDIDATES.iter().map(|rel| base.join(rel)));
    candidates
}

/// Returns the first candidate that exists and parses as JSON, or an empty
/// object when none does.
pub fn load_document(candidates: &[PathBuf], verbose: bool) -> RawDocument {
    for path in candidates {
        if !path.is_file() {
            continue;
        }

        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                warn!("Résumé read error at {}: {e}", path.display());
                continue;
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(doc) => {
                let keys = doc.as_object().map(|o| o.len()).unwrap_or(0);
                if verbose {
                    info!("Résumé loaded from {} ({keys} top-level keys)", path.display());
                } else {
                    debug!("Résumé loaded from {}", path.display());
                }
                return doc;
            }
            Err(e) => warn!("Résumé at {} is not valid JSON: {e}", path.display()),
        }
    }

    warn!("No résumé document found; continuing with an empty profile");
    Value::Object(Map::new())
}

/// Existence report for each candidate, used by the debug endpoint.
pub fn candidate_report(candidates: &[PathBuf]) -> Vec<CandidateStatus> {
    candidates
        .iter()
        .map(|p| CandidateStatus {
            path: p.clone(),
            exists: p.is_file(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_files_yield_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = candidate_paths(None, dir.path());
        let doc = load_document(&candidates, false);
        assert_eq!(doc, Value::Object(Map::new()));
    }

    #[test]
    fn test_first_valid_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/data")).unwrap();
        fs::write(dir.path().join("src/data/resume.json"), r#"{"name": "Second"}"#).unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/resume.json"), r#"{"name": "First"}"#).unwrap();

        let doc = load_document(&candidate_paths(None, dir.path()), false);
        assert_eq!(doc["name"], "First");
    }

    #[test]
    fn test_invalid_json_falls_through_to_next_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/resume.json"), "{ not json").unwrap();
        fs::create_dir_all(dir.path().join("src/data")).unwrap();
        fs::write(dir.path().join("src/data/resume.json"), r#"{"name": "Fallback"}"#).unwrap();

        let doc = load_document(&candidate_paths(None, dir.path()), false);
        assert_eq!(doc["name"], "Fallback");
    }

    #[test]
    fn test_override_path_is_tried_first() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("custom.json");
        fs::write(&custom, r#"{"name": "Override"}"#).unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/resume.json"), r#"{"name": "Default"}"#).unwrap();

        let candidates = candidate_paths(Some(&custom), dir.path());
        assert_eq!(candidates[0], custom);
        assert_eq!(load_document(&candidates, true)["name"], "Override");
    }

    #[test]
    fn test_candidate_report_marks_existence() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/resume.json"), "{}").unwrap();

        let report = candidate_report(&candidate_paths(None, dir.path()));
        assert_eq!(report.len(), RELATIVE_CANDIDATES.len());
        assert!(report[0].exists);
        assert!(report[1..].iter().all(|c| !c.exists));
    }
}
