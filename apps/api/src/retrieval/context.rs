use crate::retrieval::scoring::ScoredFragment;

/// Renders ranked fragments as one `- ` bullet per fragment, in ranked order.
/// An empty input yields an empty string, meaning "no grounding available".
pub fn assemble(fragments: &[ScoredFragment]) -> String {
    fragments
        .iter()
        .map(|s| format!("- {}", s.fragment.text))
        .collect::<Vec<_>>()
        .join("\n")
}
