// Résumé ingestion: locate the document, then normalize it into one canonical
// model. Both steps are fail-open; bad input degrades to empty fields.

pub mod loader;
pub mod models;
pub mod normalize;
