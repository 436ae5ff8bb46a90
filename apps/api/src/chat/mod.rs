//! Question answering: deterministic shortcuts, retrieval-grounded
//! completion, and the HTTP handlers that expose them.

pub mod assistant;
pub mod handlers;
pub mod shortcuts;
pub mod suggestions;
