use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::chat::suggestions::suggestions;
use crate::errors::AppError;
use crate::resume::loader::{candidate_report, CandidateStatus};
use crate::retrieval::Strategy;
use crate::state::AppState;

/// Body of `POST /api/ask`. Either key is accepted; anything that is not a
/// string counts as no question.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    pub question: Option<Value>,
    pub q: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AskQuery {
    pub q: Option<String>,
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub cwd: String,
    pub has_key: bool,
    pub resume_candidates: Vec<CandidateStatus>,
    pub fragments: usize,
    pub strategy: Strategy,
    pub embeddings_warm: bool,
}

/// GET|POST /api/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
    body: Option<Json<AskRequest>>,
) -> Result<Json<AskResponse>, AppError> {
    let question = extract_question(body.map(|Json(b)| b), query)?;
    let answer = state.assistant.answer(&question).await?;
    debug!(source = ?answer.source, "Answered question");
    Ok(Json(AskResponse {
        answer: answer.answer,
    }))
}

/// GET|POST /api/ask-stream
///
/// The whole answer is sent as a single server-sent event.
pub async fn handle_ask_stream(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
    body: Option<Json<AskRequest>>,
) -> Response {
    let result = match extract_question(body.map(|Json(b)| b), query) {
        Ok(question) => state.assistant.answer(&question).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(answer) => {
            debug!(source = ?answer.source, "Answered streamed question");
            sse_event(StatusCode::OK, json!({ "answer": answer.answer }))
        }
        Err(err) => {
            let (status, _, message) = err.parts();
            sse_event(status, json!({ "error": message }))
        }
    }
}

/// GET /api/suggest
pub async fn handle_suggest(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(suggestions(state.assistant.resume()))
}

/// GET /api/debug
pub async fn handle_debug(State(state): State<AppState>) -> Result<Json<DebugResponse>, AppError> {
    let cwd = std::env::current_dir().context("Cannot resolve working directory")?;
    let assistant = &state.assistant;
    Ok(Json(DebugResponse {
        cwd: cwd.display().to_string(),
        has_key: state.config.openai_api_key.is_some(),
        resume_candidates: candidate_report(&state.resume_candidates),
        fragments: assistant.fragments().len(),
        strategy: assistant.strategy(),
        embeddings_warm: assistant.embeddings_warm(),
    }))
}

/// First non-blank of body `question`, body `q`, query `question`, query `q`.
fn extract_question(body: Option<AskRequest>, query: AskQuery) -> Result<String, AppError> {
    let body = body.unwrap_or_default();
    let from_body = [body.question, body.q]
        .into_iter()
        .flatten()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        });

    from_body
        .chain(query.question)
        .chain(query.q)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Missing 'question'.".to_string()))
}

fn sse_event(status: StatusCode, payload: Value) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        format!("data: {payload}\n\n"),
    )
        .into_response()
}
