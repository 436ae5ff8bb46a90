use std::sync::Arc;

use tracing::{debug, info};

use crate::chat::shortcuts;
use crate::errors::AppError;
use crate::llm_client::prompts::{system_prompt, user_prompt, NO_ANSWER};
use crate::llm_client::{Completer, LlmError};
use crate::resume::models::CanonicalResume;
use crate::retrieval::chunker::{chunk, Fragment};
use crate::retrieval::context::assemble;
use crate::retrieval::{Retrieval, Retriever, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Shortcut,
    Retrieval(Strategy),
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub answer: String,
    pub source: AnswerSource,
}

/// The grounding handed to the model for one question.
#[derive(Debug, Clone)]
pub struct BuiltContext {
    pub retrieval: Retrieval,
    pub context: String,
}

/// Answers questions about one résumé. The résumé and its fragments are fixed
/// at construction; the only mutable state lives in the retriever's cache.
pub struct Assistant {
    resume: Arc<CanonicalResume>,
    fragments: Arc<Vec<Fragment>>,
    retriever: Retriever,
    completer: Option<Arc<dyn Completer>>,
    system_prompt: String,
    top_k: usize,
}

impl Assistant {
    pub fn new(
        resume: CanonicalResume,
        retriever: Retriever,
        completer: Option<Arc<dyn Completer>>,
        top_k: usize,
    ) -> Self {
        let fragments = chunk(&resume);
        let system_prompt = system_prompt(resume.name.as_deref());
        info!(
            "Assistant ready: {} fragments, strategy {:?}, completion {}",
            fragments.len(),
            retriever.configured_strategy(),
            if completer.is_some() { "enabled" } else { "disabled" }
        );
        Self {
            resume: Arc::new(resume),
            fragments: Arc::new(fragments),
            retriever,
            completer,
            system_prompt,
            top_k,
        }
    }

    pub fn resume(&self) -> &CanonicalResume {
        &self.resume
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn strategy(&self) -> Strategy {
        self.retriever.configured_strategy()
    }

    pub fn embeddings_warm(&self) -> bool {
        self.retriever.is_warm(&self.fragments)
    }

    /// Shortcut first; otherwise retrieval-grounded completion.
    pub async fn answer(&self, question: &str) -> Result<Answer, AppError> {
        let question = question.trim();

        if let Some(answer) = shortcuts::route(question, &self.resume) {
            debug!("Shortcut answered question");
            return Ok(Answer {
                answer,
                source: AnswerSource::Shortcut,
            });
        }

        let completer = self.completer.as_ref().ok_or(LlmError::MissingApiKey)?;
        let built = self.build_context(question).await?;
        debug!(
            "Context built from {} fragments via {:?}",
            built.retrieval.fragments.len(),
            built.retrieval.strategy
        );

        let reply = completer
            .complete(&self.system_prompt, &user_prompt(&built.context, question))
            .await?;

        let answer = clean_answer(&reply);
        Ok(Answer {
            answer: if answer.is_empty() {
                NO_ANSWER.to_string()
            } else {
                answer
            },
            source: AnswerSource::Retrieval(built.retrieval.strategy),
        })
    }

    pub async fn build_context(&self, question: &str) -> Result<BuiltContext, LlmError> {
        let retrieval = self
            .retriever
            .retrieve(question, &self.fragments, self.top_k)
            .await?;
        let context = assemble(&retrieval.fragments);
        Ok(BuiltContext { retrieval, context })
    }
}

/// Strips markdown emphasis and code ticks the model sometimes emits anyway.
pub fn clean_answer(reply: &str) -> String {
    reply
        .replace("**", "")
        .replace(['*', '`'], "")
        .trim()
        .to_string()
}
