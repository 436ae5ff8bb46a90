use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};

use crate::llm_client::{
    LlmSettings, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL,
};
use crate::retrieval::DEFAULT_TOP_K;

/// Application configuration loaded from environment variables.
/// Nothing is required: without an API key the service answers shortcuts only.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub enable_embeddings: bool,
    pub top_k: usize,
    pub chat_temperature: f32,
    pub llm_timeout_secs: u64,
    pub resume_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Config {
            openai_api_key: var("OPENAI_API_KEY"),
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            chat_model: var("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            embedding_model: var("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            enable_embeddings: parse_bool("ENABLE_EMBEDDINGS", var("ENABLE_EMBEDDINGS"), true)?,
            top_k: parse_or("TOP_K", var("TOP_K"), DEFAULT_TOP_K)?,
            chat_temperature: parse_or("CHAT_TEMPERATURE", var("CHAT_TEMPERATURE"), 0.25)?,
            llm_timeout_secs: parse_or("LLM_TIMEOUT_SECS", var("LLM_TIMEOUT_SECS"), 60)?,
            resume_path: var("RESUME_PATH").map(PathBuf::from),
            port: parse_or("PORT", var("PORT"), 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            debug: parse_bool("DEBUG", var("DEBUG"), false)?,
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            base_url: self.openai_base_url.clone(),
            api_key: self.openai_api_key.clone(),
            chat_model: self.chat_model.clone(),
            embedding_model: self.embedding_model.clone(),
            temperature: self.chat_temperature,
            timeout_secs: self.llm_timeout_secs,
        }
    }

    /// Embedding retrieval needs both the switch and a key.
    pub fn embeddings_available(&self) -> bool {
        self.enable_embeddings && self.openai_api_key.is_some()
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has invalid value '{raw}': {e}")),
    }
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} must be a boolean (true/false), got '{raw}'"),
    }
}
