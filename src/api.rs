//! Remote metadata suggestions.
//!
//! One chat-completion request is made per file. The model is pinned and
//! sampled at low temperature so repeated runs over unchanged pages stay
//! reasonably stable.

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const COMPLETIONS_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f64 = 0.3;

const SYSTEM_PROMPT: &str = "You are an SEO assistant. Respond with a single JSON object with exactly \
these keys: title (max 60 characters), description (max 155 characters), ogTitle, ogDescription, \
keywords (a comma-separated string of at most 8 terms), canonical (a full URL, or null if unknown). \
Respond with raw JSON only: no markdown fences, no commentary.";

/// Metadata fields the model is asked to produce. Every field is optional;
/// a missing field simply skips the corresponding tag during patching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

/// Outcome of one suggestion request. A model reply that is not valid JSON
/// is recorded as [`Suggestion::Invalid`] rather than failing the run, so
/// the remaining files still get processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Suggestion {
    Invalid { error: String, raw: String },
    Fields(Metadata),
}

impl Suggestion {
    pub fn fields(&self) -> Option<&Metadata> {
        match self {
            Suggestion::Fields(meta) => Some(meta),
            Suggestion::Invalid { .. } => None,
        }
    }
}

/// Parses the model's message content into a [`Suggestion`].
pub fn parse_suggestion(content: &str) -> Suggestion {
    match serde_json::from_str::<Metadata>(content) {
        Ok(meta) => Suggestion::Fields(meta),
        Err(_) => Suggestion::Invalid {
            error: "Invalid JSON from model".to_string(),
            raw: content.to_string(),
        },
    }
}

/// Source of metadata suggestions. The production implementation talks to
/// the completion API; tests substitute a canned source.
#[allow(async_fn_in_trait)]
pub trait SuggestionSource {
    async fn suggest(&self, text: &str) -> Result<Suggestion>;
}

/// Completion-API backed suggestion source.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// Picks up the API key from the environment. A missing key is not an
    /// error until the first request is attempted.
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var(API_KEY_VAR).ok(),
        }
    }
}

impl SuggestionSource for OpenAiClient {
    async fn suggest(&self, text: &str) -> Result<Suggestion> {
        let api_key = self
            .api_key
            .as_deref()
            .with_context(|| format!("{API_KEY_VAR} is not set; it is required to request suggestions"))?;

        let body = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Suggest SEO metadata for a page with the following visible text:\n\n{text}"
                    ),
                },
            ],
            "temperature": TEMPERATURE,
        });

        debug!("Requesting suggestion for {} chars of text", text.len());

        let response = self
            .client
            .post(COMPLETIONS_ENDPOINT)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to reach the completion endpoint")?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .context("Failed to read the completion response body")?;

        if !status.is_success() {
            bail!("Completion request failed with status {status}: {raw}");
        }

        let payload: serde_json::Value =
            serde_json::from_str(&raw).context("Completion response was not valid JSON")?;
        let content = payload
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .context("Completion response had no message content")?;

        Ok(parse_suggestion(content))
    }
}
