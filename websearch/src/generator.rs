//! Recommendation generator.
//!
//! Forwards web search snippets to an OpenAI-compatible chat completion and
//! parses the model's JSON reply into recommendation records.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::SearchHit;
use crate::error::{Result, WebSearchError};

const SYSTEM_PROMPT: &str = "You are a Work & Travel program expert. Based on the user's request \
and the provided web search results, generate up to 3 travel program recommendations. Format \
your response as a JSON list where each entry has the fields \"title\", \"location\", \
\"duration\", \"cost\", \"description\" (max 250 characters) and \"features\" (a list of short \
strings relevant to a work and travel experience). Ensure the output is ONLY the JSON list. If \
no suitable programs can be derived from the information, return an empty list []. Prioritize \
information from the web search snippets; where details are missing, make reasonable \
estimations or state 'Not specified'.";

/// A generated program recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Program title.
    pub title: String,

    /// Country/city, e.g. "USA, Los Angeles".
    #[serde(default)]
    pub location: String,

    /// Program duration, e.g. "3 months".
    #[serde(default)]
    pub duration: String,

    /// Cost with currency, e.g. "3000 USD".
    #[serde(default)]
    pub cost: String,

    /// Short program description.
    #[serde(default)]
    pub description: String,

    /// Short feature list.
    #[serde(default)]
    pub features: Vec<String>,
}

/// Chat-completion backed recommendation generator.
pub struct RecommendationGenerator {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl RecommendationGenerator {
    /// Create a generator with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Set the base URL (used to point tests at a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate recommendations for the prompt from the given search hits.
    pub async fn generate(
        &self,
        prompt: &str,
        hits: &[SearchHit],
    ) -> Result<Vec<Recommendation>> {
        let snippets = if hits.is_empty() {
            "No relevant search results found.".to_string()
        } else {
            hits.iter()
                .map(SearchHit::as_prompt_block)
                .collect::<Vec<_>>()
                .join("\n\n---\n\n")
        };

        let user_message =
            format!("User Request: \"{prompt}\"\n\nWeb Search Results (Snippets):\n{snippets}");

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_message },
            ],
            "temperature": 0.5,
            "max_tokens": 2500,
        });

        debug!("Requesting recommendations from {}", self.model);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(WebSearchError::GenerationApi(text));
        }

        let json: serde_json::Value = response.json().await?;
        let reply = json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                WebSearchError::GenerationApi("missing message content".to_string())
            })?;

        parse_reply(reply)
    }
}

/// Parse the model reply, stripping a markdown code fence if present.
fn parse_reply(reply: &str) -> Result<Vec<Recommendation>> {
    let mut text = reply.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped.strip_suffix("```").unwrap_or(stripped).trim();
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped.strip_suffix("```").unwrap_or(stripped).trim();
    }

    serde_json::from_str(text).map_err(|_| WebSearchError::UnparseableReply(reply.to_string()))
}
