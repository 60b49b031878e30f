//! Web search API client (Google Custom Search).

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, WebSearchError};

/// Number of search results requested per query.
const RESULT_COUNT: usize = 5;

/// One web search result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// Page title.
    pub title: String,

    /// Result snippet.
    #[serde(default)]
    pub snippet: String,

    /// Page URL.
    pub link: String,
}

impl SearchHit {
    /// Render the hit as a block for the generation prompt.
    pub fn as_prompt_block(&self) -> String {
        format!(
            "Title: {}\nSnippet: {}\nLink: {}",
            self.title, self.snippet, self.link
        )
    }
}

/// Google Custom Search client.
pub struct WebSearchClient {
    api_key: String,
    cx: String,
    base_url: String,
    client: reqwest::Client,
}

impl WebSearchClient {
    /// Create a client with the given API key and search engine id.
    pub fn new(api_key: impl Into<String>, cx: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            cx: cx.into(),
            base_url: "https://www.googleapis.com".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Set the base URL (used to point tests at a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Search the web for work & travel pages matching the prompt.
    pub async fn search(&self, prompt: &str) -> Result<Vec<SearchHit>> {
        let query = format!("{prompt} work and travel programs");
        let url = format!(
            "{}/customsearch/v1?key={}&cx={}&q={}&num={RESULT_COUNT}",
            self.base_url,
            self.api_key,
            self.cx,
            urlencoding::encode(&query)
        );

        debug!("Searching the web for: {query}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(WebSearchError::SearchApi(text));
        }

        let result: CustomSearchResponse = response.json().await?;
        debug!("Search returned {} item(s)", result.items.len());
        Ok(result.items)
    }
}

/// Google Custom Search response format.
#[derive(Debug, Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<SearchHit>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_parses_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("q", "ski season work and travel programs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    { "title": "Ski Jobs", "snippet": "Seasonal ski work.", "link": "https://example.com/ski" }
                ]
            })))
            .mount(&server)
            .await;

        let client = WebSearchClient::new("key", "cx").with_base_url(server.uri());
        let hits = client.search("ski season").await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Ski Jobs");
        assert_eq!(
            hits[0].as_prompt_block(),
            "Title: Ski Jobs\nSnippet: Seasonal ski work.\nLink: https://example.com/ski"
        );
    }

    #[tokio::test]
    async fn test_search_tolerates_missing_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = WebSearchClient::new("key", "cx").with_base_url(server.uri());
        let hits = client.search("anything").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_error_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = WebSearchClient::new("key", "cx").with_base_url(server.uri());
        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, WebSearchError::SearchApi(_)));
    }
}
