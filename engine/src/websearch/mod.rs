//! Web search collaborator
//!
//! The `/ai/websearch` route delegates to a [`SearchProvider`]. The default
//! provider queries a DuckDuckGo-compatible instant-answer endpoint
//! (`GET <endpoint>?q=<query>&format=json`) and returns its `AbstractText`.
//!
//! Network failures, non-success statuses and non-JSON bodies all surface as
//! `EngineError::Upstream`.

use async_trait::async_trait;
use reqwest::Client;
use sdk::errors::EngineError;
use serde::Deserialize;
use std::time::Duration;

use crate::config::WebSearchConfig;

/// Returned when the endpoint answers but has no abstract for the query
pub const NO_RESULTS: &str = "No relevant information found.";

/// Returned when web search is turned off in configuration
pub const SEARCH_DISABLED: &str = "Web search is disabled.";

/// Source of web search answers
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Short textual answer for `query`
    async fn search(&self, query: &str) -> Result<String, EngineError>;
}

/// Build the provider described by the configuration
pub fn from_config(config: &WebSearchConfig) -> Result<Box<dyn SearchProvider>, EngineError> {
    if config.enabled {
        Ok(Box::new(InstantAnswerSearch::new(
            &config.endpoint,
            Duration::from_secs(config.timeout_secs),
        )?))
    } else {
        Ok(Box::new(DisabledSearch))
    }
}

/// Instant-answer API client
#[derive(Debug, Clone)]
pub struct InstantAnswerSearch {
    endpoint: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
}

impl InstantAnswerSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl SearchProvider for InstantAnswerSearch {
    fn name(&self) -> &str {
        "instant-answer"
    }

    async fn search(&self, query: &str) -> Result<String, EngineError> {
        tracing::debug!("Web search request: endpoint={}, query={}", self.endpoint, query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Upstream("Web search timed out".to_string())
                } else if e.is_connect() {
                    EngineError::Upstream(format!(
                        "Cannot connect to search endpoint {}",
                        self.endpoint
                    ))
                } else {
                    EngineError::Upstream(format!("Web search request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Web search endpoint returned {}", status);
            return Err(EngineError::Upstream(format!(
                "Search endpoint returned status {}",
                status.as_u16()
            )));
        }

        let answer: InstantAnswer = response
            .json()
            .await
            .map_err(|e| EngineError::Upstream(format!("Invalid search response: {}", e)))?;

        let text = answer.abstract_text.trim();
        if text.is_empty() {
            Ok(NO_RESULTS.to_string())
        } else {
            Ok(text.to_string())
        }
    }
}

/// Provider used when web search is disabled
#[derive(Debug, Clone, Copy)]
pub struct DisabledSearch;

#[async_trait]
impl SearchProvider for DisabledSearch {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn search(&self, _query: &str) -> Result<String, EngineError> {
        Ok(SEARCH_DISABLED.to_string())
    }
}
