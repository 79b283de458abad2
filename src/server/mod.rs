//! Catalog server client
//!
//! This module provides the HTTP client for the kata catalog server:
//! - Suggestion requests against `GET /autocomplete?query=<q>`
//! - Navigation URL builders for the catalog pages a suggestion resolves to
//! - Base URL validation and request timeouts
//!
//! The query string is always percent-encoded before it is interpolated into
//! a URL, both for the suggestion request and for generated links.
//!
//! The underlying HTTP call is blocking; [`CatalogClient::autocomplete`]
//! moves it onto the tokio blocking pool so the interactive event loop is
//! never stalled by a slow server.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::{KatafindError, Result, ServerError};

/// Characters percent-encoded when a value is placed in a query string.
///
/// Unreserved characters (RFC 3986) pass through untouched.
const QUERY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One title match returned by the suggestion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleHit {
    /// Kata identifier, used to build the `/kata/<id>` link
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Kata title as stored in the catalog
    pub title: String,
}

/// Response body of `GET /autocomplete?query=<q>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    /// Katas whose title matches the query
    #[serde(default)]
    pub titles: Vec<TitleHit>,

    /// Topic names matching the query
    #[serde(default)]
    pub topics: Vec<String>,
}

impl SuggestionResponse {
    /// Check whether the response carries no suggestions at all
    ///
    /// # Returns
    /// * `bool` - True when both titles and topics are empty
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.topics.is_empty()
    }
}

/// Accept both numeric and string kata ids.
///
/// The catalog stores UUID strings but older deployments used integer row
/// ids; links are built from the textual form either way.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// HTTP client for the kata catalog server
///
/// Owns the base URL, the request timeout and a reusable agent with
/// connection pooling. Cloning is cheap; the agent is shared.
#[derive(Clone)]
pub struct CatalogClient {
    /// Normalized base URL, no trailing slash
    base_url: String,

    /// HTTP agent with the configured timeout
    agent: ureq::Agent,
}

impl CatalogClient {
    /// Create a new catalog client
    ///
    /// # Arguments
    /// * `config` - Server configuration (base URL, timeout)
    ///
    /// # Returns
    /// * `Result<Self>` - New client, or error for an unusable base URL
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ServerError::InvalidBaseUrl(config.base_url.clone()).into());
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        Ok(Self { base_url, agent })
    }

    /// Get the normalized base URL
    ///
    /// # Returns
    /// * `&str` - Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch suggestions for a query
    ///
    /// Runs the blocking request on the tokio blocking pool.
    ///
    /// # Arguments
    /// * `query` - Raw query text as typed by the user
    ///
    /// # Returns
    /// * `Result<SuggestionResponse>` - Parsed suggestions or error
    pub async fn autocomplete(&self, query: &str) -> Result<SuggestionResponse> {
        let client = self.clone();
        let query = query.to_string();
        tokio::task::spawn_blocking(move || client.autocomplete_blocking(&query))
            .await
            .map_err(|e| KatafindError::Generic(format!("Suggestion task failed: {e}")))?
    }

    /// Fetch suggestions for a query, blocking the current thread
    ///
    /// # Arguments
    /// * `query` - Raw query text as typed by the user
    ///
    /// # Returns
    /// * `Result<SuggestionResponse>` - Parsed suggestions or error
    pub fn autocomplete_blocking(&self, query: &str) -> Result<SuggestionResponse> {
        let url = format!(
            "{}/autocomplete?query={}",
            self.base_url,
            encode_component(query)
        );
        debug!(url = %url, "Requesting suggestions");

        let response = self.agent.get(&url).call().map_err(map_request_error)?;
        let suggestions: SuggestionResponse = response
            .into_json()
            .map_err(|e| ServerError::MalformedResponse(e.to_string()))?;

        debug!(
            titles = suggestions.titles.len(),
            topics = suggestions.topics.len(),
            "Received suggestions"
        );
        Ok(suggestions)
    }

    /// Probe the server with a lightweight request
    ///
    /// # Returns
    /// * `Result<()>` - Ok when the server answered with a success status
    pub async fn ping(&self) -> Result<()> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || {
            client
                .agent
                .head(&format!("{}/", client.base_url))
                .call()
                .map_err(map_request_error)?;
            Ok(())
        })
        .await
        .map_err(|e| KatafindError::Generic(format!("Ping task failed: {e}")))?
    }

    /// Build the full-text search URL for a query
    ///
    /// # Arguments
    /// * `query` - Raw query text
    ///
    /// # Returns
    /// * `String` - `<base>/?search=<encoded query>`
    pub fn search_url(&self, query: &str) -> String {
        format!("{}/?search={}", self.base_url, encode_component(query))
    }

    /// Build the kata page URL for an id
    ///
    /// # Arguments
    /// * `id` - Kata identifier
    ///
    /// # Returns
    /// * `String` - `<base>/kata/<encoded id>`
    pub fn kata_url(&self, id: &str) -> String {
        format!("{}/kata/{}", self.base_url, encode_component(id))
    }

    /// Build the topic filter URL for a topic name
    ///
    /// # Arguments
    /// * `topic` - Topic name
    ///
    /// # Returns
    /// * `String` - `<base>/?topic=<encoded topic>`
    pub fn topic_url(&self, topic: &str) -> String {
        format!("{}/?topic={}", self.base_url, encode_component(topic))
    }
}

/// Percent-encode a value for use in a URL component
fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE).to_string()
}

/// Map a ureq error into a [`ServerError`]
fn map_request_error(err: ureq::Error) -> ServerError {
    match err {
        ureq::Error::Status(code, _) => ServerError::BadStatus(code),
        ureq::Error::Transport(transport) => ServerError::RequestFailed(transport.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CatalogClient {
        CatalogClient::new(&ServerConfig {
            base_url: "http://localhost:5000".to_string(),
            ..ServerConfig::default()
        })
        .expect("valid config")
    }

    #[test]
    fn test_new_rejects_bad_scheme() {
        let config = ServerConfig {
            base_url: "localhost:5000".to_string(),
            ..ServerConfig::default()
        };
        assert!(CatalogClient::new(&config).is_err());
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let config = ServerConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..ServerConfig::default()
        };
        let client = CatalogClient::new(&config).expect("valid config");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("binary tree"), "binary%20tree");
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_component("c#"), "c%23");
        assert_eq!(encode_component("söka"), "s%C3%B6ka");
        assert_eq!(encode_component("plain-text_1.0~x"), "plain-text_1.0~x");
    }

    #[test]
    fn test_url_builders_encode_their_argument() {
        let client = test_client();
        assert_eq!(
            client.search_url("two words"),
            "http://localhost:5000/?search=two%20words"
        );
        assert_eq!(client.kata_url("42"), "http://localhost:5000/kata/42");
        assert_eq!(
            client.topic_url("Dynamic Programming"),
            "http://localhost:5000/?topic=Dynamic%20Programming"
        );
    }

    #[test]
    fn test_response_is_empty() {
        let empty = SuggestionResponse::default();
        assert!(empty.is_empty());

        let with_topic = SuggestionResponse {
            titles: Vec::new(),
            topics: vec!["graphs".to_string()],
        };
        assert!(!with_topic.is_empty());
    }

    #[test]
    fn test_deserialize_numeric_and_string_ids() {
        let body = r#"{
            "titles": [
                {"id": 1, "title": "Foo"},
                {"id": "b7c9", "title": "Bar"}
            ],
            "topics": []
        }"#;
        let parsed: SuggestionResponse = serde_json::from_str(body).expect("valid body");
        assert_eq!(parsed.titles[0].id, "1");
        assert_eq!(parsed.titles[1].id, "b7c9");
    }

    #[test]
    fn test_deserialize_missing_sections_default_empty() {
        let parsed: SuggestionResponse = serde_json::from_str("{}").expect("valid body");
        assert!(parsed.is_empty());
    }
}
