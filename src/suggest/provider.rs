//! Suggestion providers
//!
//! This module provides the trait and implementation for fetching suggestion
//! candidates. The remote provider asks the catalog server; tests and other
//! front ends can plug in their own source.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::Result;
use crate::server::{CatalogClient, SuggestionResponse};

/// Trait for providing suggestion candidates
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Get suggestions for a query
    ///
    /// # Arguments
    /// * `query` - Raw query text
    ///
    /// # Returns
    /// * `Result<SuggestionResponse>` - Matching titles and topics
    async fn suggest(&self, query: &str) -> Result<SuggestionResponse>;
}

/// Cache for the most recent query's response
///
/// Backspacing and retyping the same prefix within the TTL reuses the
/// previous answer instead of hitting the server again.
struct QueryCache {
    /// Query the cached response belongs to
    query: String,

    /// Cached response
    response: SuggestionResponse,

    /// When the cache was last updated
    last_fetch: Instant,
}

impl QueryCache {
    /// Check if the cache is still valid for a query
    fn is_valid(&self, query: &str, ttl: Duration) -> bool {
        self.query == query && self.last_fetch.elapsed() < ttl
    }
}

/// Catalog-backed suggestion provider with a short-lived cache
pub struct RemoteSuggestionProvider {
    /// Catalog server client
    client: CatalogClient,

    /// Most recent query cache
    cache: RwLock<Option<QueryCache>>,

    /// Time-to-live for the cache
    ttl: Duration,
}

impl RemoteSuggestionProvider {
    /// Default cache time-to-live
    const DEFAULT_TTL: Duration = Duration::from_secs(5);

    /// Create a new remote provider
    ///
    /// # Arguments
    /// * `client` - Catalog server client
    ///
    /// # Returns
    /// * `Self` - New provider
    pub fn new(client: CatalogClient) -> Self {
        Self::with_ttl(client, Self::DEFAULT_TTL)
    }

    /// Create a new remote provider with a custom cache TTL
    ///
    /// # Arguments
    /// * `client` - Catalog server client
    /// * `ttl` - Cache time-to-live
    ///
    /// # Returns
    /// * `Self` - New provider
    pub fn with_ttl(client: CatalogClient, ttl: Duration) -> Self {
        Self {
            client,
            cache: RwLock::new(None),
            ttl,
        }
    }

    /// Look up a cached response for a query
    fn cached(&self, query: &str) -> Option<SuggestionResponse> {
        let cache = self.cache.read().unwrap();
        cache
            .as_ref()
            .filter(|entry| entry.is_valid(query, self.ttl))
            .map(|entry| entry.response.clone())
    }

    /// Store a response in the cache
    fn store(&self, query: &str, response: &SuggestionResponse) {
        let mut cache = self.cache.write().unwrap();
        *cache = Some(QueryCache {
            query: query.to_string(),
            response: response.clone(),
            last_fetch: Instant::now(),
        });
    }
}

#[async_trait]
impl SuggestionProvider for RemoteSuggestionProvider {
    async fn suggest(&self, query: &str) -> Result<SuggestionResponse> {
        if let Some(hit) = self.cached(query) {
            return Ok(hit);
        }

        let response = self.client.autocomplete(query).await?;
        self.store(query, &response);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::server::TitleHit;

    fn sample_response() -> SuggestionResponse {
        SuggestionResponse {
            titles: vec![TitleHit {
                id: "1".to_string(),
                title: "Foo".to_string(),
            }],
            topics: Vec::new(),
        }
    }

    fn test_provider() -> RemoteSuggestionProvider {
        let client = CatalogClient::new(&ServerConfig::default()).expect("valid config");
        RemoteSuggestionProvider::new(client)
    }

    #[test]
    fn test_cache_hit_for_same_query() {
        let provider = test_provider();
        provider.store("fo", &sample_response());

        assert_eq!(provider.cached("fo"), Some(sample_response()));
    }

    #[test]
    fn test_cache_miss_for_other_query() {
        let provider = test_provider();
        provider.store("fo", &sample_response());

        assert_eq!(provider.cached("foo"), None);
    }

    #[test]
    fn test_cache_miss_after_ttl() {
        let client = CatalogClient::new(&ServerConfig::default()).expect("valid config");
        let provider = RemoteSuggestionProvider::with_ttl(client, Duration::from_secs(0));
        provider.store("fo", &sample_response());

        assert_eq!(provider.cached("fo"), None);
    }

    #[test]
    fn test_cache_starts_empty() {
        let provider = test_provider();
        assert_eq!(provider.cached("fo"), None);
    }

    #[test]
    fn test_suggest_served_from_cache() {
        // A cache hit answers without touching the network
        let provider = test_provider();
        provider.store("fo", &sample_response());

        let response = tokio_test::block_on(provider.suggest("fo")).expect("cached response");
        assert_eq!(response, sample_response());
    }
}
