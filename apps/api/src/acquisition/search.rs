//! Web search collaborator used when the job description is given as a free-text query.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::acquisition::fetch::{send_with_retry, FetchError, RetryPolicy};
use crate::config::SearchCredentials;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("search response could not be decoded: {0}")]
    Decode(#[from] reqwest::Error),
}

/// One search hit. Only the snippet is used for resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

/// Ordered web search. Swap implementations without touching the resolver.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchItem>, SearchError>;
}

/// Google Programmable Search (Custom Search JSON API): an API key plus a
/// search-engine id scoping the search.
pub struct GoogleSearchClient {
    client: Client,
    endpoint: String,
    credentials: SearchCredentials,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

impl GoogleSearchClient {
    pub fn new(
        client: Client,
        endpoint: String,
        credentials: SearchCredentials,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            endpoint,
            credentials,
            retry,
        }
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchItem>, SearchError> {
        let response = send_with_retry(&self.retry, || {
            self.client.get(&self.endpoint).query(&[
                ("key", self.credentials.api_key.as_str()),
                ("cx", self.credentials.engine_id.as_str()),
                ("q", query),
            ])
        })
        .await?;

        let body: CustomSearchResponse = response.json().await?;
        debug!("Search for {:?} returned {} items", query, body.items.len());
        Ok(body.items)
    }
}
