//! Job Description Resolver — turns raw text, a URL, or a search query into job text.
//!
//! Network and search failures never propagate: they become descriptive strings
//! starting with [`ERROR_PREFIX`] so the rest of the pipeline can still run.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::config::{Config, DEFAULT_MAX_PAGE_BYTES};

pub mod fetch;
pub mod scrape;
pub mod search;

use fetch::{read_capped, send_with_retry, FetchError, RetryPolicy};
use scrape::{default_strategies, extract_page_text, ContentStrategy};
use search::{GoogleSearchClient, SearchProvider};

/// Every failed resolution's text starts with this prefix.
pub const ERROR_PREFIX: &str = "Error: ";
/// Returned when a search yields no results.
pub const NOT_FOUND: &str = "No job description found for the given query.";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobInput {
    RawText(String),
    Url(String),
    Query(String),
}

impl JobInput {
    /// Picks the input to resolve: URL first, then query, then raw text.
    /// Blank fields are ignored; `None` means there is nothing to resolve.
    pub fn from_fields(url: Option<&str>, query: Option<&str>, text: Option<&str>) -> Option<Self> {
        fn present(field: Option<&str>) -> Option<&str> {
            field.map(str::trim).filter(|s| !s.is_empty())
        }

        if let Some(url) = present(url) {
            return Some(JobInput::Url(url.to_string()));
        }
        if let Some(query) = present(query) {
            return Some(JobInput::Query(query.to_string()));
        }
        // Raw text is passed through untrimmed.
        text.filter(|t| !t.trim().is_empty())
            .map(|t| JobInput::RawText(t.to_string()))
    }

    pub fn source(&self) -> JobSource {
        match self {
            JobInput::RawText(_) => JobSource::Text,
            JobInput::Url(_) => JobSource::Url,
            JobInput::Query(_) => JobSource::Query,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    Text,
    Url,
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AcquisitionOutcome {
    /// Structured content was found.
    Resolved { strategy: String },
    /// Whole-page fallback or an empty search; the text may be thin or empty.
    Degraded { reason: String },
    /// A collaborator failed; `text` holds the error description.
    Failed { reason: String },
}

/// The job description text plus how it was obtained.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedJob {
    pub text: String,
    pub source: JobSource,
    pub outcome: AcquisitionOutcome,
}

impl ResolvedJob {
    fn resolved(source: JobSource, text: String, strategy: impl Into<String>) -> Self {
        Self {
            text,
            source,
            outcome: AcquisitionOutcome::Resolved {
                strategy: strategy.into(),
            },
        }
    }

    fn degraded(source: JobSource, text: String, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!("Job description acquisition degraded: {reason}");
        Self {
            text,
            source,
            outcome: AcquisitionOutcome::Degraded { reason },
        }
    }

    fn failed(source: JobSource, reason: String) -> Self {
        warn!("Job description acquisition failed: {reason}");
        Self {
            text: format!("{ERROR_PREFIX}{reason}"),
            source,
            outcome: AcquisitionOutcome::Failed { reason },
        }
    }

    /// Caller-supplied text is never a failure, whatever it starts with.
    pub fn is_failure(&self) -> bool {
        match self.outcome {
            AcquisitionOutcome::Failed { .. } => true,
            _ => self.source != JobSource::Text && self.text.starts_with(ERROR_PREFIX),
        }
    }

    /// Text to analyze. Failures and the not-found sentinel analyze as empty text,
    /// so an error message is never mistaken for job requirements.
    pub fn analysis_text(&self) -> &str {
        if self.is_failure() || (self.source == JobSource::Query && self.text == NOT_FOUND) {
            ""
        } else {
            &self.text
        }
    }

    /// A user-facing warning for degraded or failed acquisition.
    pub fn warning(&self) -> Option<String> {
        match &self.outcome {
            AcquisitionOutcome::Resolved { .. } => None,
            AcquisitionOutcome::Degraded { reason } => {
                Some(format!("Job description may be incomplete: {reason}"))
            }
            AcquisitionOutcome::Failed { reason } => {
                Some(format!("Job description could not be retrieved: {reason}"))
            }
        }
    }
}

pub struct JobDescriptionResolver {
    http: Client,
    search: Option<Arc<dyn SearchProvider>>,
    strategies: Vec<ContentStrategy>,
    retry: RetryPolicy,
    max_page_bytes: usize,
}

impl JobDescriptionResolver {
    pub fn new(http: Client, search: Option<Arc<dyn SearchProvider>>, retry: RetryPolicy) -> Self {
        Self {
            http,
            search,
            strategies: default_strategies(),
            retry,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
        }
    }

    /// Caps how much of a fetched page is read; the rest is dropped.
    pub fn with_max_page_bytes(mut self, max_page_bytes: usize) -> Self {
        self.max_page_bytes = max_page_bytes;
        self
    }

    /// Builds the resolver with a bounded-timeout HTTP client and, when
    /// credentials are configured, the Google search collaborator.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for job acquisition")?;
        let retry = RetryPolicy::new(config.http_max_retries);

        let search = config.search.clone().map(|credentials| {
            Arc::new(GoogleSearchClient::new(
                http.clone(),
                config.search_endpoint.clone(),
                credentials,
                retry,
            )) as Arc<dyn SearchProvider>
        });
        if search.is_none() {
            info!("Search credentials not configured; query resolution is disabled");
        }

        Ok(Self::new(http, search, retry).with_max_page_bytes(config.max_page_bytes))
    }

    pub async fn resolve(&self, input: &JobInput) -> ResolvedJob {
        match input {
            JobInput::RawText(text) => {
                ResolvedJob::resolved(JobSource::Text, text.clone(), "provided text")
            }
            JobInput::Url(url) => self.scrape(url).await,
            JobInput::Query(query) => self.search(query).await,
        }
    }

    async fn scrape(&self, raw_url: &str) -> ResolvedJob {
        let html = match self.fetch_html(raw_url).await {
            Ok(html) => html,
            Err(e) => {
                return ResolvedJob::failed(
                    JobSource::Url,
                    format!("could not fetch job page {raw_url}: {e}"),
                )
            }
        };

        let page = extract_page_text(&html, &self.strategies);
        info!(
            "Scraped {} chars from {} via {}",
            page.text.chars().count(),
            raw_url,
            page.strategy.as_deref().unwrap_or("nothing")
        );

        match (page.degraded, page.strategy) {
            (false, Some(strategy)) => ResolvedJob::resolved(JobSource::Url, page.text, strategy),
            (_, Some(_)) => ResolvedJob::degraded(
                JobSource::Url,
                page.text,
                "no job description container found; using the whole page text",
            ),
            (_, None) => ResolvedJob::degraded(
                JobSource::Url,
                page.text,
                "the page has no visible text",
            ),
        }
    }

    async fn fetch_html(&self, raw_url: &str) -> Result<String, FetchError> {
        let url = Url::parse(raw_url).map_err(|_| FetchError::InvalidUrl(raw_url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(raw_url.to_string()));
        }

        let response = send_with_retry(&self.retry, || self.http.get(url.clone())).await?;
        let body = read_capped(response, self.max_page_bytes).await?;
        if body.truncated {
            warn!(
                "Job page {raw_url} exceeds {} bytes; reading only the start of it",
                self.max_page_bytes
            );
        }
        Ok(String::from_utf8_lossy(&body.bytes).into_owned())
    }

    async fn search(&self, query: &str) -> ResolvedJob {
        let Some(provider) = &self.search else {
            return ResolvedJob::failed(
                JobSource::Query,
                "search is not configured (set SEARCH_API_KEY and SEARCH_ENGINE_ID)".to_string(),
            );
        };

        let items = match provider.search(query).await {
            Ok(items) => items,
            Err(e) => {
                return ResolvedJob::failed(JobSource::Query, format!("search for {query:?} failed: {e}"))
            }
        };

        let Some(first) = items.into_iter().next() else {
            return ResolvedJob::degraded(
                JobSource::Query,
                NOT_FOUND.to_string(),
                format!("search for {query:?} returned no results"),
            );
        };

        match first.snippet.filter(|s| !s.trim().is_empty()) {
            Some(snippet) => {
                let strategy = match first.link {
                    Some(link) => format!("search snippet ({link})"),
                    None => "search snippet".to_string(),
                };
                ResolvedJob::resolved(JobSource::Query, snippet, strategy)
            }
            None => ResolvedJob::degraded(
                JobSource::Query,
                NOT_FOUND.to_string(),
                format!(
                    "the first search result for {query:?} ({}) has no snippet",
                    first.title.as_deref().unwrap_or("untitled")
                ),
            ),
        }
    }
}
