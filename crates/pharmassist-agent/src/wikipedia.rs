//! Wikipedia lookup over the MediaWiki action API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tools::KnowledgeTool;

pub const NO_RESULTS: &str = "No good Wikipedia Search Result was found";

/// Longest search string MediaWiki accepts
pub const MAX_QUERY_LENGTH: usize = 300;

const TOOL_NAME: &str = "wikipedia_search";
const TOOL_DESCRIPTION: &str = "Use this tool to perform Wikipedia searches for drug information.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikipediaConfig {
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_top_k")]
    pub top_k_results: usize,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_max_chars() -> usize {
    4000
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            top_k_results: default_top_k(),
            max_chars: default_max_chars(),
        }
    }
}

impl WikipediaConfig {
    pub fn api_url(&self) -> String {
        format!("https://{}.wikipedia.org/w/api.php", self.lang)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, PageExtract>,
}

#[derive(Debug, Deserialize)]
struct PageExtract {
    title: Option<String>,
    extract: Option<String>,
}

/// Search Wikipedia and return intro summaries of the top hits
pub struct WikipediaSearch {
    http_client: reqwest::Client,
    api_url: String,
    config: WikipediaConfig,
}

impl WikipediaSearch {
    pub fn new(config: WikipediaConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("pharmassist/", env!("CARGO_PKG_VERSION"))),
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_url: config.api_url(),
            config,
        })
    }

    /// Send requests to `api_url` instead of wikipedia.org
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>> {
        let limit = self.config.top_k_results.to_string();
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .context("Failed to send Wikipedia search request")?
            .error_for_status()
            .context("Wikipedia search failed")?;

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse Wikipedia search response")?;

        Ok(body
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    async fn page_extract(&self, title: &str) -> Result<Option<(String, String)>> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await
            .context("Failed to send Wikipedia extract request")?
            .error_for_status()
            .context("Wikipedia extract request failed")?;

        let body: ExtractResponse = response
            .json()
            .await
            .context("Failed to parse Wikipedia extract response")?;

        let page = body
            .query
            .and_then(|q| q.pages.into_values().next())
            .and_then(|page| match (page.title, page.extract) {
                (Some(title), Some(extract)) => Some((title, extract)),
                _ => None,
            });

        Ok(page)
    }
}

#[async_trait]
impl KnowledgeTool for WikipediaSearch {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    async fn invoke(&self, query: &str) -> Result<String> {
        let query: String = query.chars().take(MAX_QUERY_LENGTH).collect();
        let titles = self.search_titles(&query).await?;

        let mut summaries = Vec::new();
        for title in titles.iter().take(self.config.top_k_results) {
            // Pages that vanished between search and fetch are skipped
            if let Some((title, extract)) = self.page_extract(title).await? {
                summaries.push(format!("Page: {}\nSummary: {}", title, extract));
            }
        }

        tracing::debug!(query = %query, hits = titles.len(), pages = summaries.len(), "Wikipedia lookup");

        if summaries.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        Ok(summaries.join("\n\n").chars().take(self.config.max_chars).collect())
    }
}
