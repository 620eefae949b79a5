//! Encyclopedia summaries from Wikipedia

use async_trait::async_trait;
use serde::Deserialize;

use crate::agent::EncyclopediaProvider;
use crate::{Error, Result};

/// Response of the `MediaWiki` query API (`formatversion=2`)
#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<QueryPage>,
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
}

/// Fetches plain-text introductions of Wikipedia articles
pub struct WikipediaClient {
    client: reqwest::Client,
    endpoint: String,
}

impl WikipediaClient {
    /// Create a client for the given language edition (e.g. "en")
    ///
    /// `contact` is put in the User-Agent as Wikimedia's API policy asks.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(language: &str, contact: Option<&str>) -> Result<Self> {
        let user_agent = contact.map_or_else(
            || format!("Friday/{}", env!("CARGO_PKG_VERSION")),
            |c| format!("Friday/{} ({c})", env!("CARGO_PKG_VERSION")),
        );

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("https://{language}.wikipedia.org/w/api.php"),
        })
    }

    /// Fetch the introduction of the article titled `topic`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed
    pub async fn fetch_summary(&self, topic: &str) -> Result<Option<String>> {
        tracing::debug!(topic, "fetching Wikipedia summary");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", topic),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::Lookup(format!("Wikipedia returned {status}")));
        }

        let body = response.text().await?;
        parse_summary(&body)
    }
}

#[async_trait]
impl EncyclopediaProvider for WikipediaClient {
    async fn summarize(&self, topic: &str) -> Result<Option<String>> {
        self.fetch_summary(topic).await
    }
}

/// Extract the first page's introduction from a query API body
fn parse_summary(body: &str) -> Result<Option<String>> {
    let response: QueryResponse = serde_json::from_str(body)?;

    let summary = response
        .query
        .and_then(|q| q.pages.into_iter().next())
        .filter(|page| !page.missing && !page.invalid)
        .and_then(|page| page.extract)
        .map(|extract| extract.trim().to_string())
        .filter(|extract| !extract.is_empty());

    Ok(summary)
}
