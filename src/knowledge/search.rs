//! Web search
//!
//! Answers "search google for ..." with the top result's snippet, via
//! Google Custom Search, Serper or Brave.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::WebSearchProvider;
use crate::{Error, Result};

/// Search provider configuration
#[derive(Debug, Clone)]
pub enum SearchProvider {
    /// Google Programmable Search (Custom Search JSON API)
    Google {
        /// API key for the Custom Search API
        api_key: String,
        /// Programmable search engine ID
        cse_id: String,
    },
    /// Serper (Google) Search API
    Serper {
        /// API key for Serper
        api_key: String,
    },
    /// Brave Search API
    Brave {
        /// API key for Brave Search
        api_key: String,
    },
}

impl SearchProvider {
    /// Provider name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Google { .. } => "google",
            Self::Serper { .. } => "serper",
            Self::Brave { .. } => "brave",
        }
    }
}

/// Search result from web search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Result URL
    pub url: String,
    /// Result snippet/description
    pub snippet: String,
}

/// Google Custom Search response
#[derive(Debug, Deserialize)]
struct GoogleSearchResponse {
    items: Option<Vec<GoogleResult>>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Brave Search API response
#[derive(Debug, Deserialize)]
struct BraveSearchResponse {
    web: Option<BraveWebResults>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResults {
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

/// Serper API response
#[derive(Debug, Deserialize)]
struct SerperSearchResponse {
    organic: Option<Vec<SerperResult>>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Serper API request body
#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    num: Option<usize>,
}

/// Web search tool
pub struct WebSearchTool {
    provider: SearchProvider,
    client: reqwest::Client,
}

impl WebSearchTool {
    /// Create a web search tool for a provider
    #[must_use]
    pub fn new(provider: SearchProvider) -> Self {
        Self {
            provider,
            client: reqwest::Client::new(),
        }
    }

    /// Perform a web search
    ///
    /// # Errors
    ///
    /// Returns error if the search request fails or response parsing fails
    pub async fn search_results(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        tracing::debug!(provider = self.provider.name(), query, "web search");

        match &self.provider {
            SearchProvider::Google { api_key, cse_id } => {
                self.search_google(api_key, cse_id, query, limit).await
            }
            SearchProvider::Serper { api_key } => self.search_serper(api_key, query, limit).await,
            SearchProvider::Brave { api_key } => self.search_brave(api_key, query, limit).await,
        }
    }

    /// Search using the Google Custom Search JSON API
    async fn search_google(
        &self,
        api_key: &str,
        cse_id: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        // The API caps `num` at 10
        let num = limit.unwrap_or(5).clamp(1, 10).to_string();

        let response = self
            .client
            .get("https://www.googleapis.com/customsearch/v1")
            .query(&[
                ("key", api_key),
                ("cx", cse_id),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let response = response.error_for_status().map_err(Error::Http)?;
        let body = response.text().await?;
        parse_google(&body)
    }

    /// Search using Brave Search API
    async fn search_brave(
        &self,
        api_key: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        let count = limit.unwrap_or(10).to_string();

        let response = self
            .client
            .get("https://api.search.brave.com/res/v1/web/search")
            .header("X-Subscription-Token", api_key)
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await?;

        let response = response.error_for_status().map_err(Error::Http)?;
        let body = response.text().await?;
        parse_brave(&body)
    }

    /// Search using Serper API
    async fn search_serper(
        &self,
        api_key: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        let request_body = SerperRequest { q: query, num: limit };

        let response = self
            .client
            .post("https://google.serper.dev/search")
            .header("X-API-KEY", api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let response = response.error_for_status().map_err(Error::Http)?;
        let body = response.text().await?;
        parse_serper(&body)
    }
}

#[async_trait]
impl WebSearchProvider for WebSearchTool {
    async fn search(&self, query: &str) -> Result<Option<String>> {
        let results = self.search_results(query, Some(3)).await?;
        Ok(top_snippet(results))
    }
}

/// Snippet of the first result that has one
fn top_snippet(results: Vec<SearchResult>) -> Option<String> {
    results
        .into_iter()
        .map(|r| r.snippet.trim().to_string())
        .find(|snippet| !snippet.is_empty())
}

fn parse_google(body: &str) -> Result<Vec<SearchResult>> {
    let response: GoogleSearchResponse = serde_json::from_str(body)?;

    Ok(response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|r| SearchResult {
            title: r.title,
            url: r.link,
            snippet: r.snippet,
        })
        .collect())
}

fn parse_brave(body: &str) -> Result<Vec<SearchResult>> {
    let response: BraveSearchResponse = serde_json::from_str(body)?;

    Ok(response
        .web
        .map(|web| {
            web.results
                .into_iter()
                .map(|r| SearchResult {
                    title: r.title,
                    url: r.url,
                    snippet: r.description,
                })
                .collect()
        })
        .unwrap_or_default())
}

fn parse_serper(body: &str) -> Result<Vec<SearchResult>> {
    let response: SerperSearchResponse = serde_json::from_str(body)?;

    Ok(response
        .organic
        .map(|organic| {
            organic
                .into_iter()
                .map(|r| SearchResult {
                    title: r.title,
                    url: r.link,
                    snippet: r.snippet,
                })
                .collect()
        })
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_provider() {
        let tool = WebSearchTool::new(SearchProvider::Google {
            api_key: "key".to_string(),
            cse_id: "cx".to_string(),
        });
        assert!(matches!(tool.provider, SearchProvider::Google { .. }));
        assert_eq!(tool.provider.name(), "google");

        let tool = WebSearchTool::new(SearchProvider::Brave {
            api_key: "test-key".to_string(),
        });
        assert_eq!(tool.provider.name(), "brave");
    }

    #[test]
    fn test_parse_google_items() {
        let body = r#"{"kind":"customsearch#search","items":[
            {"title":"Rust","link":"https://www.rust-lang.org","snippet":"A language empowering everyone."},
            {"title":"Other","link":"https://example.com","snippet":"Second"}
        ]}"#;
        let results = parse_google(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://www.rust-lang.org");
        assert_eq!(
            top_snippet(results).as_deref(),
            Some("A language empowering everyone.")
        );
    }

    #[test]
    fn test_parse_google_no_items() {
        let body = r#"{"kind":"customsearch#search","searchInformation":{"totalResults":"0"}}"#;
        let results = parse_google(body).unwrap();
        assert!(results.is_empty());
        assert_eq!(top_snippet(results), None);
    }

    #[test]
    fn test_parse_serper() {
        let body = r#"{"organic":[{"title":"Cats","link":"https://cats.example","snippet":"All about cats"}]}"#;
        let results = parse_serper(body).unwrap();
        assert_eq!(results[0].snippet, "All about cats");
    }

    #[test]
    fn test_parse_brave_without_web() {
        let body = r#"{"query":{"original":"cats"}}"#;
        assert!(parse_brave(body).unwrap().is_empty());
    }

    #[test]
    fn test_top_snippet_skips_blank() {
        let results = vec![
            SearchResult {
                title: "a".to_string(),
                url: "u".to_string(),
                snippet: "  ".to_string(),
            },
            SearchResult {
                title: "b".to_string(),
                url: "v".to_string(),
                snippet: "second".to_string(),
            },
        ];
        assert_eq!(top_snippet(results).as_deref(), Some("second"));
    }
}
