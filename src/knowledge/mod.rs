//! Knowledge lookups
//!
//! - **wikipedia**: encyclopedia summaries for "tell me about ..."
//! - **search**: web search snippets for "search google for ..."

mod search;
mod wikipedia;

use async_trait::async_trait;

pub use search::{SearchProvider, SearchResult, WebSearchTool};
pub use wikipedia::WikipediaClient;

use crate::agent::WebSearchProvider;
use crate::{Error, Result};

/// Stands in for web search when no provider credentials are configured
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchDisabled;

#[async_trait]
impl WebSearchProvider for SearchDisabled {
    async fn search(&self, _query: &str) -> Result<Option<String>> {
        Err(Error::Config(
            "web search requires GOOGLE_API_KEY and GOOGLE_CSE_ID, SERPER_API_KEY or BRAVE_API_KEY"
                .to_string(),
        ))
    }
}
