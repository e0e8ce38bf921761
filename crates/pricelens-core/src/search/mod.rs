//! Web search adapters
//!
//! The pipeline only needs one call: free-text query in, raw result text out.

mod duckduckgo;

pub use duckduckgo::DuckDuckGoSearch;

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Raw text returned by a search backend
///
/// Empty text is a legitimate "no results" outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub raw_text: String,
}

impl SearchResult {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }

    /// No usable text came back
    pub fn is_empty(&self) -> bool {
        self.raw_text.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.raw_text
    }
}

/// A web search backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one search, returning the backend's serialized hits
    async fn search(&self, query: &str) -> Result<SearchResult, ProviderError>;
}
