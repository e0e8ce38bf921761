//! Query result types

use crate::analytics::RangeSummary;
use crate::error::ProviderError;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// The model's answer, passed through unmodified
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextAnswer {
    pub content: String,
    /// Answer was produced from an empty search result
    pub search_context_empty: bool,
}

impl TextAnswer {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            search_context_empty: false,
        }
    }

    pub fn with_empty_search_context(mut self, empty: bool) -> Self {
        self.search_context_empty = empty;
        self
    }
}

/// Outcome of the analytics branch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RangeOutcome {
    /// Query carried no symbol
    NotRequested,
    /// Provider returned an empty series
    NoData,
    Ready(RangeSummary),
    Failed(#[serde(serialize_with = "display")] ProviderError),
}

impl RangeOutcome {
    pub fn summary(&self) -> Option<&RangeSummary> {
        match self {
            Self::Ready(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Combined answer for one query
///
/// The two branches are independent: either may fail while the other
/// succeeds.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub query_id: Uuid,
    pub text_answer: Result<TextAnswer, ProviderError>,
    pub range_summary: RangeOutcome,
}

impl QueryResult {
    /// Both branches produced something usable
    pub fn is_complete(&self) -> bool {
        self.text_answer.is_ok()
            && matches!(self.range_summary, RangeOutcome::Ready(_) | RangeOutcome::NotRequested)
    }
}

fn display<S: Serializer>(error: &ProviderError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
