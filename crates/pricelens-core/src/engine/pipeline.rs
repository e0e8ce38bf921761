//! Query orchestration
//!
//! A query runs two independent branches concurrently:
//!
//! - text: search, compose a prompt, summarize with the language model
//! - range: fetch price history and compute the 52-week high/low
//!
//! A failure in one branch is captured in its slot of the [`QueryResult`]
//! and never affects the other.

use super::{Query, QueryResult, RangeOutcome, TextAnswer};
use crate::analytics::summarize_range;
use crate::config::PipelineConfig;
use crate::error::{ProviderError, ProviderKind, ValidationError};
use crate::history::PriceHistoryProvider;
use crate::prompts::PromptComposer;
use crate::search::SearchProvider;
use crate::summarize::Summarizer;
use pricelens_llm::LLMProvider;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Runs queries against a search provider, a language model and a price
/// history provider
pub struct QueryPipeline {
    search: Arc<dyn SearchProvider>,
    history: Arc<dyn PriceHistoryProvider>,
    summarizer: Summarizer,
    composer: PromptComposer,
    config: PipelineConfig,
}

impl QueryPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        llm: Arc<dyn LLMProvider>,
        history: Arc<dyn PriceHistoryProvider>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            search,
            history,
            summarizer: Summarizer::new(llm, &config),
            composer: PromptComposer::new(config.max_search_chars),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Answer one query
    ///
    /// Only an empty stock name is an error, and it is reported before any
    /// provider is called. Past validation a [`QueryResult`] is always
    /// returned, whatever the providers do.
    pub async fn run(&self, query: &Query) -> Result<QueryResult, ValidationError> {
        query.validate()?;
        Ok(self.execute(Uuid::new_v4(), query).await)
    }

    #[instrument(
        name = "query",
        skip_all,
        fields(query_id = %query_id, stock_name = query.stock_name(), symbol = ?query.symbol())
    )]
    async fn execute(&self, query_id: Uuid, query: &Query) -> QueryResult {
        let (text_answer, range_summary) =
            tokio::join!(self.text_branch(query), self.range_branch(query.symbol()));

        if let Err(e) = &text_answer {
            warn!(error = %e, "Text answer failed");
        }

        QueryResult {
            query_id,
            text_answer,
            range_summary,
        }
    }

    async fn text_branch(&self, query: &Query) -> Result<TextAnswer, ProviderError> {
        let search_query = format!("{}{}", query.stock_name(), self.config.search_suffix);

        let result = with_timeout(
            ProviderKind::Search,
            self.config.search_timeout,
            self.search.search(&search_query),
        )
        .await?;

        let search_context_empty = self.composer.embeds_placeholder(&result);
        if search_context_empty {
            info!(search_query, "Search returned no results");
        }

        let prompt = self.composer.compose(query, &result);
        let answer = with_timeout(
            ProviderKind::LanguageModel,
            self.config.llm_timeout,
            self.summarizer.summarize(&prompt),
        )
        .await?;

        Ok(answer.with_empty_search_context(search_context_empty))
    }

    async fn range_branch(&self, symbol: Option<&str>) -> RangeOutcome {
        let Some(symbol) = symbol else {
            return RangeOutcome::NotRequested;
        };

        let history = with_timeout(
            ProviderKind::PriceHistory,
            self.config.history_timeout,
            self.history.history(symbol, self.config.lookback),
        )
        .await;

        match history {
            Ok(series) => match summarize_range(series) {
                Some(summary) => RangeOutcome::Ready(summary),
                None => {
                    info!(symbol, "No price history in window");
                    RangeOutcome::NoData
                }
            },
            Err(e) => {
                warn!(symbol, error = %e, "Price history failed");
                RangeOutcome::Failed(e)
            }
        }
    }
}

async fn with_timeout<T, F>(provider: ProviderKind, limit: Duration, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| ProviderError::timeout(provider, limit))?
}
