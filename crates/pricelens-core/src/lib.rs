//! Retrieval-augmented stock price pipeline
//!
//! Answers "what is the current price of stock X?" by combining a web search
//! with a language-model summarization step, and optionally overlays the
//! 52-week high/low computed from a daily price history.
//!
//! - [`search`]: search backends ([`DuckDuckGoSearch`])
//! - [`prompts`]: pure prompt composition
//! - [`summarize`]: the language-model call
//! - [`history`]: price history backends ([`YahooFinanceClient`])
//! - [`analytics`]: range summary and trend chart
//! - [`engine`]: the [`QueryPipeline`] joining both branches
//!
//! # Example
//!
//! ```rust,ignore
//! use pricelens_core::{DuckDuckGoSearch, PipelineConfig, Query, QueryPipeline, YahooFinanceClient};
//! use pricelens_llm::providers::OpenAIProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = QueryPipeline::new(
//!         Arc::new(DuckDuckGoSearch::new()?),
//!         Arc::new(OpenAIProvider::from_env()?),
//!         Arc::new(YahooFinanceClient::new()),
//!         PipelineConfig::from_env()?,
//!     );
//!
//!     let result = pipeline.run(&Query::new("Infosys").with_symbol("INFY.NS")).await?;
//!     println!("{:?}", result.text_answer);
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod prompts;
pub mod search;
pub mod summarize;

// Re-export main types for convenience
pub use analytics::{RangeSummary, ReferenceLine, TrendChart, summarize_range};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use engine::{Query, QueryPipeline, QueryResult, RangeOutcome, TextAnswer};
pub use error::{PipelineError, ProviderError, ProviderKind, Result, ValidationError};
pub use history::{PriceHistoryProvider, PricePoint, PriceSeries, YahooFinanceClient};
pub use prompts::{Prompt, PromptComposer, compose};
pub use search::{DuckDuckGoSearch, SearchProvider, SearchResult};
pub use summarize::Summarizer;
