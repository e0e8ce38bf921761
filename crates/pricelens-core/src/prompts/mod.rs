//! Prompt composition
//!
//! Turns a query and its search text into the system and user instructions
//! sent to the language model. Composition is pure: the same inputs always
//! produce byte-identical prompts.

mod builder;
mod system;

pub use builder::PromptBuilder;

use crate::engine::Query;
use crate::search::SearchResult;
use serde::{Deserialize, Serialize};

/// Embedded in place of search text when the search came back empty
pub const EMPTY_SEARCH_PLACEHOLDER: &str = "(no search results were returned)";

/// Fully rendered instructions for one summarization call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub system_instruction: String,
    pub user_instruction: String,
}

/// Composes prompts, optionally capping the embedded search text
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer {
    max_search_chars: Option<usize>,
}

impl PromptComposer {
    pub fn new(max_search_chars: Option<usize>) -> Self {
        Self { max_search_chars }
    }

    pub fn compose(&self, query: &Query, result: &SearchResult) -> Prompt {
        Prompt {
            system_instruction: system::price_extractor(),
            user_instruction: user_instruction(query.stock_name(), self.search_text(result)),
        }
    }

    /// The part of `result` that ends up in the prompt
    pub fn search_text<'a>(&self, result: &'a SearchResult) -> &'a str {
        match self.max_search_chars {
            Some(limit) => truncate_chars(result.as_str(), limit),
            None => result.as_str(),
        }
    }

    /// Whether the prompt for `result` falls back to the empty placeholder
    pub fn embeds_placeholder(&self, result: &SearchResult) -> bool {
        self.search_text(result).trim().is_empty()
    }
}

/// Compose with no cap on search text
pub fn compose(query: &Query, result: &SearchResult) -> Prompt {
    PromptComposer::default().compose(query, result)
}

fn user_instruction(stock_name: &str, search_text: &str) -> String {
    let has_results = !search_text.trim().is_empty();

    PromptBuilder::new()
        .text(format!("Here are the search results for '{stock_name}':"))
        .blank_line()
        .when_else(has_results, search_text, EMPTY_SEARCH_PLACEHOLDER)
        .blank_line()
        .text("Based on this, what is the current stock price?")
        .build()
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
