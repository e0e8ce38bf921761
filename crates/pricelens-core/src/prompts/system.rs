//! System instruction for the summarization step

use super::PromptBuilder;

/// Persona for extracting a price from search text
pub fn price_extractor() -> String {
    PromptBuilder::new()
        .text(
            "You are a financial assistant that extracts the current Indian stock price \
             from the search results.",
        )
        .newline()
        .text(
            "If the results do not state an exact current price, report the most recent \
             price they mention and say that it may not be current.",
        )
        .newline()
        .text("Quote the price exactly as it appears in the results.")
        .build()
}
