//! User query

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// One price lookup request
///
/// The symbol is optional; without one only the text answer is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    stock_name: String,
    symbol: Option<String>,
}

impl Query {
    pub fn new(stock_name: impl Into<String>) -> Self {
        Self {
            stock_name: stock_name.into(),
            symbol: None,
        }
    }

    /// Attach a ticker symbol. Blank symbols are dropped, others are
    /// trimmed and uppercased (`infy.ns` becomes `INFY.NS`).
    pub fn with_symbol(mut self, symbol: impl AsRef<str>) -> Self {
        let symbol = symbol.as_ref().trim();
        self.symbol = (!symbol.is_empty()).then(|| symbol.to_uppercase());
        self
    }

    /// Stock name with surrounding whitespace removed
    pub fn stock_name(&self) -> &str {
        self.stock_name.trim()
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Reject empty or whitespace-only stock names
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stock_name().is_empty() {
            return Err(ValidationError::EmptyStockName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Query::new("Infosys").validate().is_ok());
        assert_eq!(Query::new("").validate(), Err(ValidationError::EmptyStockName));
        assert_eq!(Query::new(" \t\n").validate(), Err(ValidationError::EmptyStockName));
    }

    #[test]
    fn test_symbol_normalization() {
        assert_eq!(Query::new("Infosys").with_symbol(" infy.ns ").symbol(), Some("INFY.NS"));
        assert_eq!(Query::new("Infosys").with_symbol("   ").symbol(), None);
        assert_eq!(Query::new("Infosys").symbol(), None);
    }

    #[test]
    fn test_stock_name_trimmed() {
        assert_eq!(Query::new("  Tata Motors ").stock_name(), "Tata Motors");
    }
}
