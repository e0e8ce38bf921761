//! Configuration for the query pipeline

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Suffix appended to the stock name to form the search query
pub const DEFAULT_SEARCH_SUFFIX: &str = " share price India";
/// Default summarization model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const SECS_PER_DAY: u64 = 24 * 60 * 60;
const ONE_YEAR: Duration = Duration::from_secs(365 * SECS_PER_DAY);

/// Configuration for a [`QueryPipeline`](crate::QueryPipeline)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Appended verbatim to the stock name before searching
    pub search_suffix: String,

    /// How far back the price history reaches
    pub lookback: Duration,

    /// Model identifier passed to the LLM provider
    pub model: String,

    /// Sampling temperature for summarization
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: usize,

    /// Per-call timeout for the search provider
    pub search_timeout: Duration,

    /// Per-call timeout for the language model
    pub llm_timeout: Duration,

    /// Per-call timeout for the price history provider
    pub history_timeout: Duration,

    /// Cap on search text embedded in the prompt, in chars.
    ///
    /// `None` embeds the text verbatim. When set, longer text is cut on a
    /// char boundary, so prompts built with different caps differ.
    pub max_search_chars: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_suffix: DEFAULT_SEARCH_SUFFIX.to_string(),
            lookback: ONE_YEAR,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 1024,
            search_timeout: Duration::from_secs(15),
            llm_timeout: Duration::from_secs(60),
            history_timeout: Duration::from_secs(20),
            max_search_chars: None,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Build configuration from `PRICELENS_*` environment variables
    ///
    /// Unset variables keep their defaults:
    /// `PRICELENS_MODEL`, `PRICELENS_TEMPERATURE`, `PRICELENS_MAX_TOKENS`,
    /// `PRICELENS_SEARCH_SUFFIX`, `PRICELENS_LOOKBACK_DAYS`,
    /// `PRICELENS_SEARCH_TIMEOUT_SECS`, `PRICELENS_LLM_TIMEOUT_SECS`,
    /// `PRICELENS_HISTORY_TIMEOUT_SECS`, `PRICELENS_MAX_SEARCH_CHARS`.
    pub fn from_env() -> Result<Self> {
        PipelineConfigBuilder::default().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(PipelineError::Config("model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(PipelineError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(PipelineError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.lookback.is_zero() {
            return Err(PipelineError::Config(
                "lookback must be greater than 0".to_string(),
            ));
        }

        if self.max_search_chars == Some(0) {
            return Err(PipelineError::Config(
                "max_search_chars must be greater than 0".to_string(),
            ));
        }

        for (name, timeout) in [
            ("search_timeout", self.search_timeout),
            ("llm_timeout", self.llm_timeout),
            ("history_timeout", self.history_timeout),
        ] {
            if timeout.is_zero() {
                return Err(PipelineError::Config(format!(
                    "{name} must be greater than 0"
                )));
            }
        }

        Ok(())
    }
}

/// Builder for PipelineConfig
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    search_suffix: Option<String>,
    lookback: Option<Duration>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    search_timeout: Option<Duration>,
    llm_timeout: Option<Duration>,
    history_timeout: Option<Duration>,
    max_search_chars: Option<usize>,
}

impl PipelineConfigBuilder {
    /// Set the search query suffix
    pub fn search_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.search_suffix = Some(suffix.into());
        self
    }

    /// Set the price history lookback window
    pub fn lookback(mut self, lookback: Duration) -> Self {
        self.lookback = Some(lookback);
        self
    }

    /// Set the summarization model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens to generate
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the search provider timeout
    pub fn search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = Some(timeout);
        self
    }

    /// Set the language model timeout
    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = Some(timeout);
        self
    }

    /// Set the price history timeout
    pub fn history_timeout(mut self, timeout: Duration) -> Self {
        self.history_timeout = Some(timeout);
        self
    }

    /// Cap the search text embedded in the prompt
    pub fn max_search_chars(mut self, max_chars: usize) -> Self {
        self.max_search_chars = Some(max_chars);
        self
    }

    /// Apply any `PRICELENS_*` variables present in the environment
    pub fn with_env(mut self) -> Result<Self> {
        use pricelens_utils::{parse_var, raw_var, var};

        if let Some(model) = var("PRICELENS_MODEL") {
            self.model = Some(model);
        }
        if let Some(suffix) = raw_var("PRICELENS_SEARCH_SUFFIX") {
            // Read raw: the leading space is significant.
            self.search_suffix = Some(suffix);
        }
        if let Some(temperature) = parse_var::<f32>("PRICELENS_TEMPERATURE")? {
            self.temperature = Some(temperature);
        }
        if let Some(max_tokens) = parse_var::<usize>("PRICELENS_MAX_TOKENS")? {
            self.max_tokens = Some(max_tokens);
        }
        if let Some(days) = parse_var::<u64>("PRICELENS_LOOKBACK_DAYS")? {
            let secs = days.checked_mul(SECS_PER_DAY).ok_or_else(|| {
                PipelineError::Config(format!("PRICELENS_LOOKBACK_DAYS is too large: {days}"))
            })?;
            self.lookback = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_var::<u64>("PRICELENS_SEARCH_TIMEOUT_SECS")? {
            self.search_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_var::<u64>("PRICELENS_LLM_TIMEOUT_SECS")? {
            self.llm_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_var::<u64>("PRICELENS_HISTORY_TIMEOUT_SECS")? {
            self.history_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(chars) = parse_var::<usize>("PRICELENS_MAX_SEARCH_CHARS")? {
            self.max_search_chars = Some(chars);
        }

        Ok(self)
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<PipelineConfig> {
        let defaults = PipelineConfig::default();

        let config = PipelineConfig {
            search_suffix: self.search_suffix.unwrap_or(defaults.search_suffix),
            lookback: self.lookback.unwrap_or(defaults.lookback),
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            search_timeout: self.search_timeout.unwrap_or(defaults.search_timeout),
            llm_timeout: self.llm_timeout.unwrap_or(defaults.llm_timeout),
            history_timeout: self.history_timeout.unwrap_or(defaults.history_timeout),
            max_search_chars: self.max_search_chars.or(defaults.max_search_chars),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.search_suffix, " share price India");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.lookback, Duration::from_secs(365 * 86_400));
        assert!(config.max_search_chars.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = PipelineConfig::builder()
            .model("gpt-4o-mini")
            .temperature(0.0)
            .llm_timeout(Duration::from_secs(5))
            .max_search_chars(2_000)
            .build()
            .unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.llm_timeout, Duration::from_secs(5));
        assert_eq!(config.max_search_chars, Some(2_000));
        assert_eq!(config.search_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(PipelineConfig::builder().temperature(2.5).build().is_err());
        assert!(PipelineConfig::builder().temperature(-0.1).build().is_err());
        assert!(PipelineConfig::builder().model("  ").build().is_err());
        assert!(PipelineConfig::builder().max_tokens(0).build().is_err());
        assert!(
            PipelineConfig::builder()
                .history_timeout(Duration::ZERO)
                .build()
                .is_err()
        );
        assert!(PipelineConfig::builder().lookback(Duration::ZERO).build().is_err());
        assert!(PipelineConfig::builder().max_search_chars(0).build().is_err());
    }

    #[test]
    fn test_with_env() {
        unsafe {
            std::env::set_var("PRICELENS_MODEL", "gemini-1.5-pro");
            std::env::set_var("PRICELENS_LOOKBACK_DAYS", "30");
            std::env::set_var("PRICELENS_MAX_SEARCH_CHARS", "500");
        }

        let config = PipelineConfig::builder().with_env().unwrap().build().unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.lookback, Duration::from_secs(30 * 86_400));
        assert_eq!(config.max_search_chars, Some(500));

        unsafe {
            std::env::set_var("PRICELENS_MAX_SEARCH_CHARS", "lots");
        }
        assert!(PipelineConfig::builder().with_env().is_err());

        unsafe {
            std::env::set_var("PRICELENS_MAX_SEARCH_CHARS", "500");
            std::env::set_var("PRICELENS_LOOKBACK_DAYS", &u64::MAX.to_string());
        }
        let err = PipelineConfig::builder().with_env().unwrap_err();
        assert!(matches!(err, PipelineError::Config(msg) if msg.contains("PRICELENS_LOOKBACK_DAYS")));

        unsafe {
            std::env::set_var("PRICELENS_LOOKBACK_DAYS", "30");
            std::env::set_var("PRICELENS_SEARCH_SUFFIX", " stock price NSE");
        }
        let config = PipelineConfig::builder().with_env().unwrap().build().unwrap();
        assert_eq!(config.search_suffix, " stock price NSE");

        unsafe {
            std::env::remove_var("PRICELENS_SEARCH_SUFFIX");
            std::env::remove_var("PRICELENS_MODEL");
            std::env::remove_var("PRICELENS_LOOKBACK_DAYS");
            std::env::remove_var("PRICELENS_MAX_SEARCH_CHARS");
        }
    }
}
