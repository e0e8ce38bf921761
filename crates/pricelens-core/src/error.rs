//! Error types for the query pipeline
//!
//! Three layers, matching how far each failure is allowed to travel:
//!
//! - [`ValidationError`]: bad input, returned by `run` before any provider call
//! - [`ProviderError`]: one provider call failed; captured inside its branch of
//!   the [`QueryResult`](crate::QueryResult), never raised to the caller
//! - [`PipelineError`]: construction-time failure (configuration, HTTP client)

use pricelens_llm::LLMError;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for pipeline construction
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Rejected query input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Stock name missing or whitespace only
    #[error("stock name must not be empty")]
    EmptyStockName,
}

/// Which external collaborator a [`ProviderError`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Search,
    LanguageModel,
    PriceHistory,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search provider"),
            Self::LanguageModel => write!(f, "language model"),
            Self::PriceHistory => write!(f, "price history provider"),
        }
    }
}

/// A single failed provider call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No answer within the per-call budget
    #[error("{provider} timed out after {timeout_ms} ms")]
    Timeout {
        provider: ProviderKind,
        timeout_ms: u64,
    },

    /// Credentials rejected
    #[error("{provider} rejected the credentials")]
    Authentication { provider: ProviderKind },

    /// Provider is throttling us
    #[error("{provider} rate limit exceeded: {detail}")]
    RateLimited {
        provider: ProviderKind,
        detail: String,
    },

    /// Transport failure or non-success status
    #[error("{provider} request failed: {detail}")]
    Request {
        provider: ProviderKind,
        detail: String,
    },

    /// Response arrived but could not be used
    #[error("{provider} returned an unexpected response: {detail}")]
    UnexpectedResponse {
        provider: ProviderKind,
        detail: String,
    },
}

impl ProviderError {
    /// Timeout after `limit`
    pub fn timeout(provider: ProviderKind, limit: Duration) -> Self {
        Self::Timeout {
            provider,
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Transport or status failure
    pub fn request(provider: ProviderKind, detail: impl fmt::Display) -> Self {
        Self::Request {
            provider,
            detail: detail.to_string(),
        }
    }

    /// Unusable response body
    pub fn unexpected(provider: ProviderKind, detail: impl fmt::Display) -> Self {
        Self::UnexpectedResponse {
            provider,
            detail: detail.to_string(),
        }
    }

    /// The provider this error came from
    pub fn provider(&self) -> ProviderKind {
        match self {
            Self::Timeout { provider, .. }
            | Self::Authentication { provider }
            | Self::RateLimited { provider, .. }
            | Self::Request { provider, .. }
            | Self::UnexpectedResponse { provider, .. } => *provider,
        }
    }

    /// Map a reqwest failure from `provider`
    ///
    /// A client-side timeout is reported as [`ProviderError::Timeout`] with
    /// `limit`, the timeout the client was configured with.
    pub fn from_reqwest(provider: ProviderKind, err: &reqwest::Error, limit: Duration) -> Self {
        if err.is_timeout() {
            return Self::timeout(provider, limit);
        }
        match err.status().map(|s| s.as_u16()) {
            Some(401 | 403) => Self::Authentication { provider },
            Some(429) => Self::RateLimited {
                provider,
                detail: err.to_string(),
            },
            _ => Self::request(provider, err),
        }
    }

    /// Map a language model failure; `limit` is the per-call budget
    pub fn from_llm(err: LLMError, limit: Duration) -> Self {
        let provider = ProviderKind::LanguageModel;
        match err {
            LLMError::Timeout(_) => Self::timeout(provider, limit),
            LLMError::HttpError(e) => Self::from_reqwest(provider, &e, limit),
            LLMError::AuthenticationFailed => Self::Authentication { provider },
            LLMError::RateLimitExceeded(detail) => Self::RateLimited { provider, detail },
            LLMError::UnexpectedResponse(detail) => Self::UnexpectedResponse { provider, detail },
            LLMError::SerializationError(e) => Self::unexpected(provider, e),
            other => Self::request(provider, other),
        }
    }
}

/// Failure while building the pipeline or one of its adapters
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider could not be constructed
    #[error("LLM provider error: {0}")]
    Llm(#[from] LLMError),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<pricelens_utils::EnvError> for PipelineError {
    fn from(err: pricelens_utils::EnvError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::timeout(ProviderKind::Search, Duration::from_secs(15));
        assert_eq!(err.to_string(), "search provider timed out after 15000 ms");

        let err = ProviderError::request(ProviderKind::PriceHistory, "connection reset");
        assert_eq!(
            err.to_string(),
            "price history provider request failed: connection reset"
        );

        assert_eq!(
            ValidationError::EmptyStockName.to_string(),
            "stock name must not be empty"
        );
    }

    #[test]
    fn test_provider_accessor() {
        let err = ProviderError::Authentication {
            provider: ProviderKind::LanguageModel,
        };
        assert_eq!(err.provider(), ProviderKind::LanguageModel);
        assert_eq!(
            ProviderError::unexpected(ProviderKind::Search, "x").provider(),
            ProviderKind::Search
        );
    }

    const LLM_LIMIT: Duration = Duration::from_secs(60);

    #[test]
    fn test_llm_error_conversion() {
        let err = ProviderError::from_llm(LLMError::AuthenticationFailed, LLM_LIMIT);
        assert_eq!(
            err,
            ProviderError::Authentication {
                provider: ProviderKind::LanguageModel
            }
        );

        let err = ProviderError::from_llm(LLMError::RateLimitExceeded("quota".to_string()), LLM_LIMIT);
        assert!(matches!(err, ProviderError::RateLimited { ref detail, .. } if detail == "quota"));

        let err = ProviderError::from_llm(LLMError::ModelNotFound("gemini-x".to_string()), LLM_LIMIT);
        match err {
            ProviderError::Request { provider, detail } => {
                assert_eq!(provider, ProviderKind::LanguageModel);
                assert!(detail.contains("gemini-x"));
            }
            other => panic!("Expected Request variant, got {other:?}"),
        }
    }

    #[test]
    fn test_llm_timeout_uses_configured_limit() {
        let err = ProviderError::from_llm(
            LLMError::Timeout("operation timed out".to_string()),
            LLM_LIMIT,
        );
        assert_eq!(
            err,
            ProviderError::Timeout {
                provider: ProviderKind::LanguageModel,
                timeout_ms: 60_000
            }
        );
    }

    #[tokio::test]
    async fn test_reqwest_timeout_is_a_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever answering
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let limit = Duration::from_millis(50);
        let reqwest_err = reqwest::Client::builder()
            .timeout(limit)
            .build()
            .unwrap()
            .get(format!("http://{addr}/"))
            .send()
            .await
            .unwrap_err();
        assert!(reqwest_err.is_timeout());

        assert_eq!(
            ProviderError::from_reqwest(ProviderKind::Search, &reqwest_err, limit),
            ProviderError::Timeout {
                provider: ProviderKind::Search,
                timeout_ms: 50
            }
        );
        assert_eq!(
            ProviderError::from_llm(LLMError::HttpError(reqwest_err), limit),
            ProviderError::Timeout {
                provider: ProviderKind::LanguageModel,
                timeout_ms: 50
            }
        );
        server.abort();
    }

    #[test]
    fn test_env_error_becomes_config_error() {
        let err: PipelineError =
            pricelens_utils::EnvError::Missing("PRICELENS_MODEL".to_string()).into();
        assert!(matches!(err, PipelineError::Config(msg) if msg.contains("PRICELENS_MODEL")));
    }
}
