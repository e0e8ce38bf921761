//! Yahoo Finance price history

use super::{PriceHistoryProvider, PricePoint, PriceSeries};
use crate::error::{ProviderError, ProviderKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use yahoo_finance_api as yahoo;

const PROVIDER: ProviderKind = ProviderKind::PriceHistory;

/// Default HTTP timeout for one history request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Yahoo Finance API client
#[derive(Debug, Clone, Copy)]
pub struct YahooFinanceClient {
    request_timeout: Duration,
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// HTTP timeout applied by the underlying connector
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooFinanceClient {
    #[instrument(skip(self), fields(window_days = window.as_secs() / 86_400))]
    async fn history(&self, symbol: &str, window: Duration) -> Result<PriceSeries, ProviderError> {
        let provider = yahoo::YahooConnector::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ProviderError::request(PROVIDER, e))?;

        let end = Utc::now();
        let lookback = chrono::Duration::from_std(window)
            .map_err(|e| ProviderError::request(PROVIDER, format!("Invalid window: {e}")))?;
        let start = end - lookback;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| ProviderError::request(PROVIDER, format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| ProviderError::request(PROVIDER, format!("Invalid end timestamp: {e}")))?;

        let quotes = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .and_then(|response| response.quotes());

        let quotes = match quotes {
            Ok(quotes) => quotes,
            Err(e) => {
                return match classify(&e, self.request_timeout) {
                    Some(err) => Err(err),
                    None => {
                        info!(symbol, "No price history available");
                        Ok(PriceSeries::empty())
                    }
                };
            }
        };

        let series: PriceSeries = quotes
            .iter()
            .filter_map(|q| {
                DateTime::from_timestamp(q.timestamp, 0)
                    .map(|dt| PricePoint::new(dt.date_naive(), q.close))
            })
            .collect();

        debug!(points = series.len(), "Fetched price history");
        Ok(series)
    }
}

/// Map a Yahoo failure to a provider error
///
/// `None` means Yahoo has nothing for the symbol in the window: an unknown
/// ticker or an empty chart. Callers turn that into an empty series.
fn classify(err: &yahoo::YahooError, request_timeout: Duration) -> Option<ProviderError> {
    use yahoo::YahooError as E;

    let error = match err {
        E::NoResult | E::NoQuotes => return None,
        E::ApiError(message) if message.code.as_deref().is_some_and(is_not_found) => return None,
        E::FetchFailed(detail) if is_not_found(detail) => return None,
        E::ConnectionFailed(e) => ProviderError::from_reqwest(PROVIDER, e, request_timeout),
        E::TooManyRequests(detail) => ProviderError::RateLimited {
            provider: PROVIDER,
            detail: detail.clone(),
        },
        E::Unauthorized | E::InvalidCrumb | E::InvalidCookie | E::NoCookies => {
            ProviderError::Authentication { provider: PROVIDER }
        }
        E::DeserializeFailed(_)
        | E::DeserializeFailedDebug(_)
        | E::DataInconsistency
        | E::ApiError(_)
        | E::MissingField(_) => ProviderError::unexpected(PROVIDER, err),
        other => ProviderError::request(PROVIDER, other),
    };
    Some(error)
}

fn is_not_found(text: &str) -> bool {
    text.to_ascii_lowercase().contains("not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(err: &yahoo::YahooError) -> Option<ProviderError> {
        classify(err, DEFAULT_REQUEST_TIMEOUT)
    }

    fn api_error(code: &str) -> yahoo::YahooError {
        yahoo::YahooError::ApiError(
            serde_json::from_value(serde_json::json!({
                "code": code,
                "description": "No data found, symbol may be delisted",
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_missing_data_is_empty() {
        assert_eq!(classify_default(&yahoo::YahooError::NoResult), None);
        assert_eq!(classify_default(&yahoo::YahooError::NoQuotes), None);
        assert_eq!(classify_default(&api_error("Not Found")), None);
        assert_eq!(
            classify_default(&yahoo::YahooError::FetchFailed(
                "Ticker NOT-A-TICKER not found".to_string()
            )),
            None
        );
    }

    #[test]
    fn test_fetch_errors_other_than_not_found() {
        let err = classify_default(&yahoo::YahooError::FetchFailed("HTTP error: 500".to_string()));
        assert!(matches!(err, Some(ProviderError::Request { provider: PROVIDER, .. })));

        let err = classify_default(&api_error("Bad Request"));
        assert!(matches!(
            err,
            Some(ProviderError::UnexpectedResponse { provider: PROVIDER, .. })
        ));
    }

    #[test]
    fn test_rate_limit_with_404_in_url() {
        let err = classify_default(&yahoo::YahooError::TooManyRequests(
            "request url: https://query1.finance.yahoo.com/v8/finance/chart/2404.TW?period1=1716404400"
                .to_string(),
        ));
        match err {
            Some(ProviderError::RateLimited { provider, detail }) => {
                assert_eq!(provider, PROVIDER);
                assert!(detail.contains("2404.TW"));
            }
            other => panic!("Expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_auth_failures() {
        for err in [
            yahoo::YahooError::Unauthorized,
            yahoo::YahooError::InvalidCrumb,
            yahoo::YahooError::InvalidCookie,
        ] {
            assert_eq!(
                classify_default(&err),
                Some(ProviderError::Authentication { provider: PROVIDER })
            );
        }
    }

    #[test]
    fn test_unusable_responses() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        for err in [
            yahoo::YahooError::DeserializeFailed(json_err),
            yahoo::YahooError::DataInconsistency,
        ] {
            assert!(matches!(
                classify_default(&err),
                Some(ProviderError::UnexpectedResponse { provider: PROVIDER, .. })
            ));
        }
    }

    #[test]
    fn test_transport_failure_for_404_symbol_is_an_error() {
        let reqwest_err = reqwest::Client::new()
            .get("query1.finance.yahoo.com/v8/finance/chart/2404.TW?period1=1700000000")
            .build()
            .unwrap_err();
        let err = classify_default(&yahoo::YahooError::ConnectionFailed(reqwest_err));
        assert!(matches!(err, Some(ProviderError::Request { provider: PROVIDER, .. })));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_history_one_year() {
        let client = YahooFinanceClient::new();
        let series = client
            .history("INFY.NS", Duration::from_secs(365 * 86_400))
            .await
            .unwrap();

        assert!(series.len() > 200);
        assert!(series.first().unwrap().timestamp < series.last().unwrap().timestamp);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_unknown_symbol_is_empty() {
        let client = YahooFinanceClient::new();
        let series = client
            .history("NOT-A-REAL-TICKER-XYZ", Duration::from_secs(30 * 86_400))
            .await
            .unwrap();
        assert!(series.is_empty());
    }
}
