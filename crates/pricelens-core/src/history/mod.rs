//! Daily closing price history

mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::ProviderError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One trading day's close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDate, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Closing prices in ascending date order
///
/// Construction sorts the points and drops non-finite closes, so every
/// series a provider hands out is ordered and usable for min/max.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite());
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A source of daily closing prices
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Daily closes for `symbol` covering the `window` ending now
    ///
    /// Unknown symbols and empty windows yield an empty series; only
    /// transport and credential failures are errors.
    async fn history(&self, symbol: &str, window: Duration) -> Result<PriceSeries, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_series_is_sorted_and_finite() {
        let series = PriceSeries::new(vec![
            PricePoint::new(day(3), 120.0),
            PricePoint::new(day(1), 100.0),
            PricePoint::new(day(2), f64::NAN),
            PricePoint::new(day(4), f64::INFINITY),
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().timestamp, day(1));
        assert_eq!(series.last().unwrap().close, 120.0);
        assert_eq!(series.closes().collect::<Vec<_>>(), vec![100.0, 120.0]);
    }

    #[test]
    fn test_series_serializes_as_array() {
        let series: PriceSeries = [PricePoint::new(day(1), 10.5)].into_iter().collect();
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json, serde_json::json!([{ "timestamp": "2024-03-01", "close": 10.5 }]));
    }
}
