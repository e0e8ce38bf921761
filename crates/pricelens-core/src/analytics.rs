//! 52-week range analytics

use crate::history::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const HIGH_LABEL: &str = "52W High";
pub const LOW_LABEL: &str = "52W Low";

/// Highest and lowest close over a non-empty series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub high: f64,
    pub low: f64,
    pub series: PriceSeries,
}

/// A constant horizontal line drawn across the trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
}

/// Closing-price trend with the 52-week high and low marked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChart {
    pub points: Vec<(NaiveDate, f64)>,
    pub reference_lines: [ReferenceLine; 2],
}

impl RangeSummary {
    /// Package the series and both reference lines for rendering
    pub fn trend_chart(&self) -> TrendChart {
        TrendChart {
            points: self
                .series
                .points()
                .iter()
                .map(|p| (p.timestamp, p.close))
                .collect(),
            reference_lines: [
                ReferenceLine {
                    label: HIGH_LABEL.to_string(),
                    value: self.high,
                },
                ReferenceLine {
                    label: LOW_LABEL.to_string(),
                    value: self.low,
                },
            ],
        }
    }

    /// Most recent close in the window
    pub fn latest_close(&self) -> Option<f64> {
        self.series.last().map(|p| p.close)
    }
}

/// Compute the high/low range, or `None` for an empty series
pub fn summarize_range(series: PriceSeries) -> Option<RangeSummary> {
    let mut closes = series.closes();
    let first = closes.next()?;

    let (high, low) = closes.fold((first, first), |(high, low), close| {
        (high.max(close), low.min(close))
    });

    Some(RangeSummary { high, low, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::PricePoint;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, day)| PricePoint::new(day, close))
            .collect()
    }

    #[test]
    fn test_empty_series() {
        assert!(summarize_range(PriceSeries::empty()).is_none());
    }

    #[test]
    fn test_high_low() {
        let summary = summarize_range(series(&[100.0, 80.0, 120.0])).unwrap();
        assert_eq!(summary.high, 120.0);
        assert_eq!(summary.low, 80.0);
        assert_eq!(summary.latest_close(), Some(120.0));
    }

    #[test]
    fn test_single_point() {
        let summary = summarize_range(series(&[42.5])).unwrap();
        assert_eq!(summary.high, summary.low);
    }

    #[test]
    fn test_trend_chart() {
        let summary = summarize_range(series(&[1500.0, 1600.0, 1400.0])).unwrap();
        let chart = summary.trend_chart();

        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.points[1].1, 1600.0);
        assert_eq!(chart.reference_lines[0].label, "52W High");
        assert_eq!(chart.reference_lines[0].value, 1600.0);
        assert_eq!(chart.reference_lines[1].label, "52W Low");
        assert_eq!(chart.reference_lines[1].value, 1400.0);
    }
}
