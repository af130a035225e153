// file: src/stocks/analysis.rs
// description: price history metrics: moving averages, YTD change, volatility, trend

use super::{PriceBar, PriceHistory};
use crate::error::{AppError, Result};
use chrono::{Datelike, TimeZone, Utc};
use serde::Serialize;

/// Trading days per year, used to annualize daily volatility.
const TRADING_DAYS: f64 = 252.0;

pub const TREND_UPWARD: &str = "Upward";
pub const TREND_DOWNWARD: &str = "Downward";
pub const TREND_NEUTRAL: &str = "Neutral";
pub const TREND_INSUFFICIENT: &str = "Insufficient data for trend analysis";

/// The metric block displayed for one ticker. Field names match the
/// rendered JSON blob.
#[derive(Debug, Clone, Serialize)]
pub struct StockAnalysis {
    pub ticker: String,
    pub current_price: f64,
    #[serde(rename = "52_week_high")]
    pub year_high: f64,
    #[serde(rename = "52_week_low")]
    pub year_low: f64,
    #[serde(rename = "50_day_ma")]
    pub ma_50: Option<f64>,
    #[serde(rename = "200_day_ma")]
    pub ma_200: Option<f64>,
    pub ytd_price_change: Option<f64>,
    pub ytd_percent_change: Option<f64>,
    pub trend: String,
    pub volatility: Option<f64>,
}

/// Compute the full metric block for a history.
///
/// # Errors
///
/// Returns [`AppError::NoHistoricalData`] when the history has no rows,
/// in which case the caller must not plot anything.
pub fn analyze(history: &PriceHistory) -> Result<StockAnalysis> {
    if history.is_empty() {
        return Err(AppError::NoHistoricalData);
    }

    let closes: Vec<f64> = history.bars.iter().map(|b| b.close).collect();
    let last_close = *closes.last().unwrap_or(&0.0);

    let current_price = history.market_price.unwrap_or(last_close);
    let year_high = history.bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let year_low = history.bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);

    let ma_50 = trailing_mean(&closes, 50);
    let ma_200 = trailing_mean(&closes, 200);
    let (ytd_price_change, ytd_percent_change) = match ytd_change(&history.bars) {
        Some((change, percent)) => (Some(change), Some(percent)),
        None => (None, None),
    };

    Ok(StockAnalysis {
        ticker: history.ticker.clone(),
        current_price,
        year_high,
        year_low,
        ma_50,
        ma_200,
        ytd_price_change,
        ytd_percent_change,
        trend: trend_label(ma_50, ma_200).to_string(),
        volatility: annualized_volatility(&closes),
    })
}

/// Mean of the last `window` values, or None when fewer values exist.
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Rolling trailing mean per index, None until the window fills. Used for
/// the chart overlay series.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| trailing_mean(&values[..=i], window))
        .collect()
}

/// Trend label from the 50 vs 200 day moving averages.
pub fn trend_label(ma_50: Option<f64>, ma_200: Option<f64>) -> &'static str {
    match (ma_50, ma_200) {
        (Some(short), Some(long)) if short > long => TREND_UPWARD,
        (Some(short), Some(long)) if short < long => TREND_DOWNWARD,
        (Some(_), Some(_)) => TREND_NEUTRAL,
        _ => TREND_INSUFFICIENT,
    }
}

/// Absolute and percent close change since the first bar on or after
/// January 1 of the final bar's year.
fn ytd_change(bars: &[PriceBar]) -> Option<(f64, f64)> {
    let last = bars.last()?;
    let year_start = Utc
        .with_ymd_and_hms(last.timestamp.year(), 1, 1, 0, 0, 0)
        .single()?;

    let first = bars.iter().find(|b| b.timestamp >= year_start)?;
    if first.close == 0.0 {
        return None;
    }

    let change = last.close - first.close;
    Some((change, change / first.close * 100.0))
}

/// Sample standard deviation of daily percent returns, annualized by √252.
/// Needs at least two returns (three closes) for the ddof=1 estimator.
fn annualized_volatility(closes: &[f64]) -> Option<f64> {
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some(variance.sqrt() * TRADING_DAYS.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    /// A year of daily bars with the given closes, ending today.
    fn synthetic_history(ticker: &str, closes: &[f64]) -> PriceHistory {
        let start = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
            })
            .collect();

        PriceHistory {
            ticker: ticker.to_string(),
            bars,
            market_price: None,
        }
    }

    #[test]
    fn empty_history_is_an_error() {
        let history = PriceHistory {
            ticker: "NONE".to_string(),
            bars: Vec::new(),
            market_price: None,
        };
        let err = analyze(&history).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No historical data available for the specified ticker."
        );
    }

    #[test]
    fn rising_prices_trend_upward() {
        // 250 strictly increasing closes: MA50 over the recent tail is
        // higher than MA200.
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64).collect();
        let analysis = analyze(&synthetic_history("UP", &closes)).expect("analysis");
        assert_eq!(analysis.trend, TREND_UPWARD);
    }

    #[test]
    fn falling_prices_trend_downward() {
        let closes: Vec<f64> = (0..250).map(|i| 400.0 - i as f64).collect();
        let analysis = analyze(&synthetic_history("DN", &closes)).expect("analysis");
        assert_eq!(analysis.trend, TREND_DOWNWARD);
    }

    #[test]
    fn flat_prices_trend_neutral() {
        let closes = vec![50.0; 250];
        let analysis = analyze(&synthetic_history("FLAT", &closes)).expect("analysis");
        assert_eq!(analysis.trend, TREND_NEUTRAL);
    }

    #[test]
    fn short_history_reports_insufficient_data() {
        let closes = vec![10.0; 60];
        let analysis = analyze(&synthetic_history("NEW", &closes)).expect("analysis");
        assert_eq!(analysis.ma_50, Some(10.0));
        assert_eq!(analysis.ma_200, None);
        assert_eq!(analysis.trend, TREND_INSUFFICIENT);
    }

    #[test]
    fn trend_label_comparisons() {
        assert_eq!(trend_label(Some(2.0), Some(1.0)), TREND_UPWARD);
        assert_eq!(trend_label(Some(1.0), Some(2.0)), TREND_DOWNWARD);
        assert_eq!(trend_label(Some(1.0), Some(1.0)), TREND_NEUTRAL);
        assert_eq!(trend_label(None, Some(1.0)), TREND_INSUFFICIENT);
        assert_eq!(trend_label(Some(1.0), None), TREND_INSUFFICIENT);
    }

    #[test]
    fn trailing_mean_window_semantics() {
        let values = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(trailing_mean(&values, 2), Some(3.5));
        assert_eq!(trailing_mean(&values, 4), Some(2.5));
        assert_eq!(trailing_mean(&values, 5), None);
        assert_eq!(trailing_mean(&values, 0), None);
    }

    #[test]
    fn rolling_mean_fills_after_window() {
        let values = vec![1.0, 2.0, 3.0];
        let rolled = rolling_mean(&values, 2);
        assert_eq!(rolled, vec![None, Some(1.5), Some(2.5)]);
    }

    #[test]
    fn flat_prices_have_zero_volatility() {
        let closes = vec![25.0; 10];
        let analysis = analyze(&synthetic_history("FLAT", &closes)).expect("analysis");
        assert_eq!(analysis.volatility, Some(0.0));
    }

    #[test]
    fn two_closes_have_no_volatility_estimate() {
        let analysis = analyze(&synthetic_history("TWO", &[10.0, 11.0])).expect("analysis");
        assert_eq!(analysis.volatility, None);
    }

    #[test]
    fn ytd_change_from_first_bar_of_year() {
        // All bars are within one calendar year, so YTD change spans the
        // whole series.
        let closes = vec![100.0, 105.0, 110.0];
        let analysis = analyze(&synthetic_history("YTD", &closes)).expect("analysis");
        assert_eq!(analysis.ytd_price_change, Some(10.0));
        assert_eq!(analysis.ytd_percent_change, Some(10.0));
    }

    #[test]
    fn year_extremes_from_high_low_columns() {
        let analysis = analyze(&synthetic_history("EXT", &[10.0, 30.0, 20.0])).expect("analysis");
        // Highs are close+1, lows are close-1 in the fixture.
        assert_eq!(analysis.year_high, 31.0);
        assert_eq!(analysis.year_low, 9.0);
    }

    #[test]
    fn current_price_prefers_provider_quote() {
        let mut history = synthetic_history("Q", &[10.0, 12.0]);
        history.market_price = Some(12.5);
        let analysis = analyze(&history).expect("analysis");
        assert_eq!(analysis.current_price, 12.5);

        history.market_price = None;
        let analysis = analyze(&history).expect("analysis");
        assert_eq!(analysis.current_price, 12.0);
    }

    #[test]
    fn json_blob_uses_original_key_names() {
        let analysis = analyze(&synthetic_history("KEYS", &[10.0, 11.0, 12.0])).expect("analysis");
        let json = serde_json::to_value(&analysis).expect("serialize");
        assert!(json.get("52_week_high").is_some());
        assert!(json.get("52_week_low").is_some());
        assert!(json.get("50_day_ma").is_some());
        assert!(json.get("200_day_ma").is_some());
        assert!(json.get("ytd_percent_change").is_some());
    }
}
