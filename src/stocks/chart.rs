// file: src/stocks/chart.rs
// description: inline terminal chart for close price and moving averages

use super::analysis::rolling_mean;
use super::PriceHistory;

pub const DEFAULT_WIDTH: usize = 72;
pub const DEFAULT_HEIGHT: usize = 16;

const MARKER_CLOSE: char = '*';
const MARKER_MA_50: char = '+';
const MARKER_MA_200: char = 'x';

/// Render the close price with 50 and 200 day moving-average overlays as a
/// fixed-size character grid, newest bar at the right edge. Returns an
/// empty string for an empty history; the caller handles that case before
/// plotting.
pub fn render(history: &PriceHistory, width: usize, height: usize) -> String {
    if history.is_empty() || width < 2 || height < 2 {
        return String::new();
    }

    let closes: Vec<f64> = history.bars.iter().map(|b| b.close).collect();
    let ma_50 = rolling_mean(&closes, 50);
    let ma_200 = rolling_mean(&closes, 200);

    let (min, max) = value_range(&closes);
    let span = if max > min { max - min } else { 1.0 };

    let mut grid = vec![vec![' '; width]; height];

    // Close is plotted last so it wins contested cells.
    plot_series(&mut grid, &ma_200, min, span, MARKER_MA_200);
    plot_series(&mut grid, &ma_50, min, span, MARKER_MA_50);
    let close_points: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    plot_series(&mut grid, &close_points, min, span, MARKER_CLOSE);

    let mut out = String::new();
    out.push_str(&format!("{} Stock Price (Past Year)\n", history.ticker));

    let label_width = 10;
    for (row_idx, row) in grid.iter().enumerate() {
        let label = if row_idx == 0 {
            format!("{max:>9.2} ")
        } else if row_idx == height - 1 {
            format!("{min:>9.2} ")
        } else {
            " ".repeat(label_width)
        };
        out.push_str(&label);
        out.push('|');
        out.extend(row.iter());
        out.push('\n');
    }

    out.push_str(&" ".repeat(label_width));
    out.push_str(&"-".repeat(width + 1));
    out.push('\n');
    out.push_str(&format!(
        "{}  {} Close   {} 50-day MA   {} 200-day MA\n",
        " ".repeat(label_width),
        MARKER_CLOSE,
        MARKER_MA_50,
        MARKER_MA_200
    ));

    out
}

/// Downsample a value series across the grid width and stamp a marker per
/// column. Gaps (unfilled moving-average windows) leave the column blank.
fn plot_series(grid: &mut [Vec<char>], values: &[Option<f64>], min: f64, span: f64, marker: char) {
    let height = grid.len();
    let width = grid[0].len();
    let n = values.len();

    for col in 0..width {
        let idx = if width == 1 { 0 } else { col * (n - 1) / (width - 1) };
        let Some(value) = values[idx] else { continue };

        let normalized = ((value - min) / span).clamp(0.0, 1.0);
        let row = ((1.0 - normalized) * (height - 1) as f64).round() as usize;
        grid[row][col] = marker;
    }
}

fn value_range(closes: &[f64]) -> (f64, f64) {
    let min = closes.iter().copied().fold(f64::MAX, f64::min);
    let max = closes.iter().copied().fold(f64::MIN, f64::max);
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stocks::PriceBar;
    use chrono::{Duration, TimeZone, Utc};

    fn history(closes: &[f64]) -> PriceHistory {
        let start = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        PriceHistory {
            ticker: "TEST".to_string(),
            bars: closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PriceBar {
                    timestamp: start + Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                })
                .collect(),
            market_price: None,
        }
    }

    #[test]
    fn empty_history_renders_nothing() {
        let empty = PriceHistory {
            ticker: "NONE".to_string(),
            bars: Vec::new(),
            market_price: None,
        };
        assert_eq!(render(&empty, 40, 10), "");
    }

    #[test]
    fn chart_has_title_axis_and_legend() {
        let closes: Vec<f64> = (0..300).map(|i| 50.0 + (i as f64) * 0.1).collect();
        let chart = render(&history(&closes), 40, 10);
        assert!(chart.starts_with("TEST Stock Price (Past Year)"));
        assert!(chart.contains("Close"));
        assert!(chart.contains("50-day MA"));
        assert!(chart.contains("200-day MA"));
        assert!(chart.contains('*'));
    }

    #[test]
    fn overlays_appear_once_windows_fill() {
        let closes: Vec<f64> = (0..300).map(|i| 100.0 + (i % 7) as f64).collect();
        let chart = render(&history(&closes), 60, 12);
        assert!(chart.contains(MARKER_MA_50));
        assert!(chart.contains(MARKER_MA_200));
    }

    #[test]
    fn short_history_omits_unfilled_overlays() {
        let closes: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let chart = render(&history(&closes), 40, 10);
        assert!(chart.contains('*'));
        // 50 and 200 day windows never fill with 30 bars; the chars remain
        // only in the legend line.
        let body: String = chart
            .lines()
            .filter(|line| !line.contains("MA"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(!body.contains(MARKER_MA_50));
        assert!(!body.contains(MARKER_MA_200));
    }

    #[test]
    fn flat_series_does_not_divide_by_zero() {
        let closes = vec![42.0; 100];
        let chart = render(&history(&closes), 40, 8);
        assert!(chart.contains('*'));
    }

    #[test]
    fn grid_dimensions_match_request() {
        let closes: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let chart = render(&history(&closes), 30, 8);
        // title + 8 rows + axis + legend
        assert_eq!(chart.lines().count(), 11);
    }
}
