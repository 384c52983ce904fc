use domain::{CompoundingView, ProjectionResult, TradingMetrics};
use serde::{Deserialize, Serialize};

use crate::history::HistorySeries;

pub const DEFAULT_STARTING_CAPITAL_USD: f64 = 400.0;
pub const DEFAULT_TARGET_CAPITAL_USD: f64 = 4_000_000.0;

/// Multiplier used for the synthetic target when the configured one does
/// not exceed the start value.
const FALLBACK_TARGET_MULTIPLIER: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundingConfig {
    pub start_capital_usd: f64,
    pub target_capital_usd: f64,
}

impl Default for CompoundingConfig {
    fn default() -> Self {
        Self {
            start_capital_usd: DEFAULT_STARTING_CAPITAL_USD,
            target_capital_usd: DEFAULT_TARGET_CAPITAL_USD,
        }
    }
}

/// Live values reported next to the history.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectionOverrides {
    pub current_value: Option<f64>,
    pub daily_delta: Option<f64>,
}

impl From<&TradingMetrics> for ProjectionOverrides {
    fn from(trading: &TradingMetrics) -> Self {
        Self {
            current_value: trading.total_value_usd,
            daily_delta: trading.daily_pnl,
        }
    }
}

/// Projects `series` onto progress from the start capital to the target.
///
/// The start value is the earliest entry's `total_value_usd`, except that a
/// value of exactly zero counts as missing and falls back to
/// `config.start_capital_usd`. A portfolio that genuinely started at zero is
/// therefore reported against the configured capital.
///
/// Daily delta prefers the latest entry's `daily_pnl` over the live
/// override whenever the series is non-empty.
pub fn project(
    series: &HistorySeries,
    overrides: ProjectionOverrides,
    config: &CompoundingConfig,
) -> ProjectionResult {
    let start_value = series
        .first()
        .and_then(|entry| entry.total_value_usd)
        .filter(|value| *value != 0.0 && !value.is_nan())
        .unwrap_or(config.start_capital_usd);

    let current_value = overrides
        .current_value
        .or_else(|| series.last().and_then(|entry| entry.total_value_usd))
        .unwrap_or(start_value);

    let target_value = if config.target_capital_usd > start_value {
        config.target_capital_usd
    } else {
        // saturate so a huge start never yields an infinite target
        (start_value * FALLBACK_TARGET_MULTIPLIER).clamp(f64::MIN, f64::MAX)
    };

    let daily_delta = match series.last() {
        Some(latest) => latest.daily_pnl.or(overrides.daily_delta),
        None => overrides.daily_delta,
    }
    .unwrap_or(0.0);

    let span = target_value - start_value;
    let denominator = if span == 0.0 { 1.0 } else { span };
    let ratio = (current_value - start_value) / denominator;

    ProjectionResult {
        start_value,
        current_value,
        daily_delta,
        target_value,
        progress: clamp_progress(ratio),
    }
}

fn clamp_progress(ratio: f64) -> f64 {
    if !ratio.is_finite() {
        return 0.0;
    }
    // also folds -0.0 into 0.0
    if ratio > 0.0 {
        ratio.min(1.0)
    } else {
        0.0
    }
}

pub fn compounding_view(series: &HistorySeries, projection: ProjectionResult) -> CompoundingView {
    CompoundingView {
        progress_percent: projection.progress_percent(),
        entries: series.len(),
        latest_timestamp: series.last().and_then(|entry| entry.timestamp.clone()),
        projection,
    }
}
