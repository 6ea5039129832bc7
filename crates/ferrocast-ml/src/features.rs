//! Technical-indicator feature engineering.
//!
//! Column order for a configuration with moving-average windows `w1..wn`:
//!
//! | Column | Meaning |
//! |--------|---------|
//! | `close` | close price of the bar |
//! | `volume` | traded volume of the bar |
//! | `sma_<w>` | simple moving average of close over `w` bars, one per window |
//! | `rsi` | mean gain / mean loss over `rsi_period` changes, scaled to [0, 100] |
//! | `macd` | EMA(`macd_fast`) minus EMA(`macd_slow`) of close |
//! | `volatility` | sample standard deviation of the last `volatility_window` returns |
//! | `return_1` | percentage change versus the previous close |
//!
//! A bar at index `i` yields a row only when `i >= lookback`, so a series of
//! `N` bars produces exactly `N - lookback` rows.

use ferrocast_core::{FeatureConfig, PriceSeries, UtcDateTime};
use serde::{Deserialize, Serialize};

use crate::ForecastError;

/// One feature vector, plus the next close when it is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub ts: UtcDateTime,
    pub values: Vec<f64>,
    /// Close of the following bar; `None` for the final bar of a series.
    pub label: Option<f64>,
}

/// Named indicator values for the most recent bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ts: UtcDateTime,
    pub close: f64,
    pub volume: f64,
    pub moving_averages: Vec<MovingAverage>,
    pub rsi: f64,
    pub macd: f64,
    pub volatility: f64,
    pub return_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverage {
    pub window: usize,
    pub value: f64,
}

/// Derives fixed-width feature vectors from a price series.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEngineer {
    config: FeatureConfig,
}

impl FeatureEngineer {
    pub fn new(config: FeatureConfig) -> Result<Self, ForecastError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn lookback(&self) -> usize {
        self.config.lookback()
    }

    pub fn width(&self) -> usize {
        self.config.width()
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![String::from("close"), String::from("volume")];
        names.extend(self.config.ma_windows.iter().map(|w| format!("sma_{w}")));
        names.extend(["rsi", "macd", "volatility", "return_1"].map(String::from));
        names
    }

    pub fn compute(&self, series: &PriceSeries) -> Result<Vec<FeatureRow>, ForecastError> {
        let lookback = self.lookback();
        let available = series.len();
        if available < lookback + 1 {
            return Err(ForecastError::InsufficientData {
                required: lookback + 1,
                available,
            });
        }

        let bars = series.bars();
        let closes = series.closes();
        let returns = simple_returns(&closes);
        let smas: Vec<Vec<f64>> = self
            .config
            .ma_windows
            .iter()
            .map(|&window| rolling_mean(&closes, window))
            .collect();
        let rsi = rolling_rsi(&closes, self.config.rsi_period);
        let ema_fast = ema(&closes, self.config.macd_fast);
        let ema_slow = ema(&closes, self.config.macd_slow);
        let volatility = rolling_std(&returns, self.config.volatility_window);

        let width = self.width();
        let rows = (lookback..available)
            .map(|i| {
                let mut values = Vec::with_capacity(width);
                values.push(closes[i]);
                values.push(bars[i].volume);
                values.extend(smas.iter().map(|sma| sma[i]));
                values.push(rsi[i]);
                values.push(ema_fast[i] - ema_slow[i]);
                values.push(volatility[i]);
                values.push(returns[i] * 100.0);
                FeatureRow {
                    ts: bars[i].ts,
                    values,
                    label: closes.get(i + 1).copied(),
                }
            })
            .collect::<Vec<_>>();

        tracing::trace!(
            symbol = %series.symbol(),
            rows = rows.len(),
            lookback,
            "computed feature rows"
        );
        Ok(rows)
    }

    /// Indicator values for the last bar of `series`.
    pub fn latest(&self, series: &PriceSeries) -> Result<IndicatorSnapshot, ForecastError> {
        let rows = self.compute(series)?;
        let row = rows.last().ok_or(ForecastError::InsufficientData {
            required: self.lookback() + 1,
            available: series.len(),
        })?;

        let windows = self.config.ma_windows.len();
        let tail = &row.values[2 + windows..];
        Ok(IndicatorSnapshot {
            ts: row.ts,
            close: row.values[0],
            volume: row.values[1],
            moving_averages: self
                .config
                .ma_windows
                .iter()
                .zip(&row.values[2..2 + windows])
                .map(|(&window, &value)| MovingAverage { window, value })
                .collect(),
            rsi: tail[0],
            macd: tail[1],
            volatility: tail[2],
            return_pct: tail[3],
        })
    }
}

/// `r[0] = 0`, `r[i] = close[i] / close[i-1] - 1`.
fn simple_returns(closes: &[f64]) -> Vec<f64> {
    let mut returns = vec![0.0; closes.len()];
    for i in 1..closes.len() {
        let previous = closes[i - 1];
        returns[i] = if previous == 0.0 {
            0.0
        } else {
            closes[i] / previous - 1.0
        };
    }
    returns
}

/// Trailing mean; entries before a full window are NaN.
fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out[i] = sum / window as f64;
        }
    }
    out
}

/// RSI from plain averages over the trailing `period` close-to-close changes.
fn rolling_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    for i in period..closes.len() {
        let (mut gains, mut losses) = (0.0, 0.0);
        for j in (i + 1 - period)..=i {
            let change = closes[j] - closes[j - 1];
            if change > 0.0 {
                gains += change;
            } else {
                losses -= change;
            }
        }
        let avg_gain = gains / period as f64;
        let avg_loss = losses / period as f64;
        out[i] = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
    }
    out
}

/// Exponential moving average seeded with the first value, alpha = 2 / (span + 1).
fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut current = match values.first() {
        Some(&first) => first,
        None => return out,
    };
    for &value in values {
        current = alpha * value + (1.0 - alpha) * current;
        out.push(current);
    }
    out
}

/// Sample standard deviation of `values[i-window+1..=i]`, skipping index 0
/// (which has no return).
fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in window..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance =
            slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        out[i] = variance.sqrt();
    }
    out
}
