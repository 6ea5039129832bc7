//! Train-and-forecast across many symbols in parallel.

use ferrocast_core::{ForecastConfig, PriceSeries, Symbol};
use rayon::prelude::*;
use serde::Serialize;

use crate::predictor::{Predictor, TrainReport};
use crate::ForecastError;

/// Forecast for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolForecast {
    pub report: TrainReport,
    pub last_close: f64,
    pub predictions: Vec<f64>,
}

/// Train an independent predictor per series and forecast `days` ahead.
///
/// Results keep input order. A failing symbol only fails its own slot.
pub fn forecast_batch(
    config: &ForecastConfig,
    series: &[PriceSeries],
    days: usize,
) -> Vec<(Symbol, Result<SymbolForecast, ForecastError>)> {
    series
        .par_iter()
        .map(|series| {
            let result = forecast_one(config, series, days);
            if let Err(error) = &result {
                tracing::warn!(symbol = %series.symbol(), %error, "forecast failed");
            }
            (series.symbol().clone(), result)
        })
        .collect()
}

fn forecast_one(
    config: &ForecastConfig,
    series: &PriceSeries,
    days: usize,
) -> Result<SymbolForecast, ForecastError> {
    let mut predictor = Predictor::new(config.clone())?;
    let report = predictor.train(series)?;
    let predictions = predictor.predict_next(series, days)?;
    let last_close = series.last().map(|bar| bar.close).unwrap_or_default();
    Ok(SymbolForecast {
        report,
        last_close,
        predictions,
    })
}
