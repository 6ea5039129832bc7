use ferrocast_core::{PriceSeries, Symbol};
use ferrocast_ml::{forecast_batch, ForecastError, SymbolForecast};
use serde::Serialize;

use crate::cli::ForecastArgs;
use crate::error::CliError;
use crate::metadata::ItemError;

use super::{parse_symbols, CommandResult, Context};

#[derive(Debug, Serialize)]
struct ForecastEntry {
    symbol: Symbol,
    last_close: f64,
    train_r2: f64,
    test_r2: f64,
    train_samples: usize,
    test_samples: usize,
    days: Vec<ForecastDay>,
}

#[derive(Debug, Serialize)]
struct ForecastDay {
    day: usize,
    close: f64,
    change_pct: f64,
}

#[derive(Debug, Serialize)]
struct ForecastResponseData {
    horizon_days: usize,
    forecasts: Vec<ForecastEntry>,
}

pub fn run(args: &ForecastArgs, context: &Context) -> Result<CommandResult, CliError> {
    let symbols = parse_symbols(&args.symbols)?;
    let horizon = args.days.unwrap_or(context.config.forecast.horizon_days);
    if horizon == 0 {
        return Err(ForecastError::InvalidHorizon.into());
    }

    let mut series: Vec<PriceSeries> = Vec::with_capacity(symbols.len());
    let mut errors = Vec::new();
    for symbol in &symbols {
        match context.source.price_series(symbol, args.history) {
            Ok(loaded) => series.push(loaded),
            Err(error) => errors.push(
                ItemError::new(error.code(), error.message()).for_symbol(symbol.as_str()),
            ),
        }
    }

    let mut forecasts = Vec::new();
    for (symbol, outcome) in forecast_batch(&context.config.forecast, &series, horizon) {
        match outcome {
            Ok(forecast) => forecasts.push(entry(symbol, forecast)),
            Err(error) => errors.push(
                ItemError::new(error.code(), error.to_string()).for_symbol(symbol.as_str()),
            ),
        }
    }

    let data = serde_json::to_value(ForecastResponseData {
        horizon_days: horizon,
        forecasts,
    })?;
    Ok(CommandResult::ok(data)
        .with_warning("forecasts feed on their own predictions; error grows with the horizon")
        .with_errors(errors))
}

fn entry(symbol: Symbol, forecast: SymbolForecast) -> ForecastEntry {
    let last_close = forecast.last_close;
    let days = forecast
        .predictions
        .iter()
        .enumerate()
        .map(|(index, &close)| ForecastDay {
            day: index + 1,
            close,
            change_pct: if last_close > 0.0 {
                (close - last_close) / last_close * 100.0
            } else {
                0.0
            },
        })
        .collect();

    ForecastEntry {
        symbol,
        last_close,
        train_r2: forecast.report.train_r2,
        test_r2: forecast.report.test_r2,
        train_samples: forecast.report.train_samples,
        test_samples: forecast.report.test_samples,
        days,
    }
}
