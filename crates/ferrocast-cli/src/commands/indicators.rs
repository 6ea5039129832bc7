use ferrocast_core::{PriceSeries, Symbol};
use ferrocast_ml::{FeatureEngineer, IndicatorSnapshot};
use serde::Serialize;

use crate::cli::IndicatorsArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct IndicatorsResponseData {
    symbol: Symbol,
    bars: usize,
    high: f64,
    low: f64,
    average_volume: f64,
    latest: IndicatorSnapshot,
}

pub fn run(args: &IndicatorsArgs, context: &Context) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let series = context.source.price_series(&symbol, args.history)?;
    let engineer = FeatureEngineer::new(context.config.forecast.features.clone())?;
    let latest = engineer.latest(&series)?;

    let (high, low, average_volume) = range_and_volume(&series);
    let data = serde_json::to_value(IndicatorsResponseData {
        symbol,
        bars: series.len(),
        high,
        low,
        average_volume,
        latest,
    })?;
    Ok(CommandResult::ok(data))
}

/// Highest close, lowest close and mean volume over the loaded history.
fn range_and_volume(series: &PriceSeries) -> (f64, f64, f64) {
    let bars = series.bars();
    let high = bars.iter().map(|bar| bar.close).fold(f64::MIN, f64::max);
    let low = bars.iter().map(|bar| bar.close).fold(f64::MAX, f64::min);
    let average_volume = if bars.is_empty() {
        0.0
    } else {
        bars.iter().map(|bar| bar.volume).sum::<f64>() / bars.len() as f64
    };
    (high, low, average_volume)
}
