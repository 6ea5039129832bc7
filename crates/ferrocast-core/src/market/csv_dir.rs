use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{MarketDataSource, OptionChain, SourceError};
use crate::{PriceBar, PriceSeries, Symbol, UtcDateTime};

/// Reads daily bars from `<dir>/<SYMBOL>.csv`.
///
/// Expected header: `timestamp,open,high,low,close,volume`. Timestamps may be
/// RFC3339 UTC or bare `YYYY-MM-DD` dates. Rows must already be in ascending
/// order.
#[derive(Debug, Clone)]
pub struct CsvMarketData {
    dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvBar {
    timestamp: UtcDateTime,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl CsvMarketData {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, symbol: &Symbol) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.as_str()))
    }
}

impl MarketDataSource for CsvMarketData {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn price_series(&self, symbol: &Symbol, days: usize) -> Result<PriceSeries, SourceError> {
        if days == 0 {
            return Err(SourceError::invalid_request("days must be greater than zero"));
        }

        let path = self.path_for(symbol);
        let mut reader = csv::Reader::from_path(&path).map_err(|error| {
            SourceError::not_found(format!("cannot open '{}': {error}", path.display()))
        })?;

        let mut bars = Vec::new();
        for (row, record) in reader.deserialize::<CsvBar>().enumerate() {
            let record = record.map_err(|error| {
                SourceError::malformed(format!("{}: row {}: {error}", path.display(), row + 1))
            })?;
            let bar = PriceBar::new(
                record.timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            )
            .map_err(|error| {
                SourceError::malformed(format!("{}: row {}: {error}", path.display(), row + 1))
            })?;
            bars.push(bar);
        }

        if bars.is_empty() {
            return Err(SourceError::not_found(format!(
                "'{}' contains no bars",
                path.display()
            )));
        }

        let series = PriceSeries::new(symbol.clone(), bars)?;
        tracing::debug!(%symbol, bars = series.len(), "loaded csv price history");
        Ok(series.tail(days))
    }

    fn option_chain(&self, symbol: &Symbol) -> Result<OptionChain, SourceError> {
        Err(SourceError::unsupported(format!(
            "csv source has no option chain for '{symbol}'"
        )))
    }
}
