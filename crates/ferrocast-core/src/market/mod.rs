//! Market data collaborator contract.
//!
//! The forecasting engine only ever consumes a [`PriceSeries`]; this module
//! defines how one is obtained. Implementations never panic into the caller:
//! every failure comes back as a [`SourceError`], and batch calls keep
//! per-symbol results instead of failing the whole batch.

mod csv_dir;
mod synthetic;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{PriceSeries, Symbol, UtcDateTime, ValidationError};

pub use csv_dir::CsvMarketData;
pub use synthetic::SyntheticMarketData;

/// Default watchlist (NSE large caps).
pub const POPULAR_SYMBOLS: [&str; 15] = [
    "SBIN",
    "RELIANCE",
    "INFY",
    "TCS",
    "HDFCBANK",
    "ICICIBANK",
    "ITC",
    "LT",
    "BHARTIARTL",
    "KOTAKBANK",
    "AXISBANK",
    "WIPRO",
    "MARUTI",
    "TATAMOTORS",
    "SUNPHARMA",
];

/// Collaborator error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    NotFound,
    Unsupported,
    InvalidRequest,
    Unavailable,
    Malformed,
}

/// Structured market data error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NotFound, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unsupported, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Malformed, message)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unsupported => "source.unsupported",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Malformed => "source.malformed",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::malformed(error.to_string())
    }
}

/// Latest close, session change and volume for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: Symbol,
    pub as_of: UtcDateTime,
    pub close: f64,
    pub change_pct: f64,
    pub volume: f64,
}

impl MarketSnapshot {
    /// Build a snapshot from the last two bars of a series.
    pub fn from_series(series: &PriceSeries) -> Result<Self, SourceError> {
        let bars = series.bars();
        let [.., previous, last] = bars else {
            return Err(SourceError::invalid_request(format!(
                "need at least two bars for '{}' to compute a change",
                series.symbol()
            )));
        };
        Ok(Self {
            symbol: series.symbol().clone(),
            as_of: last.ts,
            close: last.close,
            change_pct: last.change_pct(previous.close),
            volume: last.volume,
        })
    }
}

/// One listed option contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub strike: f64,
    pub last_price: f64,
    pub bid: f64,
    pub ask: f64,
    pub open_interest: u64,
}

/// Calls and puts for the nearest expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub symbol: Symbol,
    pub expiration: UtcDateTime,
    pub calls: Vec<OptionContract>,
    pub puts: Vec<OptionContract>,
}

/// Source of historical bars, market snapshots and option chains.
pub trait MarketDataSource: Send + Sync {
    /// Short identifier used in logs and CLI output.
    fn name(&self) -> &'static str;

    /// The most recent `days` daily bars for `symbol`, oldest first.
    fn price_series(&self, symbol: &Symbol, days: usize) -> Result<PriceSeries, SourceError>;

    /// Nearest-expiration option chain.
    fn option_chain(&self, symbol: &Symbol) -> Result<OptionChain, SourceError>;

    /// Snapshot per symbol. A failure for one symbol is kept in its slot.
    fn market_summary(
        &self,
        symbols: &[Symbol],
    ) -> BTreeMap<Symbol, Result<MarketSnapshot, SourceError>> {
        symbols
            .iter()
            .map(|symbol| {
                let snapshot = self
                    .price_series(symbol, 5)
                    .and_then(|series| MarketSnapshot::from_series(&series));
                if let Err(error) = &snapshot {
                    tracing::warn!(%symbol, %error, "market summary entry failed");
                }
                (symbol.clone(), snapshot)
            })
            .collect()
    }
}

/// Parse the default watchlist.
pub fn popular_symbols() -> Vec<Symbol> {
    POPULAR_SYMBOLS
        .iter()
        .filter_map(|raw| Symbol::parse(raw).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popular_symbols_all_parse() {
        assert_eq!(popular_symbols().len(), POPULAR_SYMBOLS.len());
    }

    #[test]
    fn error_display_includes_code() {
        let error = SourceError::not_found("no data for XYZ");
        assert_eq!(error.to_string(), "no data for XYZ (source.not_found)");
        assert_eq!(error.kind(), SourceErrorKind::NotFound);
    }
}
