//! # Ferrocast Core
//!
//! Core contracts shared by the ferrocast forecasting and retrieval engines.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Explicit engine configuration (`EngineConfig`, YAML loading) |
//! | [`domain`] | Domain models (`Symbol`, `PriceBar`, `PriceSeries`, `Document`) |
//! | [`error`] | Core error types |
//! | [`market`] | Market data collaborator trait with synthetic and CSV sources |
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrocast_core::{MarketDataSource, Symbol, SyntheticMarketData, UtcDateTime};
//!
//! let anchor = UtcDateTime::parse("2024-06-28T00:00:00Z").unwrap();
//! let source = SyntheticMarketData::with_anchor(anchor);
//! let series = source.price_series(&Symbol::parse("SBIN").unwrap(), 365).unwrap();
//! assert_eq!(series.len(), 365);
//! ```
//!
//! ## Error Handling
//!
//! Domain construction returns [`ValidationError`]; configuration loading
//! returns [`CoreError`]; data sources return [`SourceError`] whose
//! [`SourceErrorKind`] callers can match on.

pub mod config;
pub mod domain;
pub mod error;
pub mod market;

pub use config::{EngineConfig, FeatureConfig, ForecastConfig, RagConfig};
pub use domain::{Document, PriceBar, PriceSeries, Symbol, UtcDateTime};
pub use error::{CoreError, ValidationError};
pub use market::{
    popular_symbols, CsvMarketData, MarketDataSource, MarketSnapshot, OptionChain,
    OptionContract, SourceError, SourceErrorKind, SyntheticMarketData, POPULAR_SYMBOLS,
};
