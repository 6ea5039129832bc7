//! # Ferrocast ML
//!
//! Per-symbol price forecasting from engineered technical indicators.
//!
//! ```text
//! PriceSeries ──▶ FeatureEngineer ──▶ chronological split ──▶ LinearModel
//!                                                                 │
//!            forecast loop: predict ◀── recompute ◀── append bar ◀┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use ferrocast_core::{ForecastConfig, MarketDataSource, Symbol, SyntheticMarketData};
//! use ferrocast_ml::Predictor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let series = SyntheticMarketData::default().price_series(&Symbol::parse("SBIN")?, 365)?;
//! let mut predictor = Predictor::new(ForecastConfig::default())?;
//! let report = predictor.train(&series)?;
//! println!("test R² = {:.4}", report.test_r2);
//! let next_five = predictor.predict_next(&series, 5)?;
//! assert_eq!(next_five.len(), 5);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod error;
pub mod features;
pub mod metrics;
pub mod predictor;
pub mod regression;

pub use batch::{forecast_batch, SymbolForecast};
pub use error::ForecastError;
pub use features::{FeatureEngineer, FeatureRow, IndicatorSnapshot, MovingAverage};
pub use predictor::{Predictor, TrainReport, TrainedModel};
pub use regression::LinearModel;
