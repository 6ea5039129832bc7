//! # Domain Models
//!
//! Canonical domain types shared by the forecasting and retrieval crates.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated exchange ticker |
//! | [`UtcDateTime`] | UTC timestamp |
//! | [`PriceBar`] | OHLCV bar |
//! | [`PriceSeries`] | Strictly time-ordered bars for one symbol |
//! | [`Document`] | Corpus document with metadata |
//!
//! All types enforce their invariants at construction time:
//!
//! ```rust
//! use ferrocast_core::{PriceBar, UtcDateTime, ValidationError};
//!
//! let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").unwrap();
//! let invalid = PriceBar::new(ts, 100.0, 95.0, 105.0, 102.0, 1_000.0);
//! assert!(matches!(invalid, Err(ValidationError::InvalidBarRange)));
//! ```

mod document;
mod price;
mod symbol;
mod timestamp;

pub use document::Document;
pub use price::{PriceBar, PriceSeries};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
