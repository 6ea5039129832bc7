use std::collections::BTreeSet;

use time::{Duration, OffsetDateTime};

use super::{MarketDataSource, OptionChain, OptionContract, SourceError};
use crate::{PriceBar, PriceSeries, Symbol, UtcDateTime};

const MAX_DAYS: usize = 5_000;
const STRIKES_PER_SIDE: i64 = 5;

/// Deterministic offline data source.
///
/// Every symbol gets its own base price, drift and seasonal phase derived
/// from its ticker, so repeated calls return identical bars for the same
/// anchor date.
#[derive(Debug, Clone)]
pub struct SyntheticMarketData {
    anchor: UtcDateTime,
    unavailable: BTreeSet<Symbol>,
}

impl Default for SyntheticMarketData {
    fn default() -> Self {
        let today = OffsetDateTime::now_utc().date().midnight().assume_utc();
        Self {
            anchor: UtcDateTime::from_offset_datetime(today).unwrap_or_else(|_| UtcDateTime::now()),
            unavailable: BTreeSet::new(),
        }
    }
}

impl SyntheticMarketData {
    /// Source whose most recent bar falls on `anchor`.
    pub fn with_anchor(anchor: UtcDateTime) -> Self {
        Self {
            anchor,
            unavailable: BTreeSet::new(),
        }
    }

    /// Make `symbol` fail with an `Unavailable` error.
    pub fn with_unavailable(mut self, symbol: Symbol) -> Self {
        self.unavailable.insert(symbol);
        self
    }

    fn check_available(&self, symbol: &Symbol) -> Result<(), SourceError> {
        if self.unavailable.contains(symbol) {
            return Err(SourceError::unavailable(format!(
                "synthetic feed has no data for '{symbol}'"
            )));
        }
        Ok(())
    }

    fn close_at(seed: u64, index: usize) -> f64 {
        let base = 80.0 + (seed % 2_400) as f64 / 2.0;
        let drift = ((seed / 7) % 9) as f64 * 0.0004 - 0.0008;
        let phase = (seed % 31) as f64 / 5.0;
        let t = index as f64;
        let trend = base * (1.0 + drift).powf(t);
        let season = 1.0 + 0.03 * (t / 11.0 + phase).sin();
        let noise = 1.0 + (unit_noise(seed, index as u64) - 0.5) * 0.01;
        trend * season * noise
    }
}

impl MarketDataSource for SyntheticMarketData {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn price_series(&self, symbol: &Symbol, days: usize) -> Result<PriceSeries, SourceError> {
        self.check_available(symbol)?;
        if days == 0 || days > MAX_DAYS {
            return Err(SourceError::invalid_request(format!(
                "days must be within 1..={MAX_DAYS}, got {days}"
            )));
        }

        let seed = symbol_seed(symbol);
        let mut bars = Vec::with_capacity(days);
        let mut previous_close = Self::close_at(seed, 0);
        for index in 0..days {
            let offset = Duration::days((days - index - 1) as i64);
            let ts = self.anchor.saturating_add(-offset);
            let close = Self::close_at(seed, index + 1);
            let open = previous_close;
            let spread = close.max(open) * 0.006 * (0.5 + unit_noise(seed ^ 0x5bd1, index as u64));
            let high = close.max(open) + spread;
            let low = (close.min(open) - spread).max(0.0);
            let volume = 200_000.0 + ((seed + index as u64 * 7_919) % 800_000) as f64;
            bars.push(PriceBar::new(ts, open, high, low, close, volume)?);
            previous_close = close;
        }

        Ok(PriceSeries::new(symbol.clone(), bars)?)
    }

    fn option_chain(&self, symbol: &Symbol) -> Result<OptionChain, SourceError> {
        let series = self.price_series(symbol, 2)?;
        let spot = series
            .last()
            .map(|bar| bar.close)
            .ok_or_else(|| SourceError::not_found(format!("no spot price for '{symbol}'")))?;

        let step = strike_step(spot);
        let atm = (spot / step).round() * step;
        let seed = symbol_seed(symbol);
        let mut calls = Vec::new();
        let mut puts = Vec::new();
        for offset in -STRIKES_PER_SIDE..=STRIKES_PER_SIDE {
            let strike = atm + offset as f64 * step;
            if strike <= 0.0 {
                continue;
            }
            let time_value = spot * 0.025 * (-((strike - spot).abs() / (spot * 0.08))).exp();
            let oi = 1_000 + (seed.wrapping_add(offset.unsigned_abs() * 613) % 50_000);
            calls.push(contract(strike, (spot - strike).max(0.0) + time_value, oi));
            puts.push(contract(strike, (strike - spot).max(0.0) + time_value, oi / 2 + 250));
        }

        Ok(OptionChain {
            symbol: symbol.clone(),
            expiration: self.anchor.saturating_add(Duration::days(28)),
            calls,
            puts,
        })
    }
}

fn contract(strike: f64, last_price: f64, open_interest: u64) -> OptionContract {
    OptionContract {
        strike,
        last_price,
        bid: last_price * 0.98,
        ask: last_price * 1.02,
        open_interest,
    }
}

fn strike_step(spot: f64) -> f64 {
    match spot {
        s if s < 250.0 => 5.0,
        s if s < 1_000.0 => 10.0,
        s if s < 2_500.0 => 20.0,
        _ => 50.0,
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

/// Deterministic value in `[0, 1)` for a (seed, index) pair.
fn unit_noise(seed: u64, index: u64) -> f64 {
    let mut x = seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    (x % 10_000) as f64 / 10_000.0
}
