use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime, ValidationError};

/// OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;
        validate_non_negative("volume", volume)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Percentage change of this bar's close relative to `previous_close`.
    pub fn change_pct(&self, previous_close: f64) -> f64 {
        if previous_close == 0.0 {
            return 0.0;
        }
        (self.close - previous_close) / previous_close * 100.0
    }
}

/// Ordered bar history for one symbol.
///
/// Timestamps are strictly increasing; the constructor and [`PriceSeries::push`]
/// both reject anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: Symbol,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol, bars: Vec<PriceBar>) -> Result<Self, ValidationError> {
        for (index, pair) in bars.windows(2).enumerate() {
            if pair[1].ts <= pair[0].ts {
                return Err(ValidationError::UnorderedBars { index: index + 1 });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Append a bar that must be later than the current last bar.
    pub fn push(&mut self, bar: PriceBar) -> Result<(), ValidationError> {
        if let Some(last) = self.bars.last() {
            if bar.ts <= last.ts {
                return Err(ValidationError::UnorderedBars {
                    index: self.bars.len(),
                });
            }
        }
        self.bars.push(bar);
        Ok(())
    }

    /// Keep only the most recent `count` bars.
    pub fn tail(&self, count: usize) -> Self {
        let start = self.bars.len().saturating_sub(count);
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars[start..].to_vec(),
        }
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;

    fn ts(day: i64) -> UtcDateTime {
        UtcDateTime::parse("2024-01-01T00:00:00Z")
            .expect("timestamp")
            .saturating_add(Duration::days(day))
    }

    fn bar(day: i64, close: f64) -> PriceBar {
        PriceBar::new(ts(day), close, close + 1.0, close - 1.0, close, 1_000.0).expect("bar")
    }

    #[test]
    fn rejects_inverted_range() {
        let err = PriceBar::new(ts(0), 10.0, 9.0, 11.0, 10.0, 1.0).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarRange));
    }

    #[test]
    fn rejects_negative_volume() {
        let err = PriceBar::new(ts(0), 10.0, 11.0, 9.0, 10.0, -1.0).expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::NegativeValue { field: "volume" }
        ));
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let symbol = Symbol::parse("INFY").expect("symbol");
        let err = PriceSeries::new(symbol, vec![bar(0, 10.0), bar(0, 11.0)]).expect_err("dup");
        assert_eq!(err, ValidationError::UnorderedBars { index: 1 });
    }

    #[test]
    fn push_requires_later_timestamp() {
        let symbol = Symbol::parse("INFY").expect("symbol");
        let mut series = PriceSeries::new(symbol, vec![bar(0, 10.0), bar(1, 11.0)]).expect("ok");
        assert!(series.push(bar(1, 12.0)).is_err());
        series.push(bar(2, 12.0)).expect("later bar");
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn tail_keeps_most_recent_bars() {
        let symbol = Symbol::parse("TCS").expect("symbol");
        let series =
            PriceSeries::new(symbol, (0..10).map(|d| bar(d, d as f64 + 1.0)).collect()).expect("ok");
        let tail = series.tail(3);
        assert_eq!(tail.closes(), vec![8.0, 9.0, 10.0]);
    }
}
