use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// NSE tickers run long (`BAJAJ-AUTO.NS`, `MCDOWELL-N.BO`).
const MAX_TICKER_LEN: usize = 20;
const INDEX_PREFIX: char = '^';

/// Exchange ticker stored in uppercase.
///
/// Accepted shapes: plain tickers (`SBIN`), exchange-suffixed tickers
/// (`RELIANCE.NS`), tickers with `&` or `-` (`M&M`, `BAJAJ-AUTO`) and index
/// codes with a leading caret (`^NSEI`). The first character after the
/// optional caret must be a letter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim().to_ascii_uppercase();
        let len = ticker.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_TICKER_LEN,
            });
        }

        let skip = usize::from(ticker.starts_with(INDEX_PREFIX));
        let mut chars = ticker.chars().enumerate().skip(skip);
        match chars.next() {
            None => return Err(ValidationError::EmptySymbol),
            Some((_, ch)) if !ch.is_ascii_alphabetic() => {
                return Err(ValidationError::SymbolInvalidStart { ch });
            }
            Some(_) => {}
        }
        if let Some((index, ch)) = chars.find(|&(_, ch)| !is_ticker_char(ch)) {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        Ok(Self(ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_ticker_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '&')
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
