use ferrocast_core::{popular_symbols, MarketSnapshot};
use serde::Serialize;

use crate::cli::SummaryArgs;
use crate::error::CliError;
use crate::metadata::ItemError;

use super::{parse_symbols, CommandResult, Context};

const DEFAULT_WATCHLIST_LEN: usize = 6;

#[derive(Debug, Serialize)]
struct SummaryResponseData {
    snapshots: Vec<MarketSnapshot>,
}

pub fn run(args: &SummaryArgs, context: &Context) -> Result<CommandResult, CliError> {
    let symbols = if args.symbols.is_empty() {
        popular_symbols()
            .into_iter()
            .take(DEFAULT_WATCHLIST_LEN)
            .collect()
    } else {
        parse_symbols(&args.symbols)?
    };

    let mut snapshots = Vec::new();
    let mut errors = Vec::new();
    for (symbol, outcome) in context.source.market_summary(&symbols) {
        match outcome {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(error) => errors.push(
                ItemError::new(error.code(), error.message()).for_symbol(symbol.as_str()),
            ),
        }
    }

    let data = serde_json::to_value(SummaryResponseData { snapshots })?;
    Ok(CommandResult::ok(data).with_errors(errors))
}
