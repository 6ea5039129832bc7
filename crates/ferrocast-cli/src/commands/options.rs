use ferrocast_core::{OptionContract, Symbol};

use crate::cli::OptionsArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

pub fn run(args: &OptionsArgs, context: &Context) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let mut chain = context.source.option_chain(&symbol)?;

    let listed = (chain.calls.len(), chain.puts.len());
    chain.calls = nearest_the_money(chain.calls, args.limit);
    chain.puts = nearest_the_money(chain.puts, args.limit);

    let mut result = CommandResult::ok(serde_json::to_value(&chain)?);
    if listed.0 > args.limit || listed.1 > args.limit {
        result = result.with_warning(format!(
            "showing {} of {} calls and {} of {} puts; raise --limit for more",
            chain.calls.len(),
            listed.0,
            chain.puts.len(),
            listed.1
        ));
    }
    Ok(result)
}

/// Keep `limit` contracts centred on the middle strike of an ordered chain.
fn nearest_the_money(contracts: Vec<OptionContract>, limit: usize) -> Vec<OptionContract> {
    if contracts.len() <= limit {
        return contracts;
    }
    let start = (contracts.len() / 2).saturating_sub(limit / 2);
    let start = start.min(contracts.len() - limit);
    contracts.into_iter().skip(start).take(limit).collect()
}
