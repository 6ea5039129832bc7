mod ask;
mod forecast;
mod indicators;
mod options;
mod summary;

use std::time::Instant;

use ferrocast_core::{
    CsvMarketData, EngineConfig, MarketDataSource, Symbol, SyntheticMarketData, UtcDateTime,
};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::{Envelope, ItemError, Metadata, RequestId};

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<ItemError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<ItemError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Everything a command needs, resolved once from global flags.
pub struct Context {
    pub config: EngineConfig,
    pub source: Box<dyn MarketDataSource>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let config = match &cli.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };

        let source: Box<dyn MarketDataSource> = match &cli.data_dir {
            Some(dir) => Box::new(CsvMarketData::new(dir)),
            None => Box::new(SyntheticMarketData::default()),
        };
        tracing::debug!(source = source.name(), "resolved market data source");

        Ok(Self { config, source })
    }
}

pub fn run(cli: &Cli) -> Result<Envelope, CliError> {
    let started = Instant::now();
    let context = Context::from_cli(cli)?;

    let (command, result) = match &cli.command {
        Command::Summary(args) => ("summary", summary::run(args, &context)?),
        Command::Indicators(args) => ("indicators", indicators::run(args, &context)?),
        Command::Forecast(args) => ("forecast", forecast::run(args, &context)?),
        Command::Options(args) => ("options", options::run(args, &context)?),
        Command::Ask(args) => ("ask", ask::run(args, &context, &cli.corpus_dir)?),
    };

    let CommandResult {
        data,
        warnings,
        errors,
    } = result;

    let meta = Metadata {
        request_id: RequestId::new_v4(),
        generated_at: UtcDateTime::now(),
        command,
        source: context.source.name().to_owned(),
        latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        warnings,
    };

    Ok(Envelope { meta, data, errors })
}

pub(crate) fn parse_symbols(raw: &[String]) -> Result<Vec<Symbol>, CliError> {
    raw.iter()
        .map(|value| Symbol::parse(value).map_err(CliError::from))
        .collect()
}
