//! CLI argument definitions for ferrocast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `summary` | Latest close, change and volume for a watchlist |
//! | `indicators` | Technical indicator snapshot for one symbol |
//! | `forecast` | Train a per-symbol model and forecast the next closes |
//! | `options` | Nearest-expiration option chain |
//! | `ask` | Grounded answer from the fintech report corpus |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and per-symbol errors as failures |
//! | `--config` | none | YAML engine configuration |
//! | `--data-dir` | none | Read `<SYMBOL>.csv` bars instead of synthetic data |
//! | `--corpus-dir` | `data/reports` | Documents indexed by `ask` |
//! | `-v` | warn | Repeat for info, debug, trace logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! ferrocast summary
//! ferrocast forecast SBIN INFY --days 5 --format table
//! ferrocast ask "How is UPI adoption changing lending?" --top-k 5 --pretty
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Ferrocast - NSE price forecasting and fintech research assistant
#[derive(Debug, Parser)]
#[command(
    name = "ferrocast",
    author,
    version,
    about = "Indicator-driven price forecasts and grounded fintech answers",
    long_about = "Ferrocast trains a per-symbol regression model on technical indicators \
(moving averages, RSI, MACD, volatility) and forecasts the next closes day by day. \
It also answers questions from a local corpus of fintech reports, quoting the passages \
it relied on.\n\
\n\
Market data comes from a deterministic synthetic feed unless --data-dir points at \
a directory of <SYMBOL>.csv files.\n\
\n\
Use 'ferrocast <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and per-symbol errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// YAML engine configuration; missing keys keep their defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of `<SYMBOL>.csv` daily bars
    /// (`timestamp,open,high,low,close,volume`).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory of `.txt` and `.csv` documents indexed by `ask`.
    #[arg(long, global = true, default_value = "data/reports")]
    pub corpus_dir: PathBuf,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary for terminals.
    Table,
    /// Single JSON object.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Latest close, session change and volume.
    ///
    /// Without symbols, the first six of the default NSE watchlist are used.
    ///
    ///   ferrocast summary
    ///   ferrocast summary SBIN TCS INFY
    Summary(SummaryArgs),

    /// Indicator snapshot and 52-week range for one symbol.
    ///
    ///   ferrocast indicators RELIANCE
    Indicators(IndicatorsArgs),

    /// Train a model per symbol and forecast the next closes.
    ///
    ///   ferrocast forecast SBIN
    ///   ferrocast forecast SBIN TCS --days 10 --history 730
    Forecast(ForecastArgs),

    /// Nearest-expiration option chain.
    ///
    ///   ferrocast options NIFTY
    Options(OptionsArgs),

    /// Answer a question from the report corpus.
    ///
    ///   ferrocast ask "What risks do digital lenders face?"
    Ask(AskArgs),
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Symbols to summarise (e.g. SBIN, RELIANCE.NS).
    pub symbols: Vec<String>,
}

#[derive(Debug, Args)]
pub struct IndicatorsArgs {
    pub symbol: String,

    /// Calendar days of history to load.
    #[arg(long, default_value_t = 365)]
    pub history: usize,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// One or more symbols; each gets its own model.
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Days to forecast. Defaults to `forecast.horizon_days` from the config.
    #[arg(long)]
    pub days: Option<usize>,

    /// Days of history to train on.
    #[arg(long, default_value_t = 365)]
    pub history: usize,
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    pub symbol: String,

    /// Contracts to keep per side, centred on the at-the-money strike.
    #[arg(long, default_value_t = 3)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Free-form question.
    pub question: String,

    /// Documents to retrieve. Defaults to `rag.top_k` from the config.
    #[arg(long)]
    pub top_k: Option<usize>,
}
