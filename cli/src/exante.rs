//! # exante
//!
//! Command-line host for the EXANTE market-data lookups. Each invocation
//! plays the part of one spreadsheet cell: it runs a single lookup and prints
//! the resulting cell text on stdout. Logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

use lib_common::configs::config_exante::{
    ExanteConfig, MissingFieldPolicy, DEFAULT_API_PREFIX, DEFAULT_HOST,
};
use lib_common::loggers::tracing_setup::{init_logging, LoggingOptions};
use lib_common::markets::exante::{cell_text, trigger_recalc, ExanteClient, RecalcHost};

/// CLI arguments for exante.
#[derive(Parser, Debug)]
#[clap(
    name = "exante",
    version = "0.1.0",
    author = "ckir",
    about = "Reads market-data fields from the EXANTE API.",
    long_about = "Runs one lookup against the EXANTE market-data API (cross rates, groups, \
                  OHLC bars, symbols) and prints the value the way a spreadsheet cell shows it."
)]
pub struct Cli {
    /// API host (scheme and authority).
    #[clap(long, env = "EXANTE_API_HOST", default_value = DEFAULT_HOST, global = true)]
    pub host: String,

    /// Market-data API path prefix.
    #[clap(long, env = "EXANTE_API_PREFIX", default_value = DEFAULT_API_PREFIX, global = true)]
    pub api_prefix: String,

    /// Bearer token (JWT).
    #[clap(long, env = "EXANTE_API_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// What to print when the field is absent: `error` fails, `empty` prints an empty cell.
    #[clap(long, env = "EXANTE_MISSING_FIELD", default_value = "error", global = true)]
    pub missing_field: MissingFieldPolicy,

    /// Log level used when RUST_LOG is not set.
    #[clap(long, env = "EXANTE_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Also write JSON logs, rolled daily, into this directory.
    #[clap(long, env = "LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

/// One lookup per subcommand.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Conversion rate between two currencies.
    CrossRate { from: String, to: String },
    /// A property of a symbol group.
    Group { group: String, field: String },
    /// A property of the group member with the nearest expiration.
    GroupNearest { group: String, field: String },
    /// A field (open, high, low, close, timestamp) of the latest OHLC bar.
    Ohlc {
        symbol: String,
        /// Bar duration in seconds.
        duration: u64,
        field: String,
    },
    /// A property of a symbol; specification fields are read from its specification.
    Symbol { symbol: String, field: String },
    /// Close of the latest one-minute bar.
    Mid { symbol: String },
    /// Print the current time so dependent cells can be forced to recalculate.
    Update,
}

impl Cli {
    fn config(&self) -> anyhow::Result<ExanteConfig> {
        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow::anyhow!("no token: pass --token or set EXANTE_API_TOKEN"))?;

        Ok(ExanteConfig::new(token)
            .with_host(self.host.clone())
            .with_api_prefix(self.api_prefix.clone())
            .with_missing_field(self.missing_field))
    }
}

/// Writes the trigger cell to stdout.
struct StdoutHost<W: Write> {
    out: W,
}

impl<W: Write> RecalcHost for StdoutHost<W> {
    fn write_cell(&mut self, _cell: &str, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Runs the lookup named by `command`.
pub fn lookup(client: &ExanteClient, command: &Command) -> anyhow::Result<Value> {
    let value = match command {
        Command::CrossRate { from, to } => client.cross_rate(from, to)?,
        Command::Group { group, field } => client.group_field(group, field)?,
        Command::GroupNearest { group, field } => client.nearest_group_field(group, field)?,
        Command::Ohlc { symbol, duration, field } => client.ohlc_field(symbol, *duration, field)?,
        Command::Symbol { symbol, field } => client.symbol_field(symbol, field)?,
        Command::Mid { symbol } => client.mid_price(symbol)?,
        Command::Update => anyhow::bail!("`update` does not perform a lookup"),
    };
    Ok(value)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.command == Command::Update {
        trigger_recalc(&mut StdoutHost { out: io::stdout().lock() })
            .context("failed to write the update stamp to stdout")?;
        return Ok(());
    }

    let config = cli.config()?;
    debug!(?config, "running {:?}", cli.command);
    let client = ExanteClient::new(&config)?;
    let value = lookup(&client, &cli.command)?;
    println!("{}", cell_text(&value));
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let options = LoggingOptions {
        level: cli.log_level.clone(),
        log_dir: cli.log_dir.clone(),
        ..Default::default()
    };
    let _guard = match init_logging(&options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: Failed to initialize logging.");
            eprintln!("Details: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("Details: {}", cause);
        }
        process::exit(1);
    }
}
