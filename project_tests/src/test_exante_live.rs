//! # EXANTE Live Data Test
//!
//! Runs every lookup of `lib_common::markets::exante` against the configured
//! environment (the demo host unless `EXANTE_API_HOST` says otherwise) and
//! prints what came back. Needs a valid `EXANTE_API_TOKEN`, so it is a manual
//! check rather than part of `cargo test`.

use lib_common::configs::config_exante::ExanteConfig;
use lib_common::loggers::tracing_setup::{init_logging, LoggingOptions};
use lib_common::markets::exante::{cell_text, ExanteClient, ExanteError};
use serde_json::Value;

/// Prints one lookup outcome and reports whether it succeeded.
fn report(label: &str, result: Result<Value, ExanteError>) -> bool {
    match result {
        Ok(value) => {
            println!("✅ {:<40} {}", label, cell_text(&value));
            true
        }
        Err(e) => {
            println!("❌ {:<40} {}", label, e);
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _guard = init_logging(&LoggingOptions {
        level: "info".to_string(),
        ..Default::default()
    })?;

    // // Statement: Token, host and policy come from the environment or .env
    let config = ExanteConfig::from_env()?;
    let client = ExanteClient::new(&config)?;
    println!("--- Starting EXANTE live lookups against {} ---", config.host);

    let checks = [
        ("cross_rate(EUR, USD)", client.cross_rate("EUR", "USD")),
        ("group_field(Si, name)", client.group_field("Si", "name")),
        ("nearest_group_field(Si, id)", client.nearest_group_field("Si", "id")),
        ("ohlc_field(EUR/USD.E.FX, 60, open)", client.ohlc_field("EUR/USD.E.FX", 60, "open")),
        (
            "symbol_field(AAPL.NASDAQ, description)",
            client.symbol_field("AAPL.NASDAQ", "description"),
        ),
        ("symbol_field(AAPL.NASDAQ, lotSize)", client.symbol_field("AAPL.NASDAQ", "lotSize")),
        ("mid_price(EUR/USD.E.FX)", client.mid_price("EUR/USD.E.FX")),
    ];

    let total = checks.len();
    let passed = checks
        .into_iter()
        .map(|(label, result)| report(label, result))
        .filter(|ok| *ok)
        .count();

    match client.ohlc_bar("EUR/USD.E.FX", 3600) {
        Ok(bar) => println!("✅ ohlc_bar(EUR/USD.E.FX, 3600)          {:?}", bar),
        Err(e) => println!("❌ ohlc_bar(EUR/USD.E.FX, 3600)          {}", e),
    }

    println!("\n--- {}/{} lookups succeeded ---", passed, total);
    if passed != total {
        std::process::exit(1);
    }
    Ok(())
}
