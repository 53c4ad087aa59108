//! # EXANTE Market-Data Integration
//!
//! A thin, read-only client for the EXANTE market-data REST API (`/md/1.0`).
//! Every lookup is one blocking `GET` with a static bearer token that returns
//! a single JSON field, ready to be shown in a spreadsheet cell.
//!
//! ## Contained Modules:
//!
//! - **`endpoints`**: Resource paths, segment encoding and the rule that
//!   sends specification fields to the `/specification` resource.
//! - **`client`**: `ExanteClient` with one method per lookup.
//! - **`error`**: `ExanteError`, one variant per failure class.
//! - **`ohlc`**: Typed OHLC bar.
//! - **`sheet`**: Cell-text rendering and the recalculation trigger hook.
//!
//! ```no_run
//! use lib_common::configs::config_exante::ExanteConfig;
//! use lib_common::markets::exante::{cell_text, ExanteClient};
//!
//! let client = ExanteClient::new(&ExanteConfig::new("my-jwt"))?;
//! let mid = client.mid_price("EUR/USD.E.FX")?;
//! println!("{}", cell_text(&mid));
//! # Ok::<(), lib_common::markets::exante::ExanteError>(())
//! ```

/// `ExanteClient` and its lookups.
pub mod client;
/// Endpoint descriptors and path encoding.
pub mod endpoints;
/// Error type for client operations.
pub mod error;
/// Typed OHLC bar.
pub mod ohlc;
/// Spreadsheet-facing helpers.
pub mod sheet;

pub use client::ExanteClient;
pub use endpoints::{Endpoint, Extract, SYMBOL_SPEC_FIELDS};
pub use error::ExanteError;
pub use ohlc::OhlcBar;
pub use sheet::{cell_text, trigger_recalc, RecalcHost};
