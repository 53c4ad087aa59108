//! # Configuration Modules
//!
//! Configuration providers for the market-data clients.

/// Explicit and environment-driven configuration for the EXANTE client.
pub mod config_exante;
