//! # Financial Market APIs Module
//!
//! This module groups together the client implementations for specific
//! financial market data providers. Its purpose is to abstract the details of
//! interacting with external market services and hand plain values back to
//! the rest of the system.
//!
//! ## Contained Modules:
//!
//! - **`exante`**: Read-only client for the EXANTE market-data API: cross
//!   rates, symbol and group properties, OHLC bars.

/// Client for the EXANTE market-data REST API.
pub mod exante;
