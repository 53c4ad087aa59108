//! # Data Retrieval Module
//!
//! This module provides a centralized location for generic data retrieval
//! clients, primarily focused on HTTP-based interactions.
//!
//! ## Contained Modules:
//!
//! - **`ky_http`**: A generic blocking HTTP `ApiClient` built on `reqwest`.
//!   It joins relative paths to a base URL, attaches a bearer token and
//!   decodes JSON bodies. It is the foundation for the market-specific
//!   clients (e.g., EXANTE).

/// Generic blocking HTTP API client with bearer authentication.
pub mod ky_http;
