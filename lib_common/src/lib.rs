//! # lib_common
//!
//! Shared library of the workspace. Each top-level module sits behind a cargo
//! feature of the same name; see `Cargo.toml` for what each one pulls in.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

#[cfg(feature = "configs")]
pub mod configs;
#[cfg(feature = "loggers")]
pub mod loggers;
#[cfg(feature = "markets")]
pub mod markets;
#[cfg(feature = "retrieve")]
pub mod retrieve;

#[cfg(feature = "configs")]
pub use configs::config_exante::{ExanteConfig, MissingFieldPolicy};
#[cfg(feature = "markets")]
pub use markets::exante::{ExanteClient, ExanteError};
