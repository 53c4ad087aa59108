//! # Loggers
//!
//! Structured logging setup shared by the binaries of this workspace.

/// Console and rolling-file `tracing` subscriber setup.
pub mod tracing_setup;
