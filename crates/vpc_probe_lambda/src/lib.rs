//! AWS Lambda handlers and adapters for the connectivity probe functions.
//!
//! This crate owns runtime integration details (Lambda handlers, the HTTPS
//! probe adapter, and log setup) and re-exports the shared contracts through
//! a single `runtime` module boundary.

pub mod adapters;
pub mod handlers;
pub mod runtime;
pub mod telemetry;
