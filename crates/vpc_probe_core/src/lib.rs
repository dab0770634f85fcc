//! Shared connectivity probe primitives.
//!
//! This crate owns the invocation metadata, probe settings, and the
//! request/response contracts of the connectivity and hello handlers. It
//! excludes the Lambda runtime and HTTP client concerns, which live in
//! `vpc_probe_lambda`.

pub mod contract;
pub mod metadata;
pub mod settings;
