pub use vpc_probe_core::{contract, metadata, settings};
