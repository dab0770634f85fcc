use lambda_runtime::Error;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs JSON logging for CloudWatch. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() -> Result<(), Error> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_current_span(false)
        .try_init()
}

/// Millisecond counts as a log field value.
pub fn saturating_millis(millis: u128) -> u64 {
    u64::try_from(millis).unwrap_or(u64::MAX)
}
