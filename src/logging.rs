use tracing_subscriber::EnvFilter;

use crate::error::{Result, ToolError};

/// Installs the global fmt subscriber. `RUST_LOG` wins when set; otherwise
/// the level is `info`, or `debug` when `verbose` is requested.
pub fn init(verbose: bool) -> Result<()> {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}
