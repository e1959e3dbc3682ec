//! Diagnostic logging setup
//!
//! User-facing messages go through [`Output`](crate::traits::Output); this
//! only configures `tracing` diagnostics, which always go to stderr so they
//! never mix with rendered plans or JSON on stdout.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "tfsummary=warn";
const VERBOSE_LOG_FILTER: &str = "tfsummary=debug,tower_http=debug";

/// Pick the filter: `RUST_LOG` wins, then `-v`, then the quiet default
fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new(VERBOSE_LOG_FILTER)
        } else {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    })
}

/// Initialize the global tracing subscriber
pub fn init_logging(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .with(build_filter(verbose))
        .try_init()
        .map_err(|err| anyhow!("Failed to initialize logging: {}", err))
}
