//! Log output
//!
//! The library crates only emit `tracing` events. Binaries and tests that
//! want to see them call [`init`] once; `RUST_LOG` overrides the default
//! filter.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "attrstore=info";

/// Install a fmt subscriber filtered by `RUST_LOG` or [`DEFAULT_FILTER`]
///
/// Returns `false` if a global subscriber was already installed; calling it
/// again is harmless.
pub fn init() -> bool {
    init_with(DEFAULT_FILTER)
}

/// Like [`init`] with a caller-supplied fallback filter
pub fn init_with(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
