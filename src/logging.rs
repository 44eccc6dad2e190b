//! Logging setup.
//!
//! One call from `main`, with the debug toggle passed in explicitly.
//! `RUST_LOG` overrides the default filter when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
pub fn init(debug: bool) {
    let default_filter = if debug {
        "info,cultura_etl=debug,sqlx=warn"
    } else {
        "info,sqlx=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
