//! Optional `tracing` subscriber wiring for hosts embedding this crate in a
//! binary (demos, benches, integration tests). The engine itself never
//! calls this module — every public operation in [`crate::merkle`],
//! [`crate::rollup`], [`crate::subtree`], and [`crate::splitrollup`] emits
//! `tracing` events regardless of whether a subscriber is installed; a host
//! that wants them on stdout calls [`init`] once at startup.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Failure installing the global `tracing` subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Install a global `tracing` subscriber filtered by `RUST_LOG` (falling
/// back to `level`), emitting JSON when `json` is set and compact text
/// otherwise.
pub fn init(level: Level, json: bool) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };

    result.map_err(|_| TelemetryError::AlreadyInitialized)
}
