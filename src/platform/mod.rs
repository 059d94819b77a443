//! Host integration: frame pacing, logging setup and random number sources.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::error::PlatformError;
use crate::formatter::FrameFormatter;

#[cfg(feature = "sdl")]
pub mod sdl;

/// Sleeps for the remainder of a frame. Spins near the deadline for accurate pacing.
pub fn sleep(duration: Duration) {
    if !duration.is_zero() {
        spin_sleep::sleep(duration);
    }
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, `default_filter` otherwise.
pub fn init_tracing(default_filter: &str) -> Result<(), PlatformError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| PlatformError::Tracing(e.to_string()))?;

    let subscriber = tracing_subscriber::fmt()
        .event_format(FrameFormatter)
        .with_env_filter(filter)
        .finish()
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber).map_err(|e| PlatformError::Tracing(e.to_string()))
}

/// A fast generator, reproducible when seeded.
pub fn rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}
