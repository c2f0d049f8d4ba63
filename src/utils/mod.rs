//! Small helpers shared across the crate.

/// Initializes the tracing subscriber for applications embedding the
/// pipeline.
///
/// Respects `RUST_LOG` through the default environment filter. Call once at
/// startup; library code only emits events and never installs a subscriber
/// on its own.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
