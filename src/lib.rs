pub mod access;
pub mod api;
pub mod config;
pub mod dashboard;
mod error;
pub mod session;
pub mod wallet;

pub use error::SkillWalletError;

/// Initialize structured logging for shells that don't install their own
/// subscriber. Honors `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
