use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

const DEFAULT_LEVEL: &str = "warn";

fn init_subscriber(level: &str) {
    // stdout carries command output, so logs go to stderr
    Registry::default()
        .with(EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
        )
        .init();
}

/// Resolves the filter from the explicit level, then `RUST_LOG`, then `warn`.
pub fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_owned)
        .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

pub fn init(level: Option<&str>) {
    static INITIALIZED: OnceLock<()> = OnceLock::new();

    INITIALIZED.get_or_init(|| init_subscriber(&resolve_level(level)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(resolve_level(Some("debug")), "debug");
    }
}
