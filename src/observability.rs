//! Logging bootstrap for services embedding the engine.

use tracing_subscriber::{EnvFilter, fmt};

/// Install a fmt subscriber. `RUST_LOG` wins over `default_directive`.
/// Returns false when a global subscriber is already set.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_noop() {
        let _ = init_tracing("bastion=debug");
        assert!(!init_tracing("bastion=debug"));
    }
}
