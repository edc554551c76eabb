/// Logging setup
///
/// Diagnostics go to stderr through `tracing`. Results meant for the user
/// are printed to stdout by the CLI and never pass through here.

use tracing_subscriber::EnvFilter;

/// Filter variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "CMDWERK_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber
///
/// Safe to call more than once, later calls are ignored.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
        tracing::debug!("logging initialised");
    }
}
