//! Logging setup for tagstream.
//!
//! The libraries only emit `tracing` events. Binaries, demos and tests call [`init`] once to see them. The filter is
//! read from `TAGSTREAM_LOG`, then `RUST_LOG`, and falls back to the level passed in for the tagstream crates and
//! warnings for everything else.

use tracing::Level;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TAGSTREAM_LOG";

/// The error returned when a global subscriber was already installed.
#[derive(Debug, thiserror::Error)]
#[error("a global tracing subscriber is already set: {0}")]
pub struct InitError(String);

/// Install a formatting subscriber, panicking if one is already set.
///
/// ```rust,no_run
/// tagstream_logger::init(tracing::Level::DEBUG);
/// tracing::debug!("visible");
/// ```
pub fn init(level: Level) {
    if let Err(err) = try_init(level) {
        panic!("{err}");
    }
}

/// Install a formatting subscriber. Returns an error instead of panicking if one is already set, which makes it safe
/// to call from every test.
pub fn try_init(level: Level) -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .without_time()
        .with_target(true)
        .try_init()
        .map_err(|err| InitError(err.to_string()))
}

fn filter(level: Level) -> EnvFilter {
    for var in [LOG_ENV, EnvFilter::DEFAULT_ENV] {
        if let Ok(directives) = std::env::var(var) {
            return EnvFilter::new(directives);
        }
    }
    EnvFilter::new(default_directives(level))
}

fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("warn,tagstream={level},tagstream_dom={level},tagstream_logger={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_target_the_workspace_crates() {
        assert_eq!(
            default_directives(Level::TRACE),
            "warn,tagstream=trace,tagstream_dom=trace,tagstream_logger=trace"
        );
    }

    #[test]
    fn second_init_is_an_error() {
        let _ = try_init(Level::INFO);
        assert!(try_init(Level::INFO).is_err());
    }
}
