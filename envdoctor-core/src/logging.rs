//! Structured logging using **tracing**.
//!
//! Logs go to stderr so stdout stays clean for the report. Filtering follows
//! `RUST_LOG` (e.g. `RUST_LOG=envdoctor_core=debug`) and defaults to `warn`,
//! which surfaces skipped files without per-file chatter.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per event, for log pipelines
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes the global tracing subscriber.
///
/// This should be called *once* at the beginning of the application's runtime.
/// Later calls are ignored.
pub fn init_structured_logging(format: LogFormat) {
    let result = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_level(true)
            .with_target(true)
            .with_current_span(true)
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .compact()
            .with_target(false)
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_does_not_panic() {
        init_structured_logging(LogFormat::Text);
        init_structured_logging(LogFormat::Json);
    }
}
