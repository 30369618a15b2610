//! Diagnostic logging setup.
//!
//! Widget output goes to stdout; diagnostics go to stderr so the two never
//! interleave in a transcript.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive, e.g. `folio=debug`.
pub const LOG_ENV_VAR: &str = "FOLIO_LOG";

/// Filter used when `FOLIO_LOG` is unset or invalid.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "folio=debug"
    } else {
        "warn"
    }
}

pub fn build_filter(env_value: Option<&str>, verbose: bool) -> EnvFilter {
    env_value
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(env_value.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_verbose_flag() {
        let filter = build_filter(Some("folio::core=trace"), true);
        assert_eq!(filter.to_string(), "folio::core=trace");
    }

    #[test]
    fn blank_filter_uses_default() {
        assert_eq!(build_filter(Some("  "), false).to_string(), "warn");
        assert_eq!(build_filter(None, true).to_string(), "folio=debug");
    }
}
