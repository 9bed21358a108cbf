//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with human-readable or JSON output. Logs go
//! to stderr so stdout stays reserved for resolved tag output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `level` is the default filter directive; `RUST_LOG` overrides it when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section plus CLI overrides.
pub fn init_from_config(
    config: &tagprune_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = effective_level(&config.logging.level, verbose_override);
    let json_format = json_logs_override || config.logging.format == "json";
    init(level, json_format);
}

/// `--verbose` raises the level to debug but never lowers an explicit trace.
fn effective_level(configured: &str, verbose: bool) -> &str {
    match (verbose, configured) {
        (true, "trace") => "trace",
        (true, _) => "debug",
        (false, "") => "info",
        (false, level) => level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level_defaults_to_config() {
        assert_eq!(effective_level("warn", false), "warn");
        assert_eq!(effective_level("", false), "info");
    }

    #[test]
    fn test_effective_level_verbose() {
        assert_eq!(effective_level("info", true), "debug");
        assert_eq!(effective_level("trace", true), "trace");
    }
}
