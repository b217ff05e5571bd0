//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FORMAT: &str = "AUDITFLOW_LOG_FORMAT";

/// Output format for log lines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// `pretty` (any case) selects human-readable output; anything else is JSON.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("pretty") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }

    pub fn from_env() -> Self {
        std::env::var(ENV_LOG_FORMAT)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

/// Install the global subscriber. Filter comes from `RUST_LOG` (default `info`).
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so stdout stays free for the JSON report.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
