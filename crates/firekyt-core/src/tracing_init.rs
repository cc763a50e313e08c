//! Log subscriber setup for FireKyt binaries.
//!
//! `RUST_LOG` wins when set. Otherwise the configured level applies to the
//! FireKyt crates only and dependencies stay at `warn`. Output goes to stderr
//! so command output on stdout stays clean.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Log targets owned by this workspace.
const FIREKYT_TARGETS: [&str; 4] = ["firekyt", "firekyt_cli", "firekyt_client", "firekyt_core"];

/// Filter directives for `level` on the FireKyt targets.
pub fn directives(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    FIREKYT_TARGETS
        .iter()
        .fold("warn".to_string(), |acc, target| format!("{acc},{target}={level}"))
}

fn build_filter(level: &str) -> (EnvFilter, Option<String>) {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return (filter, None);
    }
    match EnvFilter::try_new(directives(level)) {
        Ok(filter) => (filter, None),
        Err(_) => (
            EnvFilter::new(directives(&LoggingConfig::default().level)),
            Some(level.to_string()),
        ),
    }
}

/// Install the global subscriber from the logging settings.
///
/// `force_json` turns on JSON lines regardless of `logging.json`. Returns
/// `false` when a subscriber was already installed.
pub fn init_tracing(logging: &LoggingConfig, force_json: bool) -> bool {
    let (filter, rejected) = build_filter(&logging.level);
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if force_json || logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .is_ok()
    };
    if let Some(level) = rejected {
        tracing::warn!(%level, "Unrecognised log level, using default");
    }
    installed
}
