//! Log subscriber setup for hosts embedding the session.

use chrono::Local;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{Result, SessionError};

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "cf_session=info,cf_client=info";

/// Timestamps in the server's local timezone.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

fn build_filter(env_directive: Option<&str>, default_filter: &str) -> Result<EnvFilter> {
    let directive = env_directive
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(default_filter);
    EnvFilter::try_new(directive)
        .map_err(|e| SessionError::config(format!("Invalid filter directive: {}", e)))
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_logging(default_filter: Option<&str>) -> Result<()> {
    let env_directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(
        env_directive.as_deref(),
        default_filter.unwrap_or(DEFAULT_LOG_FILTER),
    )?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_timer(LocalTimer).with_target(true))
        .try_init()
        .map_err(|e| SessionError::config(format!("Failed to install log subscriber: {}", e)))
}
