//! Runtime tuning for list timing.
//!
//! # Responsibility
//! - Hold the delays and notification timeouts used by the list core.
//! - Resolve overrides from environment variables with safe fallback.
//!
//! # Invariants
//! - Every resolved value is a positive duration.
//! - Unparseable overrides never fail resolution; defaults apply instead.

use log::warn;
use std::time::Duration;

/// Delay applied by `PersonStore::add` before the append becomes visible.
pub const DEFAULT_ADD_DELAY: Duration = Duration::from_millis(500);
/// Material short snackbar duration.
pub const DEFAULT_SHORT_TIMEOUT: Duration = Duration::from_millis(4_000);
/// Material long snackbar duration.
pub const DEFAULT_LONG_TIMEOUT: Duration = Duration::from_millis(10_000);

pub const ENV_ADD_DELAY_MS: &str = "SWIPELIST_ADD_DELAY_MS";
pub const ENV_SHORT_TIMEOUT_MS: &str = "SWIPELIST_SNACKBAR_SHORT_MS";
pub const ENV_LONG_TIMEOUT_MS: &str = "SWIPELIST_SNACKBAR_LONG_MS";

/// Timing configuration shared by store, host and controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    pub add_delay: Duration,
    pub short_timeout: Duration,
    pub long_timeout: Duration,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            add_delay: DEFAULT_ADD_DELAY,
            short_timeout: DEFAULT_SHORT_TIMEOUT,
            long_timeout: DEFAULT_LONG_TIMEOUT,
        }
    }
}

impl ListConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through a caller-provided variable lookup.
    ///
    /// Missing keys keep defaults. Empty, zero or non-numeric values are
    /// logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            add_delay: resolve_millis(&lookup, ENV_ADD_DELAY_MS, defaults.add_delay),
            short_timeout: resolve_millis(&lookup, ENV_SHORT_TIMEOUT_MS, defaults.short_timeout),
            long_timeout: resolve_millis(&lookup, ENV_LONG_TIMEOUT_MS, defaults.long_timeout),
        }
    }
}

fn resolve_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    fallback: Duration,
) -> Duration {
    let Some(raw) = lookup(key) else {
        return fallback;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Duration::from_millis(value),
        _ => {
            warn!(
                "event=config_override module=config status=ignored key={} fallback_ms={}",
                key,
                fallback.as_millis()
            );
            fallback
        }
    }
}
