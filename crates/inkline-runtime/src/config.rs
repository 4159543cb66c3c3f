#![forbid(unsafe_code)]

//! Session configuration.
//!
//! [`LiveConfig`] is a plain value with `with_*` builders. Environment
//! overrides are opt-in through [`LiveConfig::from_env`]:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `INKLINE_REFRESH_HZ` | `refresh_interval` (refreshes per second) |
//! | `INKLINE_WIDTH` | `width` |
//! | `INKLINE_HEIGHT` | `height` |
//! | `INKLINE_TRANSIENT` | `transient` (`1`/`true`/`0`/`false`) |

use std::env;
use std::time::Duration;

use inkline_render::frame::Overflow;

use crate::error::{LiveError, LiveResult};
use crate::registry::{Retention, TotalPolicy};

/// Default refresh interval (10 Hz).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Longest accepted refresh interval.
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Configuration for one live session.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveConfig {
    /// Time between periodic ticks.
    pub refresh_interval: Duration,
    /// Width override. `None` queries the terminal.
    pub width: Option<u16>,
    /// Height override. `None` queries the terminal.
    pub height: Option<u16>,
    /// What happens to lines wider than the region.
    pub overflow: Overflow,
    /// What happens to finished tasks.
    pub retention: Retention,
    /// What happens when completion would pass a task's total.
    pub total_policy: TotalPolicy,
    /// Hide the cursor while the session is active.
    pub hide_cursor: bool,
    /// Erase the region on stop instead of leaving the final frame.
    pub transient: bool,
    /// Force synchronized output on or off. `None` uses detection.
    pub sync_output: Option<bool>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            width: None,
            height: None,
            overflow: Overflow::default(),
            retention: Retention::default(),
            total_policy: TotalPolicy::default(),
            hide_cursor: true,
            transient: false,
            sync_output: None,
        }
    }
}

impl LiveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with the `INKLINE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`LiveError::InvalidConfig`] when a variable is set but does
    /// not parse.
    pub fn from_env() -> LiveResult<Self> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `get`.
    pub fn from_env_with<F>(get: F) -> LiveResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(hz) = parse_var::<f64>(&get, "INKLINE_REFRESH_HZ")? {
            config = config.with_refresh_rate(hz);
        }
        if let Some(width) = parse_var::<u16>(&get, "INKLINE_WIDTH")? {
            config.width = Some(width);
        }
        if let Some(height) = parse_var::<u16>(&get, "INKLINE_HEIGHT")? {
            config.height = Some(height);
        }
        if let Some(raw) = get("INKLINE_TRANSIENT") {
            config.transient = match raw.trim() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                other => {
                    return Err(LiveError::InvalidConfig(format!(
                        "INKLINE_TRANSIENT: expected a boolean, got {other:?}"
                    )));
                }
            };
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the refresh interval from a rate in Hz.
    ///
    /// A non-positive or non-finite rate yields a zero interval and a rate
    /// too small to represent yields [`Duration::MAX`]; both are rejected
    /// by [`validate`](Self::validate).
    #[must_use]
    pub fn with_refresh_rate(mut self, hz: f64) -> Self {
        self.refresh_interval = if hz.is_finite() && hz > 0.0 {
            Duration::try_from_secs_f64(1.0 / hz).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    #[must_use]
    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    #[must_use]
    pub fn with_total_policy(mut self, policy: TotalPolicy) -> Self {
        self.total_policy = policy;
        self
    }

    #[must_use]
    pub fn with_hide_cursor(mut self, hide: bool) -> Self {
        self.hide_cursor = hide;
        self
    }

    #[must_use]
    pub fn with_transient(mut self, transient: bool) -> Self {
        self.transient = transient;
        self
    }

    #[must_use]
    pub fn with_sync_output(mut self, enabled: bool) -> Self {
        self.sync_output = Some(enabled);
        self
    }

    /// Reject values a session cannot run with.
    ///
    /// # Errors
    ///
    /// [`LiveError::InvalidConfig`] for a zero refresh interval or one
    /// longer than [`MAX_REFRESH_INTERVAL`], a zero width, or a zero height.
    pub fn validate(&self) -> LiveResult<()> {
        if self.refresh_interval.is_zero() {
            return Err(LiveError::InvalidConfig(
                "refresh rate must be positive".into(),
            ));
        }
        if self.refresh_interval > MAX_REFRESH_INTERVAL {
            return Err(LiveError::InvalidConfig(format!(
                "refresh interval {:?} exceeds {:?}",
                self.refresh_interval, MAX_REFRESH_INTERVAL
            )));
        }
        if self.width == Some(0) {
            return Err(LiveError::InvalidConfig("width must be positive".into()));
        }
        if self.height == Some(0) {
            return Err(LiveError::InvalidConfig("height must be positive".into()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> LiveResult<Option<T>> {
    let Some(raw) = get(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| LiveError::InvalidConfig(format!("{key}: cannot parse {raw:?}")))
}
