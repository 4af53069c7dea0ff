//! Process-wide configuration
//!
//! Stack capture and path cleaning are global concerns: every `e!` call site
//! reads them. `ErrTreeConfig` gathers the knobs in one place and `install`
//! applies them once at start-up.
//!
//! | Variable                | Values                              | Default       |
//! |-------------------------|-------------------------------------|---------------|
//! | `ERRTREE_TRACE_CAPTURE` | `on` / `off` (also `true`/`false`)  | `on`          |
//! | `ERRTREE_PROJECT_ROOT`  | directory stripped from trace paths | working dir   |
//! | `ERRTREE_LOG_PROFILE`   | `development` / `production` / `test` | `development` |

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::cleanpath;
use crate::logging_facility::{self, Profile};

pub const ENV_TRACE_CAPTURE: &str = "ERRTREE_TRACE_CAPTURE";
pub const ENV_PROJECT_ROOT: &str = "ERRTREE_PROJECT_ROOT";
pub const ENV_LOG_PROFILE: &str = "ERRTREE_LOG_PROFILE";

static CAPTURE_ENABLED: AtomicBool = AtomicBool::new(true);

/// Configuration loading errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': expected {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Whether builders capture the call site when no `Op` is given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    Capture,
    Suppress,
}

/// Set the process-wide trace mode
pub fn set_trace_mode(mode: TraceMode) {
    CAPTURE_ENABLED.store(mode == TraceMode::Capture, Ordering::Relaxed);
}

/// Current process-wide trace mode
pub fn trace_mode() -> TraceMode {
    if CAPTURE_ENABLED.load(Ordering::Relaxed) {
        TraceMode::Capture
    } else {
        TraceMode::Suppress
    }
}

impl FromStr for TraceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" | "capture" => Ok(TraceMode::Capture),
            "off" | "false" | "0" | "suppress" => Ok(TraceMode::Suppress),
            _ => Err(ConfigError::InvalidValue {
                var: ENV_TRACE_CAPTURE,
                value: s.to_string(),
                expected: "on or off",
            }),
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            _ => Err(ConfigError::InvalidValue {
                var: ENV_LOG_PROFILE,
                value: s.to_string(),
                expected: "development, production or test",
            }),
        }
    }
}

/// Everything errtree reads from its environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrTreeConfig {
    pub trace_mode: TraceMode,
    pub project_root: Option<String>,
    pub log_profile: Profile,
}

impl Default for ErrTreeConfig {
    fn default() -> Self {
        Self {
            trace_mode: TraceMode::Capture,
            project_root: None,
            log_profile: Profile::Development,
        }
    }
}

impl ErrTreeConfig {
    /// Read configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unparseable variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Same as [`ErrTreeConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let trace_mode = match lookup(ENV_TRACE_CAPTURE) {
            Some(value) => value.parse()?,
            None => defaults.trace_mode,
        };

        let project_root = lookup(ENV_PROJECT_ROOT).filter(|root| !root.trim().is_empty());

        let log_profile = match lookup(ENV_LOG_PROFILE) {
            Some(value) => value.parse()?,
            None => defaults.log_profile,
        };

        Ok(Self {
            trace_mode,
            project_root,
            log_profile,
        })
    }

    /// Apply to the process-wide settings and initialise logging
    ///
    /// Logging initialisation only takes effect on the first call.
    pub fn install(&self) {
        set_trace_mode(self.trace_mode);
        if let Some(root) = &self.project_root {
            cleanpath::set_clean_path(root.clone());
        }
        logging_facility::init(self.log_profile);
    }
}
