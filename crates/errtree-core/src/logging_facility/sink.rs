//! Logging capability
//!
//! Code that reports errors depends on `&dyn Log` rather than on a concrete
//! backend. `TracingLog` forwards to `tracing`; request and service context
//! travels alongside as a `LogInfo` map.

use std::collections::BTreeMap;
use std::fmt;

use errtree_core_types::schema::{
    EVENT_ERROR, LOG_KEY_ENVIRONMENT, LOG_KEY_IP, LOG_KEY_METHOD, LOG_KEY_PATH, LOG_KEY_SERVICE,
    LOG_KEY_TRACE_ID, LOG_KEY_UNKNOWN, LOG_KEY_USER_AGENT,
};
use tracing::Level;

use crate::codes;
use crate::node::ErrorNode;
use crate::render;

/// Somewhere log lines go
pub trait Log: Send + Sync {
    fn log(&self, level: Level, message: &str, info: &LogInfo);

    fn debug(&self, message: &str, info: &LogInfo) {
        self.log(Level::DEBUG, message, info);
    }

    fn info(&self, message: &str, info: &LogInfo) {
        self.log(Level::INFO, message, info);
    }

    fn warn(&self, message: &str, info: &LogInfo) {
        self.log(Level::WARN, message, info);
    }

    fn error(&self, message: &str, info: &LogInfo) {
        self.log(Level::ERROR, message, info);
    }
}

/// Log an error tree at the level its code maps to
pub fn log_error(log: &dyn Log, err: &ErrorNode, info: &LogInfo) {
    log.log(codes::log_level(err.code()), &render::full(err), info);
}

/// Name of the running service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service(pub String);

/// Deployment environment (`staging`, `production`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment(pub String);

/// Per-request context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    pub trace_id: String,
    pub path: String,
    pub method: String,
    pub ip: String,
    pub user_agent: String,
}

/// Context fields attached to every log line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogInfo(BTreeMap<String, String>);

impl LogInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn with_service(mut self, service: &Service) -> Self {
        self.set(LOG_KEY_SERVICE, service.0.clone());
        self
    }

    pub fn with_environment(mut self, env: &Environment) -> Self {
        self.set(LOG_KEY_ENVIRONMENT, env.0.clone());
        self
    }

    pub fn with_request(mut self, request: &RequestInfo) -> Self {
        self.set(LOG_KEY_TRACE_ID, request.trace_id.clone());
        self.set(LOG_KEY_PATH, request.path.clone());
        self.set(LOG_KEY_METHOD, request.method.clone());
        self.set(LOG_KEY_IP, request.ip.clone());
        self.set(LOG_KEY_USER_AGENT, request.user_agent.clone());
        self
    }

    /// Free-form context that has no dedicated key
    pub fn with_unknown(mut self, value: impl fmt::Display) -> Self {
        self.set(LOG_KEY_UNKNOWN, value.to_string());
        self
    }

    pub fn trace_id(&self) -> &str {
        self.get(LOG_KEY_TRACE_ID).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LogInfo {
    /// `key=value` pairs in key order
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={:?}", key, value)?;
        }
        Ok(())
    }
}

/// `Log` backed by the global `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

macro_rules! emit {
    ($level:ident, $message:expr, $info:expr) => {
        tracing::$level!(
            component = module_path!(),
            event = EVENT_ERROR,
            service = $info.get(LOG_KEY_SERVICE).unwrap_or(""),
            env = $info.get(LOG_KEY_ENVIRONMENT).unwrap_or(""),
            trace_id = $info.trace_id(),
            path = $info.get(LOG_KEY_PATH).unwrap_or(""),
            method = $info.get(LOG_KEY_METHOD).unwrap_or(""),
            ip = $info.get(LOG_KEY_IP).unwrap_or(""),
            user_agent = $info.get(LOG_KEY_USER_AGENT).unwrap_or(""),
            "{}",
            $message
        )
    };
}

impl Log for TracingLog {
    fn log(&self, level: Level, message: &str, info: &LogInfo) {
        match level {
            Level::ERROR => emit!(error, message, info),
            Level::WARN => emit!(warn, message, info),
            Level::INFO => emit!(info, message, info),
            Level::DEBUG => emit!(debug, message, info),
            _ => emit!(trace, message, info),
        }
    }
}
