//! Canonical schema constants for structured logging
//!
//! Every event emitted by errtree uses these keys so log pipelines can index
//! error trees without knowing the producing crate.

// Request context keys, in the casing log consumers already query on
pub const LOG_KEY_SERVICE: &str = "service";
pub const LOG_KEY_ENVIRONMENT: &str = "env";
pub const LOG_KEY_TRACE_ID: &str = "traceId";
pub const LOG_KEY_PATH: &str = "path";
pub const LOG_KEY_METHOD: &str = "method";
pub const LOG_KEY_IP: &str = "ip";
pub const LOG_KEY_USER_AGENT: &str = "userAgent";
pub const LOG_KEY_UNKNOWN: &str = "unknown";

// Canonical event names
pub const EVENT_ERROR: &str = "error";
pub const EVENT_BAD_ARGUMENT: &str = "bad_argument";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!EVENT_ERROR.is_empty());
        assert!(!EVENT_BAD_ARGUMENT.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_ERROR, EVENT_BAD_ARGUMENT);
    }

    #[test]
    fn test_log_keys_are_distinct() {
        let keys = [
            LOG_KEY_SERVICE,
            LOG_KEY_ENVIRONMENT,
            LOG_KEY_TRACE_ID,
            LOG_KEY_PATH,
            LOG_KEY_METHOD,
            LOG_KEY_IP,
            LOG_KEY_USER_AGENT,
            LOG_KEY_UNKNOWN,
        ];
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }
}
