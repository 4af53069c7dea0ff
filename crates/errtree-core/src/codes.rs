//! Static code catalog
//!
//! Numeric error codes are partitioned into buckets. The bucket decides the
//! HTTP status an error maps to, the severity it is logged at, and where its
//! default message comes from:
//!
//! | Range                 | Bucket     | HTTP status      |
//! |-----------------------|------------|------------------|
//! | 0                     | Unset      | 500              |
//! | 1 ..= 999             | Http       | identity (>=100) |
//! | 1000 ..= 19999        | Internal   | 500              |
//! | 20000 ..= 49999       | Service    | 500              |
//! | 50000 ..= 999_999_999 | Business   | 400              |
//!
//! Callers add their own codes from the `*_CODE_CUSTOM_START` markers upward.

use tracing::Level;

pub const HTTP_CODE_MAX: u32 = 999;
pub const INTERNAL_CODE_MIN: u32 = 1000;
pub const SERVICE_CODE_MIN: u32 = 20000;
pub const BUSINESS_CODE_MIN: u32 = 50000;
pub const BUSINESS_CODE_MAX: u32 = 999_999_999;

// ========== Internal codes ==========

pub const ERR_IO_INVALID_PATH: u32 = INTERNAL_CODE_MIN + 1;
pub const ERR_IO_NOT_EXIST: u32 = INTERNAL_CODE_MIN + 2;
pub const ERR_IO_EXIST: u32 = INTERNAL_CODE_MIN + 3;
pub const ERR_IO_READ_FAILED: u32 = INTERNAL_CODE_MIN + 4;
pub const ERR_IO_CONTENT_REACH_LIMIT: u32 = INTERNAL_CODE_MIN + 5;
pub const ERR_IO_WRITE_FAILED: u32 = INTERNAL_CODE_MIN + 6;

/// First internal code free for caller-defined use
pub const INTERNAL_CODE_CUSTOM_START: u32 = INTERNAL_CODE_MIN + 7;

// ========== Service codes ==========

pub const ERR_SVC_TIMEOUT: u32 = SERVICE_CODE_MIN + 1;
pub const ERR_SVC_LOST_CONNECTION: u32 = SERVICE_CODE_MIN + 2;
pub const ERR_SVC_RECONNECT_TIMEOUT: u32 = SERVICE_CODE_MIN + 3;
pub const ERR_SVC_AUTH_REQUIRED: u32 = SERVICE_CODE_MIN + 4;
pub const ERR_SVC_PERMISSION_REQUIRED: u32 = SERVICE_CODE_MIN + 5;

/// First service code free for caller-defined use
pub const SERVICE_CODE_CUSTOM_START: u32 = SERVICE_CODE_MIN + 6;

// ========== Business codes ==========

pub const ERR_AUTH_WRONG_CREDENTIAL: u32 = BUSINESS_CODE_MIN + 1;
pub const ERR_AUTH_NO_PERMISSION: u32 = BUSINESS_CODE_MIN + 2;
pub const ERR_AUTH_TOKEN_INVALID: u32 = BUSINESS_CODE_MIN + 3;
pub const ERR_AUTH_TOKEN_EXPIRED: u32 = BUSINESS_CODE_MIN + 4;
pub const ERR_RECORD_NOT_FOUND: u32 = BUSINESS_CODE_MIN + 5;
pub const ERR_ID_INVALID: u32 = BUSINESS_CODE_MIN + 6;

/// First business code free for caller-defined use
pub const BUSINESS_CODE_CUSTOM_START: u32 = BUSINESS_CODE_MIN + 7;

/// Classification bucket of a numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeBucket {
    /// `0`, no classification
    Unset,
    /// Plain HTTP status codes
    Http,
    /// Failures inside this process (io, encoding, ...)
    Internal,
    /// Failures talking to a dependency
    Service,
    /// Domain rule violations caused by the caller
    Business,
    /// Above `BUSINESS_CODE_MAX`
    OutOfRange,
}

impl CodeBucket {
    /// Classify a code
    pub fn of(code: u32) -> Self {
        match code {
            0 => CodeBucket::Unset,
            1..=HTTP_CODE_MAX => CodeBucket::Http,
            INTERNAL_CODE_MIN..SERVICE_CODE_MIN => CodeBucket::Internal,
            SERVICE_CODE_MIN..BUSINESS_CODE_MIN => CodeBucket::Service,
            BUSINESS_CODE_MIN..=BUSINESS_CODE_MAX => CodeBucket::Business,
            _ => CodeBucket::OutOfRange,
        }
    }
}

/// Default human-readable message for a code, or `""` when none is known
///
/// HTTP codes use the canonical reason phrase (`400` -> `"Bad Request"`).
pub fn default_message(code: u32) -> &'static str {
    match CodeBucket::of(code) {
        CodeBucket::Http => u16::try_from(code)
            .ok()
            .and_then(|c| http::StatusCode::from_u16(c).ok())
            .and_then(|s| s.canonical_reason())
            .unwrap_or(""),
        CodeBucket::Internal => internal_message(code),
        CodeBucket::Service => service_message(code),
        CodeBucket::Business => business_message(code),
        CodeBucket::Unset | CodeBucket::OutOfRange => "",
    }
}

/// HTTP status an error with this code is answered with
pub fn status_code(code: u32) -> u16 {
    match CodeBucket::of(code) {
        CodeBucket::Http => match u16::try_from(code) {
            Ok(c) if c >= 100 => c,
            _ => 500,
        },
        CodeBucket::Business => 400,
        CodeBucket::Unset
        | CodeBucket::Internal
        | CodeBucket::Service
        | CodeBucket::OutOfRange => 500,
    }
}

/// Severity an error with this code is logged at
///
/// Client-caused failures (4xx, business rules) are routine and logged at
/// info; server-side and dependency failures are logged at error.
pub fn log_level(code: u32) -> Level {
    if code < 500 {
        return Level::INFO;
    }
    match CodeBucket::of(code) {
        CodeBucket::Http | CodeBucket::Internal | CodeBucket::Service => Level::ERROR,
        CodeBucket::Unset | CodeBucket::Business | CodeBucket::OutOfRange => Level::INFO,
    }
}

fn internal_message(code: u32) -> &'static str {
    match code {
        ERR_IO_INVALID_PATH => "invalid path",
        ERR_IO_NOT_EXIST => "not exist",
        ERR_IO_EXIST => "exist",
        ERR_IO_READ_FAILED => "read failed",
        ERR_IO_CONTENT_REACH_LIMIT => "content reach limit",
        ERR_IO_WRITE_FAILED => "write failed",
        _ => "",
    }
}

fn service_message(code: u32) -> &'static str {
    match code {
        ERR_SVC_TIMEOUT => "timeout",
        ERR_SVC_LOST_CONNECTION => "lost connection",
        ERR_SVC_RECONNECT_TIMEOUT => "reconnect timeout",
        ERR_SVC_AUTH_REQUIRED => "auth required",
        ERR_SVC_PERMISSION_REQUIRED => "permission required",
        _ => "",
    }
}

fn business_message(code: u32) -> &'static str {
    match code {
        ERR_AUTH_WRONG_CREDENTIAL => "username or password is incorrect",
        ERR_AUTH_NO_PERMISSION => "no permission",
        ERR_AUTH_TOKEN_INVALID => "token invalid",
        ERR_AUTH_TOKEN_EXPIRED => "token expired",
        ERR_RECORD_NOT_FOUND => "record not found",
        ERR_ID_INVALID => "id invalid",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(CodeBucket::of(0), CodeBucket::Unset);
        assert_eq!(CodeBucket::of(404), CodeBucket::Http);
        assert_eq!(CodeBucket::of(999), CodeBucket::Http);
        assert_eq!(CodeBucket::of(1000), CodeBucket::Internal);
        assert_eq!(CodeBucket::of(19_999), CodeBucket::Internal);
        assert_eq!(CodeBucket::of(20_000), CodeBucket::Service);
        assert_eq!(CodeBucket::of(49_999), CodeBucket::Service);
        assert_eq!(CodeBucket::of(50_000), CodeBucket::Business);
        assert_eq!(CodeBucket::of(999_999_999), CodeBucket::Business);
        assert_eq!(CodeBucket::of(1_000_000_000), CodeBucket::OutOfRange);
    }

    #[test]
    fn test_status_code_bucketing() {
        assert_eq!(status_code(404), 404);
        assert_eq!(status_code(10_001), 500);
        assert_eq!(status_code(ERR_SVC_TIMEOUT), 500);
        assert_eq!(status_code(1_000_000), 400);
        assert_eq!(status_code(0), 500);
        assert_eq!(status_code(42), 500);
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(default_message(400), "Bad Request");
        assert_eq!(default_message(404), "Not Found");
        assert_eq!(default_message(ERR_IO_READ_FAILED), "read failed");
        assert_eq!(default_message(ERR_SVC_TIMEOUT), "timeout");
        assert_eq!(default_message(ERR_RECORD_NOT_FOUND), "record not found");
        assert_eq!(default_message(BUSINESS_CODE_CUSTOM_START), "");
        assert_eq!(default_message(0), "");
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(log_level(0), Level::INFO);
        assert_eq!(log_level(404), Level::INFO);
        assert_eq!(log_level(503), Level::ERROR);
        assert_eq!(log_level(ERR_IO_WRITE_FAILED), Level::ERROR);
        assert_eq!(log_level(ERR_SVC_LOST_CONNECTION), Level::ERROR);
        assert_eq!(log_level(ERR_AUTH_TOKEN_EXPIRED), Level::INFO);
    }

    #[test]
    fn test_catalog_codes_are_in_their_buckets() {
        for code in [ERR_IO_INVALID_PATH, ERR_IO_WRITE_FAILED, INTERNAL_CODE_CUSTOM_START] {
            assert_eq!(CodeBucket::of(code), CodeBucket::Internal);
        }
        for code in [ERR_SVC_TIMEOUT, SERVICE_CODE_CUSTOM_START] {
            assert_eq!(CodeBucket::of(code), CodeBucket::Service);
        }
        for code in [ERR_AUTH_WRONG_CREDENTIAL, ERR_ID_INVALID, BUSINESS_CODE_CUSTOM_START] {
            assert_eq!(CodeBucket::of(code), CodeBucket::Business);
        }
    }
}
