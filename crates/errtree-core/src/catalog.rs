//! Shared prototypes for common failures
//!
//! Each static is built on first use and read concurrently afterwards;
//! `err` always clones, so callers never see each other's additions.

use std::sync::LazyLock;

use crate::args::Arg;
use crate::builder::ErrorBuilder;
use crate::codes;

fn prototype(code: u32) -> ErrorBuilder {
    ErrorBuilder::new(vec![Arg::Code(code)])
}

pub static BAD_REQUEST: LazyLock<ErrorBuilder> = LazyLock::new(|| prototype(400));
pub static UNAUTHORIZED: LazyLock<ErrorBuilder> = LazyLock::new(|| prototype(401));
pub static FORBIDDEN: LazyLock<ErrorBuilder> = LazyLock::new(|| prototype(403));
pub static NOT_FOUND: LazyLock<ErrorBuilder> = LazyLock::new(|| prototype(404));
pub static CONFLICT: LazyLock<ErrorBuilder> = LazyLock::new(|| prototype(409));
pub static INTERNAL: LazyLock<ErrorBuilder> = LazyLock::new(|| prototype(500));

pub static RECORD_NOT_FOUND: LazyLock<ErrorBuilder> =
    LazyLock::new(|| prototype(codes::ERR_RECORD_NOT_FOUND));
pub static ID_INVALID: LazyLock<ErrorBuilder> = LazyLock::new(|| prototype(codes::ERR_ID_INVALID));
pub static TOKEN_EXPIRED: LazyLock<ErrorBuilder> =
    LazyLock::new(|| prototype(codes::ERR_AUTH_TOKEN_EXPIRED));
pub static SERVICE_TIMEOUT: LazyLock<ErrorBuilder> =
    LazyLock::new(|| prototype(codes::ERR_SVC_TIMEOUT));
