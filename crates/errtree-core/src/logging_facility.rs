//! Structured logging for error trees
//!
//! - Single initialization point via `init(profile)`
//! - `log_err!` emits an error tree at the severity its code maps to
//! - `Log` capability with a `tracing`-backed sink and per-request `LogInfo`
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use errtree_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod sink;
pub mod test_capture;

pub use init::{init, Profile};
pub use sink::{log_error, Environment, Log, LogInfo, RequestInfo, Service, TracingLog};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
