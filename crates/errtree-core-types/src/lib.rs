//! Core types shared by the errtree error and logging facilities
//!
//! - **Correlation types**: TraceId
//! - **Schema constants**: canonical structured-log keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::TraceId;
