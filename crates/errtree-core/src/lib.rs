//! Hierarchical structured errors
//!
//! Call sites build [`ErrorNode`] trees from loosely-typed argument lists,
//! classify them with numeric codes and key paths, and project the result
//! into a nested API response:
//!
//! ```
//! use errtree_core::{e, CombinedError, Op};
//!
//! let invalid = CombinedError::new(400, "invalid order")
//!     .add(["items", "0", "amount"], "must be positive")
//!     .to_error();
//! let err = e!(invalid, Op::new("place_order"));
//!
//! let body = serde_json::to_value(err.to_response("trace-1")).unwrap();
//! assert_eq!(body["errors"]["items"]["0"]["amount"][0], "must be positive");
//! ```

pub mod args;
pub mod builder;
pub mod catalog;
pub mod cleanpath;
pub mod codes;
pub mod config;
pub mod keypath;
pub mod logging_facility;
mod macros;
pub mod node;
pub mod render;
pub mod response;
pub mod stack;

pub use errtree_core_types::{schema, TraceId};

pub use args::{e, et, trace, Arg, Code, Message, Op, SkipCaller, Target};
pub use builder::ErrorBuilder;
pub use codes::CodeBucket;
pub use config::{ConfigError, ErrTreeConfig, TraceMode};
pub use keypath::{CombinedError, CombinedItem, KeyPathError};
pub use node::{Cause, ErrorNode, ForeignCause};
pub use response::{Detail, DetailMap, ErrResponse};
pub use stack::{StackCapture, StackTrace};
