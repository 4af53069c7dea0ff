//! Argument grammar for building error nodes
//!
//! `e` takes an ordered list of [`Arg`] values and applies one effect per
//! argument kind. Most call sites use the `e!` / `et!` macros, which convert
//! each expression with `Arg::from`:
//!
//! ```
//! use errtree_core::{e, Code, Op, Target};
//!
//! let err = e!(Code(400), Target::new("email"), "must not be empty", Op::new("signup"));
//! assert_eq!(err.code(), 400);
//! assert_eq!(err.target(), "email");
//! assert_eq!(err.message(), "must not be empty");
//! ```

use std::fmt;
use std::panic::Location;

use errtree_core_types::schema::EVENT_BAD_ARGUMENT;

use crate::codes;
use crate::config::{self, TraceMode};
use crate::node::{Cause, ErrorNode, ForeignCause};
use crate::stack::StackCapture;

/// Key segment of an error inside its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target(pub String);

/// Human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(pub String);

/// Call-site label; supplying one disables stack capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op(pub String);

/// Numeric classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code(pub u32);

/// Extra frames to skip when capturing the call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipCaller(pub usize);

impl Target {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Op {
    pub fn new(op: impl Into<String>) -> Self {
        Self(op.into())
    }
}

/// One argument to `e` / `et` / `ErrorBuilder`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Target(String),
    Message(String),
    Op(String),
    /// Plain text, shorthand for a message
    Text(String),
    Code(u32),
    /// Becomes the base node when nothing is classified yet, a child otherwise
    Error(ErrorNode),
    Errors(Vec<ErrorNode>),
    Foreign(ForeignCause),
    SkipCaller(usize),
    /// Causally prior error, kept outside the children
    Trace(Cause),
    /// A value of a kind the grammar does not know
    Unknown { kind: &'static str, value: String },
}

impl Arg {
    /// Wrap any error as a foreign child
    pub fn foreign<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Arg::Foreign(ForeignCause::new(err))
    }

    /// Record a value the grammar does not recognise
    pub fn unknown<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Arg::Unknown {
            kind: std::any::type_name::<T>(),
            value: value.to_string(),
        }
    }
}

/// Link a causally prior error
pub fn trace(cause: impl Into<Cause>) -> Arg {
    Arg::Trace(cause.into())
}

impl From<Target> for Arg {
    fn from(t: Target) -> Self {
        Arg::Target(t.0)
    }
}

impl From<Message> for Arg {
    fn from(m: Message) -> Self {
        Arg::Message(m.0)
    }
}

impl From<Op> for Arg {
    fn from(op: Op) -> Self {
        Arg::Op(op.0)
    }
}

impl From<Code> for Arg {
    fn from(code: Code) -> Self {
        Arg::Code(code.0)
    }
}

impl From<SkipCaller> for Arg {
    fn from(skip: SkipCaller) -> Self {
        Arg::SkipCaller(skip.0)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Text(s.clone())
    }
}

impl From<u32> for Arg {
    fn from(code: u32) -> Self {
        Arg::Code(code)
    }
}

impl From<u16> for Arg {
    fn from(code: u16) -> Self {
        Arg::Code(u32::from(code))
    }
}

impl From<i32> for Arg {
    fn from(code: i32) -> Self {
        match u32::try_from(code) {
            Ok(code) => Arg::Code(code),
            Err(_) => Arg::unknown(&code),
        }
    }
}

impl From<i64> for Arg {
    fn from(code: i64) -> Self {
        match u32::try_from(code) {
            Ok(code) => Arg::Code(code),
            Err(_) => Arg::unknown(&code),
        }
    }
}

impl From<usize> for Arg {
    fn from(code: usize) -> Self {
        match u32::try_from(code) {
            Ok(code) => Arg::Code(code),
            Err(_) => Arg::unknown(&code),
        }
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::unknown(&value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::unknown(&value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::unknown(&value)
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::unknown(&value)
    }
}

impl From<ErrorNode> for Arg {
    fn from(node: ErrorNode) -> Self {
        Arg::Error(node)
    }
}

impl From<&ErrorNode> for Arg {
    fn from(node: &ErrorNode) -> Self {
        Arg::Error(node.clone())
    }
}

impl From<Vec<ErrorNode>> for Arg {
    fn from(nodes: Vec<ErrorNode>) -> Self {
        Arg::Errors(nodes)
    }
}

impl From<&[ErrorNode]> for Arg {
    fn from(nodes: &[ErrorNode]) -> Self {
        Arg::Errors(nodes.to_vec())
    }
}

impl From<ForeignCause> for Arg {
    fn from(foreign: ForeignCause) -> Self {
        Arg::Foreign(foreign)
    }
}

/// Which errors may replace the accumulating node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Absorb {
    /// The first error while the accumulator has no code
    FirstWhileUncoded,
    /// As above, and only if the error has no code of its own
    UncodedOnly,
}

/// Build an error node from its arguments
///
/// # Panics
///
/// Panics when `args` is empty: every error needs at least one discriminator.
#[track_caller]
pub fn e(args: Vec<Arg>) -> ErrorNode {
    build(args, Absorb::FirstWhileUncoded)
}

/// Build an error node for the field `target`
///
/// `target` wins over any `Target` in `args`.
#[track_caller]
pub fn et(target: impl Into<String>, mut args: Vec<Arg>) -> ErrorNode {
    args.push(Arg::Target(target.into()));
    e(args)
}

/// Classify `args` into a node, stamping the first caller outside errtree
#[track_caller]
pub(crate) fn build(args: Vec<Arg>, absorb: Absorb) -> ErrorNode {
    if args.is_empty() {
        panic!("call to errtree::e with no arguments");
    }

    let mut skip = 0;
    let mut node = ErrorNode::new();
    let mut absorbed = false;

    for arg in args {
        match arg {
            Arg::Target(target) => node.target = target,
            Arg::Message(message) | Arg::Text(message) => node.message = message,
            Arg::Op(op) => node.op = op,
            Arg::Code(code) => node.code = code,
            Arg::Error(err) => {
                let eligible = match absorb {
                    Absorb::FirstWhileUncoded => true,
                    Absorb::UncodedOnly => err.code == 0,
                };
                if node.code == 0 && !absorbed && eligible {
                    node = err;
                    absorbed = true;
                } else {
                    node.children.push(Cause::Node(err));
                }
            }
            Arg::Errors(errs) => node.children.extend(errs.into_iter().map(Cause::Node)),
            Arg::Foreign(foreign) => node.children.push(Cause::Foreign(foreign)),
            Arg::SkipCaller(extra) => skip += extra,
            Arg::Trace(cause) => node.linked = Some(Box::new(cause)),
            Arg::Unknown { kind, value } => {
                node.children.push(Cause::Node(bad_argument(kind, &value)));
            }
        }
    }

    if node.message.is_empty() && node.code > 0 {
        node.message = codes::default_message(node.code).to_string();
    }

    stamp_call_site(&mut node, skip);
    node
}

/// Fill `op` and `trace` from the call site unless `op` is already set
///
/// `skip` counts frames beyond the first caller outside errtree.
pub(crate) fn stamp_call_site(node: &mut ErrorNode, skip: usize) {
    if !node.op.is_empty() || config::trace_mode() == TraceMode::Suppress {
        return;
    }
    let trace = StackCapture::new(skip).capture();
    node.op = trace.function().to_string();
    node.trace = Some(trace);
}

/// Synthetic child for an argument of unknown kind, logged at the call site
#[track_caller]
pub(crate) fn bad_argument(kind: &str, value: &str) -> ErrorNode {
    let location = Location::caller();
    tracing::warn!(
        component = module_path!(),
        event = EVENT_BAD_ARGUMENT,
        file = location.file(),
        line = location.line(),
        kind,
        value,
        "errtree: bad call from {}:{}",
        location.file(),
        location.line(),
    );
    ErrorNode::new().with_message(format!(
        "unknown type {}, value {} in error call",
        kind, value
    ))
}
