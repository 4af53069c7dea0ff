//! The error tree entity
//!
//! An `ErrorNode` is one classification unit: a numeric code, a message, the
//! key segment it represents inside its parent, the call site that built it,
//! and the ordered causes below it. Nodes own their children outright;
//! composing a new tree always clones, so a prototype shared between threads
//! is never extended in place.

use std::fmt;

use crate::codes;
use crate::keypath::{self, KeyPathError};
use crate::render;
use crate::response::ErrResponse;
use crate::stack::StackTrace;

/// One hierarchical error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorNode {
    pub(crate) code: u32,
    pub(crate) message: String,
    pub(crate) target: String,
    pub(crate) op: String,
    pub(crate) trace_id: String,
    pub(crate) children: Vec<Cause>,
    pub(crate) trace: Option<StackTrace>,
    pub(crate) linked: Option<Box<Cause>>,
}

/// A child of an `ErrorNode`
///
/// Foreign errors keep their text for the human-readable renderers but take
/// no part in response projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    Node(ErrorNode),
    Foreign(ForeignCause),
}

/// A non-tree error, captured by type name and display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignCause {
    type_name: &'static str,
    message: String,
}

impl ErrorNode {
    /// An empty grouping node
    pub fn new() -> Self {
        Self::default()
    }

    /// A node that only names a key segment
    pub fn grouping(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// A field-level failure
    pub fn leaf(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = code;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = op.into();
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    pub fn with_trace(mut self, trace: StackTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Append a child node
    pub fn with_child(mut self, child: ErrorNode) -> Self {
        self.children.push(Cause::Node(child));
        self
    }

    /// Append any cause
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.children.push(cause.into());
        self
    }

    /// Append several child nodes in order
    pub fn with_children(mut self, children: impl IntoIterator<Item = ErrorNode>) -> Self {
        self.children.extend(children.into_iter().map(Cause::Node));
        self
    }

    /// Attach a causally prior error, rendered under `Trace:`
    pub fn with_linked(mut self, linked: impl Into<Cause>) -> Self {
        self.linked = Some(Box::new(linked.into()));
        self
    }

    /// Insert `message` at the position named by `keys`
    ///
    /// Empty key segments leave the tree unchanged; use
    /// [`ErrorNode::try_with_path`] to see why.
    pub fn with_path<S: AsRef<str>>(mut self, keys: &[S], message: impl Into<String>) -> Self {
        keypath::insert(&mut self, keys, message);
        self
    }

    /// Like [`ErrorNode::with_path`], but reports malformed key paths
    ///
    /// # Errors
    ///
    /// Returns [`KeyPathError`] when `keys` is empty or has an empty segment.
    pub fn try_with_path<S: AsRef<str>>(
        mut self,
        keys: &[S],
        message: impl Into<String>,
    ) -> Result<Self, KeyPathError> {
        keypath::try_insert(&mut self, keys, message)?;
        Ok(self)
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn trace(&self) -> Option<&StackTrace> {
        self.trace.as_ref()
    }

    pub fn linked(&self) -> Option<&Cause> {
        self.linked.as_deref()
    }

    pub fn children(&self) -> &[Cause] {
        &self.children
    }

    /// Child causes that are themselves error nodes
    pub fn nodes(&self) -> impl Iterator<Item = &ErrorNode> {
        self.children.iter().filter_map(Cause::as_node)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// HTTP status this error is answered with
    pub fn status_code(&self) -> u16 {
        codes::status_code(self.code)
    }

    /// Project into the API response shape, stamped with `trace_id`
    pub fn to_response(&self, trace_id: impl Into<String>) -> ErrResponse {
        let stamped = self.clone().with_trace_id(trace_id);
        ErrResponse::from_error(&stamped)
    }

    /// Messages depth-first, joined by `": "`
    pub fn brief(&self) -> String {
        render::brief(self)
    }
}

impl fmt::Display for ErrorNode {
    /// `{}` renders the full trace, `{:#}` the brief chain
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str(&render::brief(self))
        } else {
            f.write_str(&render::full(self))
        }
    }
}

impl std::error::Error for ErrorNode {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.children.first().map(|c| c as &(dyn std::error::Error + 'static))
    }
}

impl Cause {
    pub fn as_node(&self) -> Option<&ErrorNode> {
        match self {
            Cause::Node(node) => Some(node),
            Cause::Foreign(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Cause::Node(node) => node.message(),
            Cause::Foreign(foreign) => foreign.message(),
        }
    }
}

impl From<ErrorNode> for Cause {
    fn from(node: ErrorNode) -> Self {
        Cause::Node(node)
    }
}

impl From<ForeignCause> for Cause {
    fn from(foreign: ForeignCause) -> Self {
        Cause::Foreign(foreign)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Node(node) => fmt::Display::fmt(node, f),
            Cause::Foreign(foreign) => fmt::Display::fmt(foreign, f),
        }
    }
}

impl std::error::Error for Cause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Cause::Node(node) => std::error::Error::source(node),
            Cause::Foreign(_) => None,
        }
    }
}

impl ForeignCause {
    /// Capture any error by its type name and display text
    pub fn new<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self {
            type_name: std::any::type_name::<E>(),
            message: err.to_string(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ForeignCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ForeignCause {}
