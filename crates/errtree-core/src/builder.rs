//! Reusable error prototypes
//!
//! An `ErrorBuilder` carries a default code, message and children. Each
//! `err` call builds a fresh node from its own arguments and then fills in
//! whatever the call left unset, so one prototype can be shared by every
//! request handler:
//!
//! ```
//! use errtree_core::{args, ErrorBuilder, Op, Target};
//!
//! let not_found = ErrorBuilder::new(args![404, "record not found"]);
//! let err = not_found.err(args![Target::new("order"), Op::new("load_order")]);
//! assert_eq!(err.code(), 404);
//! assert_eq!(err.message(), "record not found");
//! assert_eq!(err.target(), "order");
//! ```

use crate::args::{self, Absorb, Arg};
use crate::codes;
use crate::node::{Cause, ErrorNode};

/// Immutable defaults applied to every error built from it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBuilder {
    code: u32,
    message: String,
    children: Vec<Cause>,
}

impl ErrorBuilder {
    /// Collect defaults from `args`
    ///
    /// Only messages, codes and errors make sense on a prototype; any other
    /// argument becomes a diagnostic child.
    #[track_caller]
    pub fn new(args: Vec<Arg>) -> Self {
        let mut builder = Self::default();
        for arg in args {
            match arg {
                Arg::Message(message) | Arg::Text(message) => builder.message = message,
                Arg::Code(code) => builder.code = code,
                Arg::Error(err) => builder.children.push(Cause::Node(err)),
                Arg::Errors(errs) => builder.children.extend(errs.into_iter().map(Cause::Node)),
                Arg::Foreign(foreign) => builder.children.push(Cause::Foreign(foreign)),
                Arg::Unknown { kind, value } => builder.push_bad_argument(kind, &value),
                Arg::Target(target) => builder.push_bad_argument("Target", &target),
                Arg::Op(op) => builder.push_bad_argument("Op", &op),
                Arg::SkipCaller(skip) => builder.push_bad_argument("SkipCaller", &skip.to_string()),
                Arg::Trace(cause) => builder.push_bad_argument("Trace", cause.message()),
            }
        }
        builder
    }

    #[track_caller]
    fn push_bad_argument(&mut self, kind: &str, value: &str) {
        self.children
            .push(Cause::Node(args::bad_argument(kind, value)));
    }

    /// Build an error from `args`, then apply this builder's defaults
    ///
    /// The call's code and message win. An error argument only becomes the
    /// base node when it has no code of its own; a coded one is kept as a
    /// child so the prototype's classification stays on top.
    #[track_caller]
    pub fn err(&self, args: Vec<Arg>) -> ErrorNode {
        let mut node = if args.is_empty() {
            // a bare prototype call still records its call site
            let mut node = ErrorNode::new();
            args::stamp_call_site(&mut node, 0);
            node
        } else {
            args::build(args, Absorb::UncodedOnly)
        };

        if node.code == 0 {
            node.code = self.code;
        }
        if node.message.is_empty() {
            node.message = if self.message.is_empty() {
                codes::default_message(node.code).to_string()
            } else {
                self.message.clone()
            };
        }
        node.children.extend(self.children.iter().cloned());
        node
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn children(&self) -> &[Cause] {
        &self.children
    }

    /// Same defaults with a different message
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self.clone()
        }
    }

    /// Same defaults with a different code
    pub fn with_code(&self, code: u32) -> Self {
        Self {
            code,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{Code, Op};

    fn op() -> Arg {
        Arg::from(Op::new("test"))
    }

    #[test]
    fn test_new_collects_defaults() {
        let builder = ErrorBuilder::new(vec![
            Arg::from(404),
            Arg::from("not found"),
            Arg::from(ErrorNode::leaf("id", "missing")),
        ]);
        assert_eq!(builder.code(), 404);
        assert_eq!(builder.message(), "not found");
        assert_eq!(builder.children().len(), 1);
    }

    #[test]
    fn test_new_turns_unknown_args_into_children() {
        let builder = ErrorBuilder::new(vec![Arg::from(400), Arg::from(1.5f64)]);
        assert_eq!(builder.children().len(), 1);
        assert_eq!(
            builder.children()[0].message(),
            "unknown type f64, value 1.5 in error call"
        );
    }

    #[test]
    fn test_err_applies_defaults() {
        let builder = ErrorBuilder::new(vec![Arg::from(400), Arg::from("bad input")]);
        let err = builder.err(vec![op()]);
        assert_eq!(err.code(), 400);
        assert_eq!(err.message(), "bad input");
        assert_eq!(err.op(), "test");
    }

    #[test]
    fn test_err_call_values_win() {
        let builder = ErrorBuilder::new(vec![Arg::from(400), Arg::from("bad input")]);
        let err = builder.err(vec![op(), Arg::from(Code(422)), Arg::from("unprocessable")]);
        assert_eq!(err.code(), 422);
        assert_eq!(err.message(), "unprocessable");
    }

    #[test]
    fn test_err_derives_message_from_builder_code() {
        let builder = ErrorBuilder::new(vec![Arg::from(404)]);
        assert_eq!(builder.err(vec![op()]).message(), "Not Found");
    }

    #[test]
    fn test_err_appends_builder_children_last() {
        let builder = ErrorBuilder::new(vec![
            Arg::from(400),
            Arg::from(ErrorNode::leaf("proto", "p")),
        ]);
        let err = builder.err(vec![op(), Arg::from(vec![ErrorNode::leaf("call", "c")])]);

        let targets: Vec<&str> = err.nodes().map(|n| n.target()).collect();
        assert_eq!(targets, vec!["call", "proto"]);
        assert_eq!(builder.children().len(), 1);
    }

    #[test]
    fn test_err_absorbs_only_uncoded_errors() {
        let builder = ErrorBuilder::new(vec![Arg::from(400)]);

        let uncoded = ErrorNode::new().with_message("wrapped").with_op("inner");
        let err = builder.err(vec![Arg::from(uncoded)]);
        assert_eq!(err.code(), 400);
        assert_eq!(err.message(), "wrapped");
        assert_eq!(err.op(), "inner");
        assert!(!err.has_children());

        let coded = ErrorNode::new().with_code(404).with_op("inner");
        let err = builder.err(vec![op(), Arg::from(coded.clone())]);
        assert_eq!(err.code(), 400);
        assert_eq!(err.children(), &[Cause::Node(coded)]);
    }

    #[test]
    fn test_with_message_leaves_original() {
        let builder = ErrorBuilder::new(vec![Arg::from(400), Arg::from("a")]);
        let other = builder.with_message("b");
        assert_eq!(builder.message(), "a");
        assert_eq!(other.message(), "b");
        assert_eq!(other.code(), 400);
        assert_eq!(builder.with_code(409).code(), 409);
    }

    #[test]
    fn test_builder_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ErrorBuilder>();
    }
}
