//! Text renderers for error trees
//!
//! - [`full`]: one line per node, with call sites, for logs
//! - [`brief`]: messages only, joined by `": "`
//! - [`dump`]: every populated field labelled, for debugging

use crate::node::{Cause, ErrorNode};

/// Separates children in [`dump`] output
pub const SEPARATOR: &str = ":\n\t";

const INDENT: &str = "  ";
const CAUSED_BY: &str = "Caused by: ";
const LINKED: &str = "Trace: ";

/// Multi-line rendering with call sites
///
/// ```
/// use errtree_core::{render, ErrorNode};
///
/// let err = ErrorNode::new()
///     .with_message("checkout failed")
///     .with_child(ErrorNode::new().with_message("card declined"));
/// assert_eq!(render::full(&err), "checkout failed\n  Caused by: card declined");
/// ```
pub fn full(node: &ErrorNode) -> String {
    let mut lines = Vec::new();
    full_lines(node, 0, "", &mut lines);
    lines.join("\n")
}

fn full_lines(node: &ErrorNode, depth: usize, prefix: &str, lines: &mut Vec<String>) {
    lines.push(format!("{}{}{}", INDENT.repeat(depth), prefix, headline(node)));

    for child in node.children() {
        cause_lines(child, depth + 1, CAUSED_BY, lines);
    }
    if let Some(linked) = node.linked() {
        cause_lines(linked, depth + 2, LINKED, lines);
    }
}

fn cause_lines(cause: &Cause, depth: usize, prefix: &str, lines: &mut Vec<String>) {
    match cause {
        Cause::Node(node) => full_lines(node, depth, prefix, lines),
        Cause::Foreign(foreign) => {
            lines.push(format!("{}{}{}", INDENT.repeat(depth), prefix, foreign.message()));
        }
    }
}

fn headline(node: &ErrorNode) -> String {
    let Some(trace) = node.trace() else {
        return node.message().to_string();
    };
    let at = if trace.function().is_empty() {
        format!("--- at {}:{} ---", trace.file(), trace.line())
    } else {
        format!(
            "--- at {}:{} ({}) ---",
            trace.file(),
            trace.line(),
            trace.function()
        )
    };
    if node.message().is_empty() {
        at
    } else {
        format!("{} {}", node.message(), at)
    }
}

/// Messages depth-first joined by `": "`, empty ones skipped
pub fn brief(node: &ErrorNode) -> String {
    let mut parts = Vec::new();
    brief_parts(node, &mut parts);
    parts.join(": ")
}

fn brief_parts<'a>(node: &'a ErrorNode, parts: &mut Vec<&'a str>) {
    if !node.message().is_empty() {
        parts.push(node.message());
    }
    for child in node.children() {
        match child {
            Cause::Node(child) => brief_parts(child, parts),
            Cause::Foreign(foreign) if !foreign.message().is_empty() => {
                parts.push(foreign.message())
            }
            Cause::Foreign(_) => {}
        }
    }
}

/// Every populated field on its own labelled line
pub fn dump(node: &ErrorNode) -> String {
    let mut lines = Vec::new();
    if !node.trace_id().is_empty() {
        lines.push(format!("traceId: {}", node.trace_id()));
    }
    if !node.op().is_empty() {
        lines.push(format!("op: {}", node.op()));
    }
    if node.code() > 0 {
        lines.push(format!("code: {}", node.code()));
    }
    if !node.target().is_empty() {
        lines.push(format!("target: {}", node.target()));
    }
    if !node.message().is_empty() {
        lines.push(format!("message: {}", node.message()));
    }
    if let Some(trace) = node.trace() {
        let mut text = format!(
            "trace: {}:{} ({})",
            trace.file(),
            trace.line(),
            trace.function()
        );
        if !trace.raw().is_empty() {
            text.push('\n');
            text.push_str(trace.raw());
        }
        lines.push(text);
    }

    let mut out = lines.join("\n");
    for child in node.children() {
        let text = match child {
            Cause::Node(child) => dump(child),
            Cause::Foreign(foreign) => foreign.message().to_string(),
        };
        if !out.is_empty() {
            out.push_str(SEPARATOR);
        }
        out.push_str(&text);
    }

    if out.is_empty() {
        "no error".to_string()
    } else {
        out
    }
}
