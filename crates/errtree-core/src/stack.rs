//! Call-site capture
//!
//! `StackCapture::capture` snapshots the current backtrace and resolves the
//! frame `skip` levels above its own caller. Frame resolution works on the
//! rendered backtrace text, so it can be exercised with fixture traces.
//!
//! Skip depth is counted from the first frame above `capture` that lies
//! outside this crate: `0` is that frame, `1` its caller, and so on. Frames
//! of errtree itself are passed over regardless of how many of them survive
//! inlining and tail calls, so `e`, `et` and `ErrorBuilder::err` all report
//! the code that called them in debug and optimised builds alike.

use std::backtrace::Backtrace;

use crate::cleanpath;

/// Function name suffix that anchors frame counting
const CAPTURE_MARKER: &str = "StackCapture::capture";

/// Symbol prefix of this crate's own frames
const INTERNAL_PREFIX: &str = "errtree_core::";

/// Frames belonging to process start-up, thread start-up, or lazy statics
const BOOTSTRAP_PREFIXES: &[&str] = &[
    "std::rt::",
    "std::sys::",
    "std::sync::",
    "std::thread::",
    "std::panicking::",
    "std::panic::",
    "core::ops::function::",
    "__rust_",
    "__libc_start",
    "_start",
];

/// Resolved call site plus the raw frames above it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
    file: String,
    line: u32,
    function: String,
    raw: String,
}

impl StackTrace {
    pub fn new(
        file: impl Into<String>,
        line: u32,
        function: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
            raw: raw.into(),
        }
    }

    /// Trace for a caller that could not be resolved
    pub fn unresolved(raw: impl Into<String>) -> Self {
        Self::new("", 0, "?", raw)
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Short function name (`Type::method` or `function`)
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Raw frames starting at the resolved one
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// One symbol line of a rendered backtrace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: String,
    pub file: String,
    pub line: u32,
    /// Index of the symbol line within the raw text
    text_line: usize,
}

/// Captures the call site `skip` levels above the caller of `capture`
#[derive(Debug, Clone, Copy, Default)]
pub struct StackCapture {
    skip: usize,
}

impl StackCapture {
    pub fn new(skip: usize) -> Self {
        Self { skip }
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    #[inline(never)]
    pub fn capture(&self) -> StackTrace {
        let raw = Backtrace::force_capture().to_string();
        let clean = cleanpath::clean_path();
        resolve(&raw, self.skip, clean.as_ref())
    }
}

/// Resolve the frame `skip` levels above the first non-errtree caller of
/// `StackCapture::capture`
///
/// Returns `StackTrace::unresolved` with the full text when the anchor frame
/// or the requested frame is missing (no symbols, too few frames). Bootstrap
/// frames keep their location but drop the function name and raw frames.
pub fn resolve(raw: &str, skip: usize, clean: &dyn Fn(&str) -> String) -> StackTrace {
    let frames = parse_frames(raw);

    let Some(anchor) = frames
        .iter()
        .position(|f| f.function.ends_with(CAPTURE_MARKER))
    else {
        return StackTrace::unresolved(raw);
    };

    let caller = frames[anchor + 1..]
        .iter()
        .position(|f| !is_internal(&f.function))
        .map_or(frames.len(), |offset| anchor + 1 + offset);

    let Some(frame) = frames.get(caller + skip) else {
        return StackTrace::unresolved(raw);
    };

    if frame.function == "<unknown>" && frame.file.is_empty() {
        return StackTrace::unresolved(raw);
    }

    let file = if frame.file.is_empty() {
        String::new()
    } else {
        clean(&frame.file)
    };

    if is_bootstrap(&frame.function) {
        return StackTrace::new(file, frame.line, "", "");
    }

    let clipped = raw
        .lines()
        .skip(frame.text_line)
        .collect::<Vec<_>>()
        .join("\n");

    StackTrace::new(file, frame.line, short_name(&frame.function), clipped)
}

/// Parse the text form of a `std::backtrace::Backtrace`
///
/// Each symbol becomes its own frame, so inlined functions count as levels.
pub fn parse_frames(raw: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("note:") {
            continue;
        }

        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(last) = frames.last_mut() {
                let (file, line_no) = split_location(location);
                last.file = file;
                last.line = line_no;
            }
            continue;
        }

        frames.push(Frame {
            function: symbol_name(trimmed),
            file: String::new(),
            line: 0,
            text_line: idx,
        });
    }

    frames
}

/// `Type::method` or `function`, with module path, generics and hash removed
///
/// - `shop::orders::OrderService::create` -> `OrderService::create`
/// - `<shop::Money as core::fmt::Display>::fmt` -> `Money::fmt`
/// - `shop::orders::validate::{{closure}}` -> `validate::{{closure}}`
pub fn short_name(full: &str) -> String {
    let full = strip_hash(full);

    if let Some(inner) = full.strip_prefix('<') {
        if let Some(close) = matching_angle(inner) {
            let qualified = &inner[..close];
            let self_ty = qualified.split(" as ").next().unwrap_or(qualified);
            let ty = split_path(self_ty).last().copied().unwrap_or(self_ty);
            let method = inner[close + 1..].trim_start_matches("::");
            return format!("{}::{}", strip_generics(ty), method);
        }
    }

    let segments: Vec<&str> = split_path(full);
    let closures = segments
        .iter()
        .rev()
        .take_while(|s| s.starts_with("{{"))
        .count();
    let named = &segments[..segments.len() - closures];

    let mut parts: Vec<String> = Vec::new();
    if let Some((func, rest)) = named.split_last() {
        if let Some(owner) = rest.last() {
            if owner.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                parts.push(strip_generics(owner).to_string());
            }
        }
        parts.push(strip_generics(func).to_string());
    }
    parts.extend(segments[segments.len() - closures..].iter().map(|s| s.to_string()));

    parts.join("::")
}

/// Runtime start-up and lazy-static initialiser frames
///
/// A closure directly under a `SCREAMING_CASE` segment is the initialiser of
/// a `static`; errors built there are prototypes, not reportable call sites.
pub fn is_bootstrap(full: &str) -> bool {
    let full = strip_hash(full);
    if full == "main" || full.contains("lang_start") {
        return true;
    }
    if BOOTSTRAP_PREFIXES.iter().any(|p| full.starts_with(p)) {
        return true;
    }

    let segments = split_path(full);
    match segments.iter().position(|s| s.starts_with("{{")) {
        Some(idx) if idx > 0 => {
            let owner = segments[idx - 1];
            owner.chars().any(|c| c.is_ascii_uppercase())
                && owner
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        }
        _ => false,
    }
}

/// A frame inside errtree itself, its unit tests excepted
fn is_internal(full: &str) -> bool {
    let full = full.trim_start_matches('<');
    full.starts_with(INTERNAL_PREFIX) && !full.contains("::tests::")
}

fn symbol_name(line: &str) -> String {
    // "12: name", "12: 0x7f.. - name" or a bare inlined "name"
    let rest = match line.split_once(": ") {
        Some((idx, rest)) if idx.chars().all(|c| c.is_ascii_digit()) => rest.trim_start(),
        _ => line,
    };
    let rest = match rest.split_once(" - ") {
        Some((addr, name)) if addr.starts_with("0x") => name,
        _ => rest,
    };
    strip_hash(rest.trim()).to_string()
}

fn split_location(location: &str) -> (String, u32) {
    // "path:line:col", the path itself may contain ':' (Windows drives)
    let mut parts = location.rsplitn(3, ':');
    let col = parts.next();
    let line = parts.next();
    let path = parts.next();
    match (path, line, col) {
        (Some(path), Some(line), Some(_)) => (path.to_string(), line.parse().unwrap_or(0)),
        _ => (location.to_string(), 0),
    }
}

fn strip_hash(name: &str) -> &str {
    match name.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()) => {
            head
        }
        _ => name,
    }
}

fn strip_generics(segment: &str) -> &str {
    match segment.find('<') {
        Some(idx) if idx > 0 => &segment[..idx],
        _ => segment,
    }
}

/// Split on `::` outside of angle brackets
fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut depth = 0usize;
    let mut start = 0;
    let mut segments = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}

/// Index of the `>` closing an already-opened `<`
fn matching_angle(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/abc/library/std/src/../../backtrace/src/backtrace/libunwind.rs:116:5
   1: std::backtrace::Backtrace::create
             at /rustc/abc/library/std/src/backtrace.rs:331:13
   2: errtree_core::stack::StackCapture::capture
             at ./crates/errtree-core/src/stack.rs:120:19
   3: errtree_core::args::build
             at ./crates/errtree-core/src/args.rs:200:21
   4: errtree_core::args::e
             at ./crates/errtree-core/src/args.rs:150:5
   5: shop::orders::OrderService::create
             at ./src/orders.rs:42:17
   6: shop::main
             at ./src/main.rs:7:5
   7: core::ops::function::FnOnce::call_once
             at /rustc/abc/library/core/src/ops/function.rs:250:5";

    fn identity(path: &str) -> String {
        path.to_string()
    }

    #[test]
    fn test_parse_frames() {
        let frames = parse_frames(FIXTURE);
        assert_eq!(frames.len(), 8);
        assert_eq!(frames[2].function, "errtree_core::stack::StackCapture::capture");
        assert_eq!(frames[5].file, "./src/orders.rs");
        assert_eq!(frames[5].line, 42);
    }

    // optimised build: `e` tail-called `build` and lost its frame
    const OPTIMISED_FIXTURE: &str = "   0: std::backtrace::Backtrace::create
   1: errtree_core::stack::StackCapture::capture
   2: errtree_core::args::stamp_call_site
   3: errtree_core::args::build
   4: shop::orders::place_order
   5: core::ops::function::FnOnce::call_once
   6: std::rt::lang_start_internal";

    #[test]
    fn test_resolve_skip_depth() {
        let trace = resolve(FIXTURE, 0, &identity);
        assert_eq!(trace.function(), "OrderService::create");
        assert_eq!(trace.file(), "./src/orders.rs");
        assert_eq!(trace.line(), 42);
        assert!(trace.raw().starts_with("   5: shop::orders::OrderService::create"));
        assert!(!trace.raw().contains("StackCapture::capture"));

        let trace = resolve(FIXTURE, 1, &identity);
        assert_eq!(trace.function(), "main");
        assert_eq!(trace.line(), 7);
    }

    #[test]
    fn test_resolve_ignores_missing_internal_frames() {
        let trace = resolve(OPTIMISED_FIXTURE, 0, &identity);
        assert_eq!(trace.function(), "place_order");
        assert_eq!(trace.file(), "");
        assert_eq!(trace.line(), 0);
        assert!(trace.raw().starts_with("   4: shop::orders::place_order"));

        let trace = resolve(OPTIMISED_FIXTURE, 1, &identity);
        assert_eq!(trace.function(), "");
        assert_eq!(trace.raw(), "");
    }

    #[test]
    fn test_resolve_counts_crate_unit_tests_as_callers() {
        let raw = "   0: errtree_core::stack::StackCapture::capture
   1: errtree_core::args::build
   2: errtree_core::args::tests::test_scalar_kinds
   3: core::ops::function::FnOnce::call_once";
        let trace = resolve(raw, 0, &identity);
        assert_eq!(trace.function(), "test_scalar_kinds");
    }

    #[test]
    fn test_is_internal() {
        assert!(is_internal("errtree_core::args::e"));
        assert!(is_internal("<errtree_core::node::ErrorNode as core::fmt::Display>::fmt"));
        assert!(!is_internal("errtree_core::stack::tests::test_is_internal"));
        assert!(!is_internal("shop::errtree_core_shim::run"));
    }

    #[test]
    fn test_resolve_applies_clean_path() {
        let clean = |p: &str| p.trim_start_matches("./").to_string();
        let trace = resolve(FIXTURE, 0, &clean);
        assert_eq!(trace.file(), "src/orders.rs");
    }

    #[test]
    fn test_resolve_bootstrap_frame_suppresses_name_and_raw() {
        let trace = resolve(FIXTURE, 2, &identity);
        assert_eq!(trace.function(), "");
        assert_eq!(trace.raw(), "");
        assert!(trace.file().ends_with("function.rs"));
    }

    #[test]
    fn test_resolve_unresolved_when_too_deep() {
        let trace = resolve(FIXTURE, 40, &identity);
        assert_eq!(trace.file(), "");
        assert_eq!(trace.line(), 0);
        assert_eq!(trace.function(), "?");
        assert_eq!(trace.raw(), FIXTURE);
    }

    #[test]
    fn test_resolve_unresolved_without_anchor() {
        let raw = "   0: <unknown>\n   1: <unknown>";
        let trace = resolve(raw, 0, &identity);
        assert_eq!(trace, StackTrace::unresolved(raw));
    }

    #[test]
    fn test_parse_frames_with_addresses_and_inlined_symbols() {
        let raw = "   0:     0x55d8c1b0f6a3 - app::outer::h0123456789abcdef
             at ./src/lib.rs:10:5
                  app::inner
             at ./src/lib.rs:20:9";
        let frames = parse_frames(raw);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].function, "app::outer");
        assert_eq!(frames[1].function, "app::inner");
        assert_eq!(frames[1].line, 20);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("shop::orders::OrderService::create"), "OrderService::create");
        assert_eq!(short_name("shop::orders::validate"), "validate");
        assert_eq!(short_name("<shop::Money as core::fmt::Display>::fmt"), "Money::fmt");
        assert_eq!(short_name("shop::orders::validate::{{closure}}"), "validate::{{closure}}");
        assert_eq!(short_name("shop::Repo<T>::find"), "Repo::find");
        assert_eq!(short_name("shop::handler::h0123456789abcdef"), "handler");
        assert_eq!(short_name("main"), "main");
    }

    #[test]
    fn test_is_bootstrap() {
        assert!(is_bootstrap("main"));
        assert!(is_bootstrap("std::rt::lang_start::{{closure}}"));
        assert!(is_bootstrap("core::ops::function::FnOnce::call_once"));
        assert!(is_bootstrap("shop::errors::NOT_FOUND::{{closure}}"));
        assert!(!is_bootstrap("shop::orders::OrderService::create"));
        assert!(!is_bootstrap("shop::orders::validate::{{closure}}"));
    }

    #[test]
    fn test_live_capture_never_panics() {
        let trace = StackCapture::new(0).capture();
        // "?" when the test binary carries no symbols
        if trace.function() != "?" {
            assert!(trace.function().contains("test_live_capture_never_panics"));
            assert!(trace.line() > 0);
        }
    }
}
