//! Call-origin traces.
//!
//! A trace is a newline separated list of frames that led to a call, with the
//! frames that belong to this crate removed. Backtraces are only captured when
//! the runtime allows it (`RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`); the caller
//! location of a chain operation is always available through `#[track_caller]`.

use std::{
    backtrace::{Backtrace, BacktraceStatus},
    borrow::Cow,
    panic::Location,
    rc::Rc,
    sync::LazyLock,
};

use regex::Regex;

static FRAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches: "   4: testit::chain::ChainView::it"
    Regex::new(r"^\s*\d+:\s+(?P<symbol>.+)$").expect("frame pattern is valid")
});

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches: "             at ./src/chain.rs:81:9"
    Regex::new(r"^\s+at\s+(?P<location>.+)$").expect("location pattern is valid")
});

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*at\s+|@)").expect("marker pattern is valid"));

const CAPTURE_FN: &str = "trace::capture";

/// Decides which trace lines belong to the engine and are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFilter {
    markers: Vec<Cow<'static, str>>,
    backtraces: bool,
}

impl Default for TraceFilter {
    fn default() -> Self {
        Self {
            markers: vec![
                Cow::Borrowed(concat!(env!("CARGO_CRATE_NAME"), "::")),
                Cow::Borrowed(concat!(env!("CARGO_MANIFEST_DIR"), "/src/")),
                Cow::Borrowed("std::backtrace"),
            ],
            backtraces: true,
        }
    }
}

impl TraceFilter {
    /// A filter that only applies the structural rules and keeps every frame.
    pub fn empty() -> Self {
        Self {
            markers: Vec::new(),
            backtraces: true,
        }
    }

    pub fn with_marker(mut self, marker: impl Into<Cow<'static, str>>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Whether to capture backtraces at all. Without them a trace is just
    /// the caller location.
    pub fn with_backtraces(self, backtraces: bool) -> Self {
        Self { backtraces, ..self }
    }

    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(AsRef::as_ref)
    }

    fn is_engine_frame(&self, line: &str) -> bool {
        self.markers.iter().any(|marker| line.contains(marker.as_ref()))
    }

    /// Filter a raw rendered stack.
    ///
    /// Empty lines, header lines naming `kind`, the capture routine itself and
    /// engine frames are dropped; a leading `at ` or `@` is stripped.
    pub fn apply(&self, raw: &str, kind: &str) -> String {
        fold_frames(raw)
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| kind.is_empty() || !line.contains(kind))
            .filter(|line| !line.contains(CAPTURE_FN))
            .filter(|line| !self.is_engine_frame(line))
            .map(|line| MARKER_RE.replace(line.trim_end(), "").into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Folds `std` backtrace frames ("N: symbol" followed by "at path") onto a
/// single line. Lines of any other shape pass through untouched.
fn fold_frames(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut open_frame = false;
    for line in raw.lines() {
        if let Some(caps) = FRAME_RE.captures(line) {
            lines.push(caps["symbol"].to_string());
            open_frame = true;
            continue;
        }
        if open_frame && let Some(caps) = LOCATION_RE.captures(line) {
            if let Some(last) = lines.last_mut() {
                last.push_str(&format!(" ({})", &caps["location"]));
            }
            open_frame = false;
            continue;
        }
        open_frame = false;
        lines.push(line.to_string());
    }
    lines
}

/// Capture the current stack, filtered.
///
/// Returns `None` if the runtime provides no backtrace or nothing survives
/// filtering.
pub fn capture(kind: &str, filter: &TraceFilter) -> Option<String> {
    raw(filter).and_then(|backtrace| filtered(&backtrace, kind, filter))
}

fn raw(filter: &TraceFilter) -> Option<Backtrace> {
    if !filter.backtraces {
        return None;
    }
    let backtrace = Backtrace::capture();
    (backtrace.status() == BacktraceStatus::Captured).then_some(backtrace)
}

fn filtered(backtrace: &Backtrace, kind: &str, filter: &TraceFilter) -> Option<String> {
    let trace = filter.apply(&backtrace.to_string(), kind);
    (!trace.is_empty()).then_some(trace)
}

/// Where a chain view was made.
///
/// Holds the caller location and the unresolved stack; symbols are only
/// resolved when the trace is rendered.
#[derive(Debug, Clone)]
pub(crate) struct Origin {
    location: &'static Location<'static>,
    backtrace: Option<Rc<Backtrace>>,
}

impl Origin {
    pub(crate) fn capture(location: &'static Location<'static>, filter: &TraceFilter) -> Self {
        Self {
            location,
            backtrace: raw(filter).map(Rc::new),
        }
    }

    /// The caller location, then any frames that survive filtering.
    pub(crate) fn render(&self, filter: &TraceFilter) -> String {
        let mut trace = self.location.to_string();
        let frames = self
            .backtrace
            .as_deref()
            .and_then(|backtrace| filtered(backtrace, "Error", filter));
        if let Some(frames) = frames {
            trace.push('\n');
            trace.push_str(&frames);
        }
        trace
    }
}

/// Keep the first `depth + 1` lines.
pub fn truncate(trace: &str, depth: usize) -> String {
    trace
        .lines()
        .take(depth.saturating_add(1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCRIPT_STACK: &str = "Error: boom
    at getTrace (http://host/lib/testit.js:10:5)
    at makeGroup (http://host/lib/testit.js:20:9)

    at checkout (http://host/app.js:3:1)
@http://host/app.js:9:2";

    const RUST_STACK: &str = "   0: std::backtrace::Backtrace::capture
             at /rustc/library/std/src/backtrace.rs:296:9
   1: testit::trace::capture
             at ./src/trace.rs:90:21
   2: testit::chain::ChainView::it
             at ./src/chain.rs:120:9
   3: demo::main
             at ./demos/basic.rs:12:5
   4: core::ops::function::FnOnce::call_once";

    #[test]
    fn script_stacks_lose_headers_engine_frames_and_markers() {
        let filter = TraceFilter::empty().with_marker("/testit.");
        assert_eq!(
            filter.apply(SCRIPT_STACK, "Error"),
            "checkout (http://host/app.js:3:1)\nhttp://host/app.js:9:2"
        );
    }

    #[test]
    fn backtrace_frames_fold_onto_one_line() {
        let filter = TraceFilter::empty()
            .with_marker("testit::")
            .with_marker("std::backtrace");
        assert_eq!(
            filter.apply(RUST_STACK, "Error"),
            "demo::main (./demos/basic.rs:12:5)\ncore::ops::function::FnOnce::call_once"
        );
    }

    #[test]
    fn empty_kind_does_not_drop_everything() {
        assert_eq!(TraceFilter::empty().apply("a\nb", ""), "a\nb");
    }

    #[test]
    fn truncation_keeps_depth_plus_one_lines() {
        assert_eq!(truncate("a\nb\nc", 0), "a");
        assert_eq!(truncate("a\nb\nc", 1), "a\nb");
        assert_eq!(truncate("a\nb\nc", 10), "a\nb\nc");
    }

    #[test]
    fn disabled_backtraces_leave_only_the_location() {
        let filter = TraceFilter::default().with_backtraces(false);
        assert_eq!(capture("Error", &filter), None);
        let location = Location::caller();
        let origin = Origin::capture(location, &filter);
        assert!(origin.backtrace.is_none());
        assert_eq!(origin.render(&filter), location.to_string());
    }

    #[test]
    fn location_always_leads_the_trace() {
        let location = Location::caller();
        let filter = TraceFilter::default();
        let trace = Origin::capture(location, &filter).render(&filter);
        assert!(trace.starts_with(&location.to_string()));
    }
}
