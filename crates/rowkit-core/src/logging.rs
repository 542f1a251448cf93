//! Logging facilities for rowkit.
//!
//! rowkit uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("rowkit=trace")
//!     .init();
//! ```
//!
//! Every subsystem logs under its own target (see [`targets`]) so hosts can
//! silence per-event tracing while keeping registry and diff summaries.

/// Span names used throughout rowkit.
pub mod span_names {
    /// Snapshot diff computation.
    pub const DIFF: &str = "rowkit::diff";
    /// Dispatch of an edit script to the observer.
    pub const DISPATCH: &str = "rowkit::dispatch";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "rowkit_core";
    /// Renderer registry: view type assignment.
    pub const REGISTRY: &str = "rowkit::registry";
    /// Item manager: mutations and emitted change events.
    pub const MANAGER: &str = "rowkit::manager";
    /// Snapshot differ.
    pub const DIFF: &str = "rowkit::diff";
    /// Observer slot connection changes.
    pub const OBSERVER: &str = "rowkit_core::observer";
    /// Performance spans.
    pub const PERF: &str = "rowkit::perf";
}

/// A guard for performance tracing spans.
///
/// The span is entered on creation and exited when the guard is dropped, so
/// the subscriber records the duration of the enclosing operation.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "rowkit::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }

    /// Create a performance span that records the sizes of the compared lists.
    pub fn with_sizes(name: &'static str, old_len: usize, new_len: usize) -> Self {
        let span = tracing::debug_span!(
            target: "rowkit::perf",
            "perf",
            operation = name,
            old_len,
            new_len
        );
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with the core target.
#[macro_export]
macro_rules! rowkit_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "rowkit_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! rowkit_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "rowkit_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! rowkit_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "rowkit_core", $($arg)*)
    };
}
