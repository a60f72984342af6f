//! Logging facilities for rowbind.
//!
//! rowbind uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("rowbind=trace,rowbind_core=debug")
//!     .init();
//! ```
//!
//! The [`targets`] constants name every subsystem so directives can filter
//! them individually.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "rowbind_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "rowbind_core::signal";
    /// Dispatch queue target.
    pub const DISPATCH: &str = "rowbind_core::dispatch";
    /// Data-set adapter target.
    pub const ADAPTER: &str = "rowbind::adapter";
    /// Layout selection, binding and item-layout attribute target.
    pub const LAYOUT: &str = "rowbind::layout";
    /// Value model target.
    pub const MODEL: &str = "rowbind::model";
    /// Performance spans target.
    pub const PERF: &str = "rowbind::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span_is_current_under_perf_target() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            {
                let _span = PerfSpan::new("view_for");
                let current = tracing::Span::current();
                let metadata = current.metadata().unwrap();
                assert_eq!(metadata.target(), targets::PERF);
                assert_eq!(metadata.name(), "perf");
            }
            assert!(tracing::Span::current().is_none());
        });
    }

    #[test]
    fn test_targets_are_prefixed_by_crate() {
        assert!(targets::SIGNAL.starts_with(targets::CORE));
        assert!(targets::DISPATCH.starts_with(targets::CORE));
        assert!(targets::ADAPTER.starts_with("rowbind::"));
    }
}
