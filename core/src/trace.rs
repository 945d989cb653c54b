//! Tracing utilities for command compilation and relation view observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site. The feature is evaluated in the crate that invokes the
//! macro, so downstream crates declare their own `tracing` feature.

/// Emit a debug-level tracing event with the compiled command text and parameter count.
///
/// ```ignore
/// tessera_trace_command!("select", &text, params.len());
/// ```
#[macro_export]
macro_rules! tessera_trace_command {
    ($kind:expr, $sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = $kind, sql = %$sql, params = $param_count, "tessera.command");
    };
}

/// Emit a debug-level tracing event for relation view lifecycle and membership changes.
///
/// ```ignore
/// tessera_trace_view!("load", relation = "lines", members = 3);
/// ```
#[macro_export]
macro_rules! tessera_trace_view {
    ($event:literal $(, $key:ident = $value:expr)* $(,)?) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(event = $event $(, $key = ?$value)*, "tessera.view");
    };
}
