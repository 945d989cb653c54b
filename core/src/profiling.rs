//! Profiling utilities for command compilation
//!
//! This module provides integration with the puffin profiler to track
//! compilation and cache synchronization cost when the "profiling" feature is enabled.

/// Re-export puffin macros for convenience
#[cfg(feature = "profiling")]
pub use puffin::profile_scope;

/// Generic profiling scope macro for high-level operation instrumentation.
#[macro_export]
macro_rules! tessera_profile_scope {
    ($category:literal, $operation:literal) => {
        #[cfg(feature = "profiling")]
        puffin::profile_scope!($category, $operation);
    };
}
