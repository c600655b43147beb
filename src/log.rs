//! Conditional logging macros for layout and render passes.
//!
//! With the `tracing` feature these are the `tracing` macros; without it they
//! expand to nothing, so call sites cost nothing in release builds.
//!
//! Use them as `crate::log::debug!(...)` rather than importing `tracing`
//! directly.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
