//! Internal logging hooks.
//!
//! With the `tracing` feature enabled these forward to the `tracing` crate;
//! without it they compile away entirely.

/// Emit a `trace`-level event when the `tracing` feature is enabled.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::trace!($($arg)*);
        }
    };
}

/// Emit a `debug`-level event when the `tracing` feature is enabled.
macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::debug!($($arg)*);
        }
    };
}

pub(crate) use debug_event;
pub(crate) use trace_event;
