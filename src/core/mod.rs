//! Core traits and types for the seqweld library.
//!
//! This module contains the pull primitives and the error type shared by the
//! synchronous and asynchronous sequence wrappers.

pub mod error;
pub mod traits;

// Re-export core items
pub use error::{Error, IntoError, Result};
pub use traits::{AsyncSource, Source};
