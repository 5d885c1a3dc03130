//! # Lazy, composable sync and async sequences
//!
//! This crate wraps any pull-based element source, synchronous or
//! asynchronous, in a wrapper exposing one uniform, chainable combinator
//! vocabulary. Nothing is pulled from a source until a terminal operation
//! (or a direct pull) asks for it, elements flow through chained adaptors
//! one at a time without intermediate buffering, and infinite sources are
//! safe as long as something downstream bounds them with `take`.
//!
//! ## Core Concepts
//!
//! - **Source / AsyncSource**: produce the next element or report exhaustion
//! - **SyncSequence / AsyncSequence**: owning wrappers exposing the combinators
//! - **Combinators**: `filter`, `filter_map`, `map`, `chain`, `zip`,
//!   `enumerate`, `take`, `skip`, `flat`, each consuming its receiver
//! - **Terminal operations**: `collect`, `reduce`, `count`, `for_each`
//!
//! ## Example
//!
//! ```rust
//! use seqweld::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let evens = sequence::iter(1..=10).filter(|x| x % 2 == 0).collect()?;
//!     assert_eq!(evens, vec![2, 4, 6, 8, 10]);
//!
//!     let pairs = async_sequence::iter(vec!["a", "b", "c"])
//!         .zip(AsyncSequence::repeat_with(|i| i))
//!         .collect()
//!         .await?;
//!     assert_eq!(pairs, vec![("a", 0), ("b", 1), ("c", 2)]);
//!     Ok(())
//! }
//! ```

pub mod async_sequence;
pub mod combinators;
pub mod core;
pub mod sequence;
pub mod sources;

mod tracing_support;

// Re-export commonly used items
pub mod prelude {
    pub use crate::async_sequence::{self, AsyncSequence, BoxAsyncSequence};
    pub use crate::core::{AsyncSource, Error, IntoError, Result, Source};
    pub use crate::sequence::{self, BoxSequence, SyncSequence};
}

// Re-export main types
pub use crate::async_sequence::AsyncSequence;
pub use crate::core::{Error, Result};
pub use crate::sequence::SyncSequence;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
