//! Core pull traits for the sequence system.
//!
//! Both wrappers in this crate are built on a single primitive: ask the
//! source for its next element, or learn that it is exhausted. [`Source`] is
//! the synchronous form, [`AsyncSource`] the form whose pull may suspend.

use crate::core::error::Result;
use async_trait::async_trait;

/// A synchronous pull source.
///
/// `Ok(Some(item))` yields an element, `Ok(None)` reports exhaustion. Once a
/// source has reported exhaustion it is expected to keep doing so.
///
/// # Examples
///
/// ```rust
/// use seqweld::core::{Result, Source};
///
/// struct Countdown(u32);
///
/// impl Source for Countdown {
///     type Item = u32;
///
///     fn pull(&mut self) -> Result<Option<Self::Item>> {
///         if self.0 == 0 {
///             return Ok(None);
///         }
///         self.0 -= 1;
///         Ok(Some(self.0))
///     }
/// }
/// ```
pub trait Source {
    /// The type of items this source yields
    type Item;

    /// Produce the next item, or `None` once the source is exhausted.
    fn pull(&mut self) -> Result<Option<Self::Item>>;
}

impl<S: Source + ?Sized> Source for &mut S {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        (**self).pull()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        (**self).pull()
    }
}

/// An asynchronous pull source.
///
/// Identical contract to [`Source`], except that producing the next element
/// may suspend.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use seqweld::core::{AsyncSource, Result};
///
/// struct Ticker {
///     current: u64,
///     max: u64,
/// }
///
/// #[async_trait]
/// impl AsyncSource for Ticker {
///     type Item = u64;
///
///     async fn pull(&mut self) -> Result<Option<Self::Item>> {
///         if self.current >= self.max {
///             return Ok(None);
///         }
///         tokio::task::yield_now().await;
///         self.current += 1;
///         Ok(Some(self.current))
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncSource {
    /// The type of items this source yields
    type Item: Send + 'static;

    /// Produce the next item, or `None` once the source is exhausted.
    async fn pull(&mut self) -> Result<Option<Self::Item>>;
}

#[async_trait]
impl<S: AsyncSource + Send + ?Sized> AsyncSource for Box<S> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        (**self).pull().await
    }
}
