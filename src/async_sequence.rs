//! The asynchronous sequence wrapper.
//!
//! [`AsyncSequence`] mirrors [`SyncSequence`](crate::sequence::SyncSequence)
//! operator for operator over an [`AsyncSource`]. Each pull is awaited, so
//! elements still flow through a chain strictly one at a time; the only
//! place two pulls are in flight together is the pairwise step of
//! [`zip`](AsyncSequence::zip).
//!
//! ```rust
//! use seqweld::async_sequence;
//!
//! # #[tokio::main]
//! # async fn main() -> seqweld::Result<()> {
//! let doubled = async_sequence::iter(1..=10)
//!     .filter_map(|x| if x % 2 == 0 { None } else { Some(x * 2) })
//!     .map_async(|x| async move { x + 1 })
//!     .collect()
//!     .await?;
//! assert_eq!(doubled, vec![3, 7, 11, 15, 19]);
//! # Ok(())
//! # }
//! ```

use futures_core::Stream;
use std::future::Future;

use crate::combinators::{
    Chain, ChainAll, Enumerate, Filter, FilterAsync, FilterMap, FilterMapAsync, Flat, Map,
    MapAsync, Skip, Take, TryMap, TryMapAsync, Zip,
};
use crate::core::{AsyncSource, Result};
use crate::sources::{AsyncFnSource, IterSource, RepeatWith, StreamSource};
use crate::tracing_support::{debug_event, trace_event};

/// Create a sequence that yields the items of an iterator
pub fn iter<T>(iterable: T) -> AsyncSequence<IterSource<T::IntoIter>>
where
    T: IntoIterator,
    T::IntoIter: Send,
    T::Item: Send + 'static,
{
    AsyncSequence::new(IterSource::new(iterable))
}

/// Create a sequence whose pulls await the future returned by a function
pub fn from_fn<F, Fut, T>(f: F) -> AsyncSequence<AsyncFnSource<F>>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<Option<T>>> + Send,
    T: Send + 'static,
{
    AsyncSequence::new(AsyncFnSource::new(f))
}

/// Create a sequence over a [`Stream`], such as a channel receiver
pub fn from_stream<St>(stream: St) -> AsyncSequence<StreamSource<St>>
where
    St: Stream + Unpin + Send,
    St::Item: Send + 'static,
{
    AsyncSequence::new(StreamSource::new(stream))
}

/// Create an infinite sequence whose n-th element is `f(n)`
pub fn repeat_with<F, T>(f: F) -> AsyncSequence<RepeatWith<F>>
where
    F: FnMut(usize) -> T + Send,
    T: Send + 'static,
{
    AsyncSequence::new(RepeatWith::new(f))
}

/// A lazy, owning wrapper around an [`AsyncSource`].
///
/// Like its synchronous counterpart, the wrapper stops pulling its source
/// once it has reported exhaustion.
pub struct AsyncSequence<S> {
    source: S,
    exhausted: bool,
}

/// A type-erased async sequence
pub type BoxAsyncSequence<'a, T> = AsyncSequence<Box<dyn AsyncSource<Item = T> + Send + 'a>>;

impl<F, T> AsyncSequence<RepeatWith<F>>
where
    F: FnMut(usize) -> T + Send,
    T: Send + 'static,
{
    /// Create an infinite sequence whose n-th element is `f(n)`.
    ///
    /// Pair it with [`take`](AsyncSequence::take) before draining.
    pub fn repeat_with(f: F) -> Self {
        repeat_with(f)
    }
}

impl<S: AsyncSource + Send> AsyncSequence<S> {
    /// Wrap a raw source
    pub fn new(source: S) -> Self {
        Self {
            source,
            exhausted: false,
        }
    }

    /// Pull the next item, or `None` once the sequence is exhausted
    pub async fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.exhausted {
            return Ok(None);
        }
        let next = self.source.pull().await?;
        if next.is_none() {
            trace_event!("async sequence exhausted");
            self.exhausted = true;
        }
        Ok(next)
    }

    /// Yield only the items for which `predicate` returns true
    pub fn filter<F>(self, predicate: F) -> AsyncSequence<Filter<Self, F>>
    where
        F: FnMut(&S::Item) -> bool + Send,
    {
        AsyncSequence::new(Filter {
            seq: self,
            predicate,
        })
    }

    /// Yield only the items for which the future returned by `predicate` resolves to true
    pub fn filter_async<F, Fut>(self, predicate: F) -> AsyncSequence<FilterAsync<Self, F>>
    where
        F: FnMut(&S::Item) -> Fut + Send,
        Fut: Future<Output = bool> + Send,
    {
        AsyncSequence::new(FilterAsync {
            seq: self,
            predicate,
        })
    }

    /// Yield `v` for every item that `f` maps to `Some(v)`
    pub fn filter_map<F, U>(self, f: F) -> AsyncSequence<FilterMap<Self, F>>
    where
        F: FnMut(S::Item) -> Option<U> + Send,
        U: Send + 'static,
    {
        AsyncSequence::new(FilterMap { seq: self, f })
    }

    /// Yield `v` for every item whose future from `f` resolves to `Some(v)`
    pub fn filter_map_async<F, Fut, U>(self, f: F) -> AsyncSequence<FilterMapAsync<Self, F>>
    where
        F: FnMut(S::Item) -> Fut + Send,
        Fut: Future<Output = Option<U>> + Send,
        U: Send + 'static,
    {
        AsyncSequence::new(FilterMapAsync { seq: self, f })
    }

    /// Map every item through `f`
    pub fn map<F, U>(self, f: F) -> AsyncSequence<Map<Self, F>>
    where
        F: FnMut(S::Item) -> U + Send,
        U: Send + 'static,
    {
        AsyncSequence::new(Map { seq: self, f })
    }

    /// Map every item through `f`, awaiting each result
    pub fn map_async<F, Fut, U>(self, f: F) -> AsyncSequence<MapAsync<Self, F>>
    where
        F: FnMut(S::Item) -> Fut + Send,
        Fut: Future<Output = U> + Send,
        U: Send + 'static,
    {
        AsyncSequence::new(MapAsync { seq: self, f })
    }

    /// Map every item through a fallible `f`; the first error ends the drain
    pub fn try_map<F, U>(self, f: F) -> AsyncSequence<TryMap<Self, F>>
    where
        F: FnMut(S::Item) -> Result<U> + Send,
        U: Send + 'static,
    {
        AsyncSequence::new(TryMap { seq: self, f })
    }

    /// Map every item through a fallible async `f`; the first error ends the drain
    pub fn try_map_async<F, Fut, U>(self, f: F) -> AsyncSequence<TryMapAsync<Self, F>>
    where
        F: FnMut(S::Item) -> Fut + Send,
        Fut: Future<Output = Result<U>> + Send,
        U: Send + 'static,
    {
        AsyncSequence::new(TryMapAsync { seq: self, f })
    }

    /// Yield every item of this sequence, then every item of `other`
    pub fn chain<O>(self, other: O) -> AsyncSequence<Chain<Self, O>>
    where
        O: AsyncSource<Item = S::Item> + Send,
    {
        AsyncSequence::new(Chain {
            first: Some(self),
            second: other,
        })
    }

    /// Yield every item of this sequence, then of each of `others` in order
    pub fn chain_all<I>(self, others: I) -> AsyncSequence<ChainAll<Self, I::IntoIter>>
    where
        I: IntoIterator,
        I::IntoIter: Send,
        I::Item: AsyncSource<Item = S::Item> + Send,
    {
        AsyncSequence::new(ChainAll::new(self, others.into_iter()))
    }

    /// Pair items with those of `right` in lock-step, stopping at the shorter side.
    ///
    /// Each step starts both pulls together and waits for both to settle.
    pub fn zip<R>(self, right: R) -> AsyncSequence<Zip<Self, R>>
    where
        R: AsyncSource + Send,
    {
        AsyncSequence::new(Zip::new(self, right))
    }

    /// Pair every item with its zero-based position
    pub fn enumerate(self) -> AsyncSequence<Enumerate<Self>> {
        AsyncSequence::new(Enumerate {
            seq: self,
            index: 0,
        })
    }

    /// Yield at most `limit` items
    pub fn take(self, limit: usize) -> AsyncSequence<Take<Self>> {
        AsyncSequence::new(Take {
            seq: self,
            remaining: limit,
        })
    }

    /// Discard the first `count` items
    pub fn skip(self, count: usize) -> AsyncSequence<Skip<Self>> {
        AsyncSequence::new(Skip {
            seq: self,
            remaining: count,
        })
    }

    /// Flatten one level of nesting
    pub fn flat(self) -> AsyncSequence<Flat<Self, <S::Item as IntoIterator>::IntoIter>>
    where
        S::Item: IntoIterator,
        <S::Item as IntoIterator>::IntoIter: Send,
        <S::Item as IntoIterator>::Item: Send + 'static,
    {
        AsyncSequence::new(Flat {
            seq: self,
            current: None,
        })
    }

    /// Erase the adaptor type
    pub fn boxed<'a>(self) -> BoxAsyncSequence<'a, S::Item>
    where
        S: 'a,
    {
        let source: Box<dyn AsyncSource<Item = S::Item> + Send + 'a> = Box::new(self);
        AsyncSequence::new(source)
    }

    /// Expose the pulls of this sequence as a [`Stream`].
    ///
    /// The stream ends after yielding the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<S::Item>> + Send {
        futures::stream::unfold(Some(self), |state| async move {
            let mut seq = state?;
            match seq.drain_next().await {
                Ok(Some(item)) => Some((Ok(item), Some(seq))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Drain the sequence into a vector, in yield order
    pub async fn collect(mut self) -> Result<Vec<S::Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.drain_next().await? {
            items.push(item);
        }
        trace_event!(len = items.len(), "collect finished");
        Ok(items)
    }

    /// Left-fold every item into an accumulator
    pub async fn reduce<A, F>(self, initial: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, S::Item) -> A,
    {
        self.try_reduce(initial, |acc, item| Ok(f(acc, item))).await
    }

    /// Left-fold with a fallible function; the first error ends the drain
    pub async fn try_reduce<A, F>(mut self, initial: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, S::Item) -> Result<A>,
    {
        let mut acc = initial;
        while let Some(item) = self.drain_next().await? {
            acc = f(acc, item)?;
        }
        Ok(acc)
    }

    /// Count the items yielded until exhaustion
    pub async fn count(self) -> Result<usize> {
        self.reduce(0, |count, _| count + 1).await
    }

    /// Call `f` once per item, in order
    pub async fn for_each<F>(self, mut f: F) -> Result<()>
    where
        F: FnMut(S::Item),
    {
        self.try_for_each(|item| {
            f(item);
            Ok(())
        })
        .await
    }

    /// Call `f` once per item, awaiting each call before pulling the next item
    pub async fn for_each_async<F, Fut>(mut self, mut f: F) -> Result<()>
    where
        F: FnMut(S::Item) -> Fut,
        Fut: Future<Output = ()>,
    {
        while let Some(item) = self.drain_next().await? {
            f(item).await;
        }
        Ok(())
    }

    /// Call a fallible `f` once per item; the first error ends the drain
    pub async fn try_for_each<F>(mut self, mut f: F) -> Result<()>
    where
        F: FnMut(S::Item) -> Result<()>,
    {
        while let Some(item) = self.drain_next().await? {
            f(item)?;
        }
        Ok(())
    }

    async fn drain_next(&mut self) -> Result<Option<S::Item>> {
        self.pull().await.inspect_err(|_e| {
            debug_event!(error = %_e, "async sequence drain failed");
        })
    }
}

#[async_trait::async_trait]
impl<S: AsyncSource + Send> AsyncSource for AsyncSequence<S> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        AsyncSequence::pull(self).await
    }
}
