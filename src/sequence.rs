//! The synchronous sequence wrapper.
//!
//! [`SyncSequence`] owns exactly one [`Source`] and exposes a chainable,
//! lazy combinator set over it. Every combinator consumes the wrapper and
//! returns a new one that pulls from it on demand; terminal operations drain
//! the chain and return a concrete result.
//!
//! ```rust
//! use seqweld::sequence::{self, SyncSequence};
//!
//! # fn main() -> seqweld::Result<()> {
//! let product = sequence::iter(1..=10).reduce(1, |acc, x| acc * x)?;
//! assert_eq!(product, 3628800);
//!
//! let squares = SyncSequence::repeat_with(|i| i * i).take(4).collect()?;
//! assert_eq!(squares, vec![0, 1, 4, 9]);
//! # Ok(())
//! # }
//! ```

use crate::combinators::{
    Chain, ChainAll, Enumerate, Filter, FilterMap, Flat, Map, Skip, Take, TryMap, Zip,
};
use crate::core::{Result, Source};
use crate::sources::{FnSource, IterSource, RepeatWith};
use crate::tracing_support::{debug_event, trace_event};

/// Create a sequence that yields the items of an iterator
pub fn iter<T: IntoIterator>(iterable: T) -> SyncSequence<IterSource<T::IntoIter>> {
    SyncSequence::new(IterSource::new(iterable))
}

/// Create a sequence whose pulls call a function
pub fn from_fn<F, T>(f: F) -> SyncSequence<FnSource<F>>
where
    F: FnMut() -> Result<Option<T>>,
{
    SyncSequence::new(FnSource::new(f))
}

/// Create an infinite sequence whose n-th element is `f(n)`
pub fn repeat_with<F, T>(f: F) -> SyncSequence<RepeatWith<F>>
where
    F: FnMut(usize) -> T,
{
    SyncSequence::new(RepeatWith::new(f))
}

/// A lazy, owning wrapper around a synchronous [`Source`].
///
/// The wrapper remembers when its source reported exhaustion and never pulls
/// it again afterwards.
pub struct SyncSequence<S> {
    source: S,
    exhausted: bool,
}

/// A type-erased sequence
pub type BoxSequence<'a, T> = SyncSequence<Box<dyn Source<Item = T> + 'a>>;

impl<F, T> SyncSequence<RepeatWith<F>>
where
    F: FnMut(usize) -> T,
{
    /// Create an infinite sequence whose n-th element is `f(n)`.
    ///
    /// Pair it with [`take`](SyncSequence::take) before draining.
    pub fn repeat_with(f: F) -> Self {
        repeat_with(f)
    }
}

impl<S: Source> SyncSequence<S> {
    /// Wrap a raw source
    pub fn new(source: S) -> Self {
        Self {
            source,
            exhausted: false,
        }
    }

    /// Pull the next item, or `None` once the sequence is exhausted
    pub fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.exhausted {
            return Ok(None);
        }
        let next = self.source.pull()?;
        if next.is_none() {
            trace_event!("sequence exhausted");
            self.exhausted = true;
        }
        Ok(next)
    }

    /// Yield only the items for which `predicate` returns true
    pub fn filter<F>(self, predicate: F) -> SyncSequence<Filter<Self, F>>
    where
        F: FnMut(&S::Item) -> bool,
    {
        SyncSequence::new(Filter {
            seq: self,
            predicate,
        })
    }

    /// Yield `v` for every item that `f` maps to `Some(v)`
    pub fn filter_map<F, U>(self, f: F) -> SyncSequence<FilterMap<Self, F>>
    where
        F: FnMut(S::Item) -> Option<U>,
    {
        SyncSequence::new(FilterMap { seq: self, f })
    }

    /// Map every item through `f`
    pub fn map<F, U>(self, f: F) -> SyncSequence<Map<Self, F>>
    where
        F: FnMut(S::Item) -> U,
    {
        SyncSequence::new(Map { seq: self, f })
    }

    /// Map every item through a fallible `f`; the first error ends the drain
    pub fn try_map<F, U>(self, f: F) -> SyncSequence<TryMap<Self, F>>
    where
        F: FnMut(S::Item) -> Result<U>,
    {
        SyncSequence::new(TryMap { seq: self, f })
    }

    /// Yield every item of this sequence, then every item of `other`
    pub fn chain<O>(self, other: O) -> SyncSequence<Chain<Self, O>>
    where
        O: Source<Item = S::Item>,
    {
        SyncSequence::new(Chain {
            first: Some(self),
            second: other,
        })
    }

    /// Yield every item of this sequence, then of each of `others` in order
    pub fn chain_all<I>(self, others: I) -> SyncSequence<ChainAll<Self, I::IntoIter>>
    where
        I: IntoIterator,
        I::Item: Source<Item = S::Item>,
    {
        SyncSequence::new(ChainAll::new(self, others.into_iter()))
    }

    /// Pair items with those of `right` in lock-step, stopping at the shorter side
    pub fn zip<R: Source>(self, right: R) -> SyncSequence<Zip<Self, R>> {
        SyncSequence::new(Zip::new(self, right))
    }

    /// Pair every item with its zero-based position
    pub fn enumerate(self) -> SyncSequence<Enumerate<Self>> {
        SyncSequence::new(Enumerate {
            seq: self,
            index: 0,
        })
    }

    /// Yield at most `limit` items
    pub fn take(self, limit: usize) -> SyncSequence<Take<Self>> {
        SyncSequence::new(Take {
            seq: self,
            remaining: limit,
        })
    }

    /// Discard the first `count` items
    pub fn skip(self, count: usize) -> SyncSequence<Skip<Self>> {
        SyncSequence::new(Skip {
            seq: self,
            remaining: count,
        })
    }

    /// Flatten one level of nesting
    pub fn flat(self) -> SyncSequence<Flat<Self, <S::Item as IntoIterator>::IntoIter>>
    where
        S::Item: IntoIterator,
    {
        SyncSequence::new(Flat {
            seq: self,
            current: None,
        })
    }

    /// Erase the adaptor type
    pub fn boxed<'a>(self) -> BoxSequence<'a, S::Item>
    where
        S: 'a,
    {
        let source: Box<dyn Source<Item = S::Item> + 'a> = Box::new(self);
        SyncSequence::new(source)
    }

    /// Drain the sequence into a vector, in yield order
    pub fn collect(mut self) -> Result<Vec<S::Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.drain_next()? {
            items.push(item);
        }
        trace_event!(len = items.len(), "collect finished");
        Ok(items)
    }

    /// Left-fold every item into an accumulator
    pub fn reduce<A, F>(self, initial: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, S::Item) -> A,
    {
        self.try_reduce(initial, |acc, item| Ok(f(acc, item)))
    }

    /// Left-fold with a fallible function; the first error ends the drain
    pub fn try_reduce<A, F>(mut self, initial: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, S::Item) -> Result<A>,
    {
        let mut acc = initial;
        while let Some(item) = self.drain_next()? {
            acc = f(acc, item)?;
        }
        Ok(acc)
    }

    /// Count the items yielded until exhaustion
    pub fn count(self) -> Result<usize> {
        self.reduce(0, |count, _| count + 1)
    }

    /// Call `f` once per item, in order
    pub fn for_each<F>(self, mut f: F) -> Result<()>
    where
        F: FnMut(S::Item),
    {
        self.try_for_each(|item| {
            f(item);
            Ok(())
        })
    }

    /// Call a fallible `f` once per item; the first error ends the drain
    pub fn try_for_each<F>(mut self, mut f: F) -> Result<()>
    where
        F: FnMut(S::Item) -> Result<()>,
    {
        while let Some(item) = self.drain_next()? {
            f(item)?;
        }
        Ok(())
    }

    fn drain_next(&mut self) -> Result<Option<S::Item>> {
        self.pull().inspect_err(|_e| {
            debug_event!(error = %_e, "sequence drain failed");
        })
    }
}

impl<S: Source> Source for SyncSequence<S> {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        SyncSequence::pull(self)
    }
}

impl<S: Source> IntoIterator for SyncSequence<S> {
    type Item = Result<S::Item>;
    type IntoIter = IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            seq: self,
            failed: false,
        }
    }
}

/// Iterator over the pulls of a [`SyncSequence`].
///
/// Ends after yielding the first error.
pub struct IntoIter<S> {
    seq: SyncSequence<S>,
    failed: bool,
}

impl<S: Source> Iterator for IntoIter<S> {
    type Item = Result<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.seq.drain_next().transpose();
        if matches!(next, Some(Err(_))) {
            self.failed = true;
        }
        next
    }
}
