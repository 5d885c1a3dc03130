//! Adaptor state shared by the sync and async sequence wrappers.
//!
//! Every combinator is a small state machine that owns its parent and is
//! advanced one step per pull. The state is the same whether the pull
//! suspends or not, so the structs are defined once here; [`sync`] drives
//! them as [`Source`](crate::core::Source)s and [`asynchronous`] as
//! [`AsyncSource`](crate::core::AsyncSource)s.

pub mod asynchronous;
pub mod sync;

pub use asynchronous::{FilterAsync, FilterMapAsync, MapAsync, TryMapAsync};

/// Yields parent items for which the predicate holds
pub struct Filter<S, F> {
    pub(crate) seq: S,
    pub(crate) predicate: F,
}

/// Yields `v` for every parent item mapped to `Some(v)`
pub struct FilterMap<S, F> {
    pub(crate) seq: S,
    pub(crate) f: F,
}

/// Maps every parent item through a function
pub struct Map<S, F> {
    pub(crate) seq: S,
    pub(crate) f: F,
}

/// Maps every parent item through a fallible function
pub struct TryMap<S, F> {
    pub(crate) seq: S,
    pub(crate) f: F,
}

/// Drains the first source, then the second
pub struct Chain<A, B> {
    pub(crate) first: Option<A>,
    pub(crate) second: B,
}

/// Drains the head source, then each remaining source in order
pub struct ChainAll<S, I: Iterator> {
    pub(crate) head: Option<S>,
    pub(crate) current: Option<I::Item>,
    pub(crate) rest: std::iter::Fuse<I>,
}

impl<S, I: Iterator> ChainAll<S, I> {
    pub(crate) fn new(head: S, rest: I) -> Self {
        Self {
            head: Some(head),
            current: None,
            rest: rest.fuse(),
        }
    }
}

/// Lock-step state of a [`Zip`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZipState {
    AwaitingBoth,
    Done,
}

/// Pairs items of two sources in lock-step
pub struct Zip<A, B> {
    pub(crate) left: A,
    pub(crate) right: B,
    pub(crate) state: ZipState,
}

impl<A, B> Zip<A, B> {
    pub(crate) fn new(left: A, right: B) -> Self {
        Self {
            left,
            right,
            state: ZipState::AwaitingBoth,
        }
    }
}

/// Pairs every yielded item with its zero-based position
pub struct Enumerate<S> {
    pub(crate) seq: S,
    pub(crate) index: usize,
}

/// Yields at most `remaining` items, then stops pulling the parent
pub struct Take<S> {
    pub(crate) seq: S,
    pub(crate) remaining: usize,
}

/// Discards the first `remaining` items pulled from the parent
pub struct Skip<S> {
    pub(crate) seq: S,
    pub(crate) remaining: usize,
}

/// Flattens one level of nesting; `I` is the inner iterator in progress
pub struct Flat<S, I> {
    pub(crate) seq: S,
    pub(crate) current: Option<I>,
}
