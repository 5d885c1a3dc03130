//! Source implementations for the seqweld library.
//!
//! This module provides the raw pull sources that sequence wrappers are
//! built from: iterators, closures, streams and index-driven generators.

use async_trait::async_trait;
use futures_core::Stream;
use std::future::Future;
use tokio_stream::StreamExt;

use crate::core::{AsyncSource, Result, Source};

/// A source that yields items from an iterator
pub struct IterSource<I> {
    iter: I,
}

impl<I: Iterator> IterSource<I> {
    /// Create a new iterator source
    pub fn new<T>(iterable: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: iterable.into_iter(),
        }
    }
}

impl<I: Iterator> Source for IterSource<I> {
    type Item = I::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        Ok(self.iter.next())
    }
}

#[async_trait]
impl<I> AsyncSource for IterSource<I>
where
    I: Iterator + Send,
    I::Item: Send + 'static,
{
    type Item = I::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        Ok(self.iter.next())
    }
}

/// A source whose pull calls a function
pub struct FnSource<F> {
    f: F,
}

impl<F> FnSource<F> {
    /// Create a new function source
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, T> Source for FnSource<F>
where
    F: FnMut() -> Result<Option<T>>,
{
    type Item = T;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        (self.f)()
    }
}

/// A source whose pull awaits a future returned by a function
pub struct AsyncFnSource<F> {
    f: F,
}

impl<F> AsyncFnSource<F> {
    /// Create a new async function source
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut, T> AsyncSource for AsyncFnSource<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<Option<T>>> + Send,
    T: Send + 'static,
{
    type Item = T;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        (self.f)().await
    }
}

/// A source that adapts a [`Stream`], such as a channel receiver
pub struct StreamSource<St> {
    stream: St,
}

impl<St> StreamSource<St> {
    /// Create a new stream source
    pub fn new(stream: St) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl<St> AsyncSource for StreamSource<St>
where
    St: Stream + Unpin + Send,
    St::Item: Send + 'static,
{
    type Item = St::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        Ok(self.stream.next().await)
    }
}

/// An infinite source whose n-th element is `f(n)`, starting at zero.
///
/// Never reports exhaustion on its own; bound it with `take` before draining.
pub struct RepeatWith<F> {
    f: F,
    index: usize,
}

impl<F> RepeatWith<F> {
    /// Create a new generator source
    pub fn new(f: F) -> Self {
        Self { f, index: 0 }
    }
}

impl<F, T> Source for RepeatWith<F>
where
    F: FnMut(usize) -> T,
{
    type Item = T;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        let item = (self.f)(self.index);
        self.index += 1;
        Ok(Some(item))
    }
}

#[async_trait]
impl<F, T> AsyncSource for RepeatWith<F>
where
    F: FnMut(usize) -> T + Send,
    T: Send + 'static,
{
    type Item = T;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        let item = (self.f)(self.index);
        self.index += 1;
        Ok(Some(item))
    }
}
