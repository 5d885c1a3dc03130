//! [`AsyncSource`] implementations of the adaptors, plus the variants whose
//! supplied function itself suspends.
//!
//! Semantics match [`sync`](super::sync) step for step; every parent pull and
//! every suspending callback is awaited before the adaptor continues.

use async_trait::async_trait;
use std::future::Future;

use super::{
    Chain, ChainAll, Enumerate, Filter, FilterMap, Flat, Map, Skip, Take, TryMap, Zip, ZipState,
};
use crate::core::{AsyncSource, Result};
use crate::tracing_support::trace_event;

/// Yields parent items for which an async predicate resolves to true
pub struct FilterAsync<S, F> {
    pub(crate) seq: S,
    pub(crate) predicate: F,
}

/// Yields `v` for every parent item an async function resolves to `Some(v)`
pub struct FilterMapAsync<S, F> {
    pub(crate) seq: S,
    pub(crate) f: F,
}

/// Maps every parent item through an async function
pub struct MapAsync<S, F> {
    pub(crate) seq: S,
    pub(crate) f: F,
}

/// Maps every parent item through a fallible async function
pub struct TryMapAsync<S, F> {
    pub(crate) seq: S,
    pub(crate) f: F,
}

#[async_trait]
impl<S, F> AsyncSource for Filter<S, F>
where
    S: AsyncSource + Send,
    F: FnMut(&S::Item) -> bool + Send,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        while let Some(item) = self.seq.pull().await? {
            if (self.predicate)(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<S, F, Fut> AsyncSource for FilterAsync<S, F>
where
    S: AsyncSource + Send,
    F: FnMut(&S::Item) -> Fut + Send,
    Fut: Future<Output = bool> + Send,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        while let Some(item) = self.seq.pull().await? {
            if (self.predicate)(&item).await {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<S, F, U> AsyncSource for FilterMap<S, F>
where
    S: AsyncSource + Send,
    F: FnMut(S::Item) -> Option<U> + Send,
    U: Send + 'static,
{
    type Item = U;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        while let Some(item) = self.seq.pull().await? {
            if let Some(mapped) = (self.f)(item) {
                return Ok(Some(mapped));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<S, F, Fut, U> AsyncSource for FilterMapAsync<S, F>
where
    S: AsyncSource + Send,
    F: FnMut(S::Item) -> Fut + Send,
    Fut: Future<Output = Option<U>> + Send,
    U: Send + 'static,
{
    type Item = U;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        while let Some(item) = self.seq.pull().await? {
            if let Some(mapped) = (self.f)(item).await {
                return Ok(Some(mapped));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<S, F, U> AsyncSource for Map<S, F>
where
    S: AsyncSource + Send,
    F: FnMut(S::Item) -> U + Send,
    U: Send + 'static,
{
    type Item = U;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        Ok(self.seq.pull().await?.map(&mut self.f))
    }
}

#[async_trait]
impl<S, F, Fut, U> AsyncSource for MapAsync<S, F>
where
    S: AsyncSource + Send,
    F: FnMut(S::Item) -> Fut + Send,
    Fut: Future<Output = U> + Send,
    U: Send + 'static,
{
    type Item = U;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        match self.seq.pull().await? {
            Some(item) => Ok(Some((self.f)(item).await)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<S, F, U> AsyncSource for TryMap<S, F>
where
    S: AsyncSource + Send,
    F: FnMut(S::Item) -> Result<U> + Send,
    U: Send + 'static,
{
    type Item = U;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        match self.seq.pull().await? {
            Some(item) => (self.f)(item).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<S, F, Fut, U> AsyncSource for TryMapAsync<S, F>
where
    S: AsyncSource + Send,
    F: FnMut(S::Item) -> Fut + Send,
    Fut: Future<Output = Result<U>> + Send,
    U: Send + 'static,
{
    type Item = U;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        match self.seq.pull().await? {
            Some(item) => (self.f)(item).await.map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<A, B> AsyncSource for Chain<A, B>
where
    A: AsyncSource + Send,
    B: AsyncSource<Item = A::Item> + Send,
{
    type Item = A::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        if let Some(first) = self.first.as_mut() {
            if let Some(item) = first.pull().await? {
                return Ok(Some(item));
            }
            trace_event!("chain: first source exhausted, switching to second");
            self.first = None;
        }
        self.second.pull().await
    }
}

#[async_trait]
impl<S, I> AsyncSource for ChainAll<S, I>
where
    S: AsyncSource + Send,
    I: Iterator + Send,
    I::Item: AsyncSource<Item = S::Item> + Send,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        if let Some(head) = self.head.as_mut() {
            if let Some(item) = head.pull().await? {
                return Ok(Some(item));
            }
            self.head = None;
        }
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(item) = current.pull().await? {
                    return Ok(Some(item));
                }
            }
            match self.rest.next() {
                Some(next) => {
                    trace_event!("chain: advancing to next source");
                    self.current = Some(next);
                }
                None => {
                    self.current = None;
                    return Ok(None);
                }
            }
        }
    }
}

#[async_trait]
impl<A, B> AsyncSource for Zip<A, B>
where
    A: AsyncSource + Send,
    B: AsyncSource + Send,
{
    type Item = (A::Item, B::Item);

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        if self.state == ZipState::Done {
            return Ok(None);
        }
        // Both pulls start together; the step completes once both settle.
        let (left, right) = tokio::join!(self.left.pull(), self.right.pull());
        match (left?, right?) {
            (Some(l), Some(r)) => Ok(Some((l, r))),
            _ => {
                trace_event!("zip: one side exhausted, stopping");
                self.state = ZipState::Done;
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<S: AsyncSource + Send> AsyncSource for Enumerate<S> {
    type Item = (usize, S::Item);

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        match self.seq.pull().await? {
            Some(item) => {
                let index = self.index;
                self.index += 1;
                Ok(Some((index, item)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<S: AsyncSource + Send> AsyncSource for Take<S> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        match self.seq.pull().await? {
            Some(item) => {
                self.remaining -= 1;
                if self.remaining == 0 {
                    trace_event!("take: limit reached");
                }
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<S: AsyncSource + Send> AsyncSource for Skip<S> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        while self.remaining > 0 {
            if self.seq.pull().await?.is_none() {
                self.remaining = 0;
                return Ok(None);
            }
            self.remaining -= 1;
        }
        self.seq.pull().await
    }
}

#[async_trait]
impl<S, I> AsyncSource for Flat<S, I>
where
    S: AsyncSource + Send,
    S::Item: IntoIterator<IntoIter = I>,
    I: Iterator + Send,
    I::Item: Send + 'static,
{
    type Item = I::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                if let Some(item) = inner.next() {
                    return Ok(Some(item));
                }
                self.current = None;
            }
            match self.seq.pull().await? {
                Some(next) => self.current = Some(next.into_iter()),
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::async_sequence::{from_fn, iter, AsyncSequence};
    use crate::core::{AsyncSource, Error};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// A source over `0..len` that records how many times it was pulled
    fn counted(
        len: usize,
        pulls: Arc<AtomicUsize>,
    ) -> AsyncSequence<impl AsyncSource<Item = usize>> {
        from_fn(move || {
            let pulled = pulls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::task::yield_now().await;
                Ok::<_, Error>(if pulled < len { Some(pulled) } else { None })
            }
        })
    }

    #[tokio::test]
    async fn test_filter_combinator() {
        let evens = iter(1..=10).filter(|x| x % 2 == 0).collect().await.unwrap();
        assert_eq!(evens, vec![2, 4, 6, 8, 10]);
    }

    #[tokio::test]
    async fn test_filter_async_combinator() {
        let evens = iter(1..=10)
            .filter_async(|x| {
                let even = x % 2 == 0;
                async move {
                    tokio::task::yield_now().await;
                    even
                }
            })
            .collect()
            .await
            .unwrap();
        assert_eq!(evens, vec![2, 4, 6, 8, 10]);
    }

    #[tokio::test]
    async fn test_filter_map_combinators() {
        let sync_fn = iter(1..=10)
            .filter_map(|x| if x % 2 == 0 { None } else { Some(x * 2) })
            .collect()
            .await
            .unwrap();
        let async_fn = iter(1..=10)
            .filter_map_async(|x| async move { if x % 2 == 0 { None } else { Some(x * 2) } })
            .collect()
            .await
            .unwrap();

        assert_eq!(sync_fn, vec![2, 6, 10, 14, 18]);
        assert_eq!(async_fn, sync_fn);
    }

    #[tokio::test]
    async fn test_map_combinators() {
        let mapped = iter(1..6).map(|x| x * 2).collect().await.unwrap();
        let awaited = iter(1..6)
            .map_async(|x| async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                x * 2
            })
            .collect()
            .await
            .unwrap();

        assert_eq!(mapped, vec![2, 4, 6, 8, 10]);
        assert_eq!(awaited, mapped);
    }

    #[tokio::test]
    async fn test_try_map_async_rejection_stops_drain() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_ref = seen.clone();

        let result = iter(1..10)
            .try_map_async(|x| async move {
                if x == 3 {
                    Err(Error::custom("rejected"))
                } else {
                    Ok(x)
                }
            })
            .for_each(move |_| {
                seen_ref.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(result.unwrap_err().to_string(), "rejected");
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_chain_combinators() {
        let chained = iter(1..4).chain(iter(4..7)).collect().await.unwrap();
        assert_eq!(chained, vec![1, 2, 3, 4, 5, 6]);

        let all = iter(vec![1])
            .chain_all(vec![iter(vec![2, 3]), iter(vec![]), iter(vec![4])])
            .collect()
            .await
            .unwrap();
        assert_eq!(all, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_zip_pulls_both_sides_each_step() {
        let left_pulls = Arc::new(AtomicUsize::new(0));
        let right_pulls = Arc::new(AtomicUsize::new(0));

        let pairs = counted(2, left_pulls.clone())
            .zip(counted(5, right_pulls.clone()))
            .collect()
            .await
            .unwrap();

        assert_eq!(pairs, vec![(0, 0), (1, 1)]);
        assert_eq!(left_pulls.load(Ordering::SeqCst), 3);
        assert_eq!(right_pulls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zip_overlaps_the_two_pulls() {
        let slow = |delay: u64| {
            from_fn(move || async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok::<_, Error>(Some(delay))
            })
        };

        let start = tokio::time::Instant::now();
        let pairs = slow(50).zip(slow(50)).take(2).collect().await.unwrap();

        assert_eq!(pairs, vec![(50, 50), (50, 50)]);
        // two overlapped steps take ~100ms; sequential pulls would take 200ms
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_enumerate_take_skip() {
        let indexed = iter(vec!['a', 'b', 'c', 'd'])
            .filter(|c| *c != 'b')
            .enumerate()
            .collect()
            .await
            .unwrap();
        assert_eq!(indexed, vec![(0, 'a'), (1, 'c'), (2, 'd')]);

        let skipped = iter(1..=10).skip(7).collect().await.unwrap();
        assert_eq!(skipped, vec![8, 9, 10]);
        assert!(iter(1..=3).skip(5).collect().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_take_does_not_drain_parent() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let taken = counted(100, pulls.clone()).take(3).collect().await.unwrap();
        assert_eq!(taken, vec![0, 1, 2]);
        assert_eq!(pulls.load(Ordering::SeqCst), 3);

        let pulls = Arc::new(AtomicUsize::new(0));
        let none = counted(100, pulls.clone()).take(0).collect().await.unwrap();
        assert!(none.is_empty());
        assert_eq!(pulls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_flat_flattens_one_level() {
        let flat = iter(vec![vec![1, 2], vec![], vec![3], vec![4, 5]])
            .flat()
            .collect()
            .await
            .unwrap();
        assert_eq!(flat, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_complex_combination() {
        let result = AsyncSequence::repeat_with(|i| i + 1)
            .filter(|x| x % 2 == 0) // Even numbers
            .map_async(|x| async move { x * 3 })
            .take(3)
            .collect()
            .await
            .unwrap();

        assert_eq!(result, vec![6, 12, 18]);
    }
}
