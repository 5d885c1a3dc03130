//! [`Source`] implementations of the adaptors, driving them synchronously.

use super::{
    Chain, ChainAll, Enumerate, Filter, FilterMap, Flat, Map, Skip, Take, TryMap, Zip, ZipState,
};
use crate::core::{Result, Source};
use crate::tracing_support::trace_event;

impl<S, F> Source for Filter<S, F>
where
    S: Source,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        while let Some(item) = self.seq.pull()? {
            if (self.predicate)(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

impl<S, F, U> Source for FilterMap<S, F>
where
    S: Source,
    F: FnMut(S::Item) -> Option<U>,
{
    type Item = U;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        while let Some(item) = self.seq.pull()? {
            if let Some(mapped) = (self.f)(item) {
                return Ok(Some(mapped));
            }
        }
        Ok(None)
    }
}

impl<S, F, U> Source for Map<S, F>
where
    S: Source,
    F: FnMut(S::Item) -> U,
{
    type Item = U;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        Ok(self.seq.pull()?.map(&mut self.f))
    }
}

impl<S, F, U> Source for TryMap<S, F>
where
    S: Source,
    F: FnMut(S::Item) -> Result<U>,
{
    type Item = U;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        match self.seq.pull()? {
            Some(item) => (self.f)(item).map(Some),
            None => Ok(None),
        }
    }
}

impl<A, B> Source for Chain<A, B>
where
    A: Source,
    B: Source<Item = A::Item>,
{
    type Item = A::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        if let Some(first) = self.first.as_mut() {
            if let Some(item) = first.pull()? {
                return Ok(Some(item));
            }
            trace_event!("chain: first source exhausted, switching to second");
            self.first = None;
        }
        self.second.pull()
    }
}

impl<S, I> Source for ChainAll<S, I>
where
    S: Source,
    I: Iterator,
    I::Item: Source<Item = S::Item>,
{
    type Item = S::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        if let Some(head) = self.head.as_mut() {
            if let Some(item) = head.pull()? {
                return Ok(Some(item));
            }
            self.head = None;
        }
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(item) = current.pull()? {
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

impl<A, B> Source for Zip<A, B>
where
    A: Source,
    B: Source,
{
    type Item = (A::Item, B::Item);

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        if self.state == ZipState::Done {
            return Ok(None);
        }
        let left = self.left.pull()?;
        let right = self.right.pull()?;
        match (left, right) {
            (Some(l), Some(r)) => Ok(Some((l, r))),
            _ => {
                trace_event!("zip: one side exhausted, stopping");
                self.state = ZipState::Done;
                Ok(None)
            }
        }
    }
}

impl<S: Source> Source for Enumerate<S> {
    type Item = (usize, S::Item);

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        match self.seq.pull()? {
            Some(item) => {
                let index = self.index;
                self.index += 1;
                Ok(Some((index, item)))
            }
            None => Ok(None),
        }
    }
}

impl<S: Source> Source for Take<S> {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        match self.seq.pull()? {
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

impl<S: Source> Source for Skip<S> {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        while self.remaining > 0 {
            if self.seq.pull()?.is_none() {
                self.remaining = 0;
                return Ok(None);
            }
            self.remaining -= 1;
        }
        self.seq.pull()
    }
}

impl<S, I> Source for Flat<S, I>
where
    S: Source,
    S::Item: IntoIterator<IntoIter = I>,
    I: Iterator,
{
    type Item = I::Item;

    fn pull(&mut self) -> Result<Option<Self::Item>> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                if let Some(item) = inner.next() {
                    return Ok(Some(item));
                }
                self.current = None;
            }
            match self.seq.pull()? {
                Some(next) => self.current = Some(next.into_iter()),
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Error, Source};
    use crate::sequence::{from_fn, iter, SyncSequence};
    use std::cell::Cell;
    use std::rc::Rc;

    /// A source over `0..len` that records how many times it was pulled
    fn counted(len: i32, pulls: Rc<Cell<usize>>) -> SyncSequence<impl Source<Item = i32>> {
        let mut next = 0;
        from_fn(move || {
            pulls.set(pulls.get() + 1);
            if next < len {
                next += 1;
                Ok(Some(next - 1))
            } else {
                Ok(None)
            }
        })
    }

    #[test]
    fn test_filter_combinator() {
        let evens = iter(1..=10).filter(|x| x % 2 == 0).collect().unwrap();
        assert_eq!(evens, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_filter_map_combinator() {
        let doubled_odds = iter(1..=10)
            .filter_map(|x| if x % 2 == 0 { None } else { Some(x * 2) })
            .collect()
            .unwrap();
        assert_eq!(doubled_odds, vec![2, 6, 10, 14, 18]);
    }

    #[test]
    fn test_map_combinator() {
        let mapped = iter(1..6).map(|x| x * 2).collect().unwrap();
        assert_eq!(mapped, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_try_map_stops_at_first_failure() {
        let mut seen = Vec::new();
        let result = iter(1..10)
            .try_map(|x| {
                if x == 4 {
                    Err(Error::custom("four is not allowed"))
                } else {
                    Ok(x)
                }
            })
            .for_each(|x| seen.push(x));

        assert!(matches!(result, Err(Error::Custom(ref msg)) if msg == "four is not allowed"));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_chain_combinator() {
        let chained = iter(1..4).chain(iter(4..7)).collect().unwrap();
        assert_eq!(chained, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_chain_all_keeps_argument_order() {
        let chained = iter(vec![1])
            .chain_all(vec![iter(vec![2, 3]), iter(vec![]), iter(vec![4])])
            .collect()
            .unwrap();
        assert_eq!(chained, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_chain_all_with_no_others() {
        let others: Vec<SyncSequence<crate::sources::IterSource<std::vec::IntoIter<i32>>>> =
            Vec::new();
        let chained = iter(vec![7, 8]).chain_all(others).collect().unwrap();
        assert_eq!(chained, vec![7, 8]);
    }

    #[test]
    fn test_zip_pulls_both_sides_each_step() {
        let left_pulls = Rc::new(Cell::new(0));
        let right_pulls = Rc::new(Cell::new(0));

        let pairs = counted(2, left_pulls.clone())
            .zip(counted(5, right_pulls.clone()))
            .collect()
            .unwrap();

        assert_eq!(pairs, vec![(0, 0), (1, 1)]);
        // two yielding steps plus the step that observed exhaustion
        assert_eq!(left_pulls.get(), 3);
        assert_eq!(right_pulls.get(), 3);
    }

    #[test]
    fn test_enumerate_counts_yielded_items() {
        let indexed = iter(vec!['a', 'b', 'c', 'd'])
            .filter(|c| *c != 'b')
            .enumerate()
            .collect()
            .unwrap();
        assert_eq!(indexed, vec![(0, 'a'), (1, 'c'), (2, 'd')]);
    }

    #[test]
    fn test_take_does_not_drain_parent() {
        let pulls = Rc::new(Cell::new(0));
        let taken = counted(100, pulls.clone()).take(3).collect().unwrap();
        assert_eq!(taken, vec![0, 1, 2]);
        assert_eq!(pulls.get(), 3);

        let pulls = Rc::new(Cell::new(0));
        assert!(counted(100, pulls.clone()).take(0).collect().unwrap().is_empty());
        assert_eq!(pulls.get(), 0);
    }

    #[test]
    fn test_skip_counts_pulled_items() {
        let skipped = iter(1..=10).skip(7).collect().unwrap();
        assert_eq!(skipped, vec![8, 9, 10]);

        let past_end = iter(1..=3).skip(5).collect().unwrap();
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_flat_flattens_one_level() {
        let flat = iter(vec![vec![1, 2], vec![], vec![3], vec![4, 5]])
            .flat()
            .collect()
            .unwrap();
        assert_eq!(flat, vec![1, 2, 3, 4, 5]);

        let nested = iter(vec![vec![vec![1], vec![2]]]).flat().collect().unwrap();
        assert_eq!(nested, vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_complex_combination() {
        let result = iter(1..21)
            .filter(|x| x % 2 == 0) // Even numbers
            .map(|x| x * 3) // Multiply by 3
            .take(3)
            .collect()
            .unwrap();

        assert_eq!(result, vec![6, 12, 18]);
    }
}
