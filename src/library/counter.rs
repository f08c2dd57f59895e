use std::{
    borrow::Borrow,
    cmp::Reverse,
    collections::{btree_map, hash_map, BTreeMap, HashMap},
    hash::Hash,
    marker::PhantomData,
    num::NonZeroUsize,
};

use itertools::Itertools;

use super::try_build_iter;

/// Key-value storage behind a [`Counter`].
pub trait CounterStore: Sized {
    /// The thing being counted
    type Item;

    /// What iteration yields in place of an item; `&T` for the map-backed
    /// stores.
    type IterItem<'a>: Borrow<Self::Item>
    where
        Self: 'a;

    type Iter<'a>: Iterator<Item = (Self::IterItem<'a>, &'a usize)> + Clone
    where
        Self::Item: 'a,
        Self: 'a;

    #[must_use]
    fn new() -> Self;

    fn add(&mut self, key: Self::Item, count: NonZeroUsize);

    /// Number of distinct keys with a nonzero count
    #[must_use]
    fn len(&self) -> usize;

    #[must_use]
    fn iter(&self) -> Self::Iter<'_>;
}

impl<T: Hash + Eq> CounterStore for HashMap<T, usize> {
    type Item = T;
    type IterItem<'a> = &'a T where T: 'a;
    type Iter<'a> = hash_map::Iter<'a, T, usize> where T: 'a;

    #[inline]
    fn new() -> Self {
        HashMap::new()
    }

    #[inline]
    fn add(&mut self, key: T, count: NonZeroUsize) {
        *self.entry(key).or_default() += count.get();
    }

    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        HashMap::iter(self)
    }
}

impl<T: Ord> CounterStore for BTreeMap<T, usize> {
    type Item = T;
    type IterItem<'a> = &'a T where T: 'a;
    type Iter<'a> = btree_map::Iter<'a, T, usize> where T: 'a;

    #[inline]
    fn new() -> Self {
        BTreeMap::new()
    }

    #[inline]
    fn add(&mut self, key: T, count: NonZeroUsize) {
        *self.entry(key).or_default() += count.get()
    }

    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        BTreeMap::iter(self)
    }
}

/// A multiset: tracks how many of each item have been added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter<T, Store: CounterStore<Item = T> = HashMap<T, usize>> {
    counts: Store,
    phantom: PhantomData<T>,
}

impl<T, Store: CounterStore<Item = T>> Counter<T, Store> {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: Store::new(),
            phantom: PhantomData,
        }
    }

    /// Number of distinct items in the counter
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Iterate over every item with a nonzero count, along with that count
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Store::IterItem<'_>, NonZeroUsize)> + Clone {
        self.counts
            .iter()
            .filter_map(|(item, &count)| NonZeroUsize::new(count).map(|count| (item, count)))
    }

    #[inline]
    pub fn add(&mut self, item: T, count: NonZeroUsize) {
        self.counts.add(item, count)
    }

    /// Sum of the counts of every item
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.iter().map(|(_, count)| count.get()).sum()
    }

    /// The `N` most plentiful items, sorted from most to least plentiful.
    /// Returns `None` if there are fewer than `N` distinct items.
    #[must_use]
    pub fn top<const N: usize>(&self) -> Option<[(Store::IterItem<'_>, NonZeroUsize); N]> {
        let mut iter = self.iter();
        let mut buffer = try_build_iter(&mut iter)?;

        if N > 1 {
            buffer.sort_unstable_by_key(|&(_, count)| Reverse(count));
        }

        iter.for_each(|(item, count)| {
            if let Some(last) = buffer.last_mut() {
                if last.1 < count {
                    *last = (item, count);

                    if N > 1 {
                        buffer.sort_unstable_by_key(|&(_, count)| Reverse(count));
                    }
                }
            }
        });

        Some(buffer)
    }
}

impl<T, Store: CounterStore<Item = T>> Default for Counter<T, Store> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq, Store: CounterStore<Item = T>> Extend<(T, NonZeroUsize)> for Counter<T, Store> {
    #[inline]
    fn extend<I: IntoIterator<Item = (T, NonZeroUsize)>>(&mut self, iter: I) {
        iter.into_iter()
            .coalesce(|(lhs, lhs_count), (rhs, rhs_count)| match lhs == rhs {
                true => Ok((
                    lhs,
                    lhs_count
                        .checked_add(rhs_count.get())
                        .expect("addition overflow"),
                )),
                false => Err(((lhs, lhs_count), (rhs, rhs_count))),
            })
            .for_each(|(item, count)| self.add(item, count))
    }
}

impl<T: Eq, Store: CounterStore<Item = T>> Extend<(T, usize)> for Counter<T, Store> {
    #[inline]
    fn extend<I: IntoIterator<Item = (T, usize)>>(&mut self, iter: I) {
        self.extend(
            iter.into_iter()
                .filter_map(|(item, count)| NonZeroUsize::new(count).map(|count| (item, count))),
        )
    }
}

impl<T: Eq, Store: CounterStore<Item = T>> Extend<T> for Counter<T, Store> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|item| (item, NonZeroUsize::MIN)))
    }
}

impl<T, Store: CounterStore<Item = T>, U> FromIterator<U> for Counter<T, Store>
where
    Self: Extend<U>,
{
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

pub type OrderedCounter<T> = Counter<T, BTreeMap<T, usize>>;
