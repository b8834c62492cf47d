//! An immutable multiset whose elements are always kept in sorted order.

use std::fmt;
use std::iter::repeat;

/// A multiset of comparable elements.
///
/// Two bags are equal when they hold the same elements with the same multiplicities,
/// regardless of the order in which they were built.
#[derive(Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct SortedBag<T> {
    elements: Vec<T>,
}

impl<T: Ord + Clone> SortedBag<T> {
    /// The empty bag.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// A bag holding `count` copies of `element`.
    ///
    /// # Example
    /// ```
    /// use tchu::bag::SortedBag;
    ///
    /// let bag = SortedBag::of(3, 'a');
    /// assert_eq!(bag.len(), 3);
    /// assert_eq!(bag.count_of(&'a'), 3);
    /// ```
    pub fn of(count: usize, element: T) -> Self {
        Self {
            elements: repeat(element).take(count).collect(),
        }
    }

    /// A bag holding `count1` copies of `element1` and `count2` copies of `element2`.
    pub fn of_two(count1: usize, element1: T, count2: usize, element2: T) -> Self {
        repeat(element1)
            .take(count1)
            .chain(repeat(element2).take(count2))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The element at the given position of the sorted sequence.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    /// How many times `element` is in the bag.
    pub fn count_of(&self, element: &T) -> usize {
        let start = self.elements.partition_point(|e| e < element);
        let end = self.elements.partition_point(|e| e <= element);
        end - start
    }

    #[inline]
    pub fn contains(&self, element: &T) -> bool {
        self.elements.binary_search(element).is_ok()
    }

    /// Whether `other` is a sub-multiset of this bag.
    pub fn contains_all(&self, other: &SortedBag<T>) -> bool {
        other
            .distinct()
            .iter()
            .all(|element| self.count_of(element) >= other.count_of(element))
    }

    /// The bag holding the elements of both bags, multiplicities added.
    pub fn union(&self, other: &SortedBag<T>) -> SortedBag<T> {
        self.elements.iter().chain(other.elements.iter()).cloned().collect()
    }

    /// The bag holding the elements of this bag minus those of `other`.
    ///
    /// Elements of `other` absent from this bag are ignored.
    ///
    /// # Example
    /// ```
    /// use tchu::bag::SortedBag;
    ///
    /// let bag: SortedBag<_> = [1, 1, 2, 3].into_iter().collect();
    /// let other: SortedBag<_> = [1, 3, 4].into_iter().collect();
    /// assert_eq!(bag.difference(&other), [1, 2].into_iter().collect());
    /// ```
    pub fn difference(&self, other: &SortedBag<T>) -> SortedBag<T> {
        let mut remaining = other.elements.iter().peekable();
        let mut elements = Vec::with_capacity(self.len());
        for element in &self.elements {
            while remaining.next_if(|candidate| *candidate < element).is_some() {}
            if remaining.next_if(|candidate| *candidate == element).is_none() {
                elements.push(element.clone());
            }
        }
        SortedBag { elements }
    }

    /// The distinct elements of the bag, in sorted order.
    pub fn distinct(&self) -> Vec<T> {
        let mut distinct = self.elements.clone();
        distinct.dedup();
        distinct
    }

    /// Every distinct sub-bag of exactly `size` elements, in lexicographic order.
    pub fn subsets_of_size(&self, size: usize) -> Vec<SortedBag<T>> {
        let counts: Vec<(T, usize)> = self
            .distinct()
            .into_iter()
            .map(|element| {
                let count = self.count_of(&element);
                (element, count)
            })
            .collect();

        let mut subsets = Vec::new();
        let mut current = Vec::with_capacity(size);
        Self::collect_subsets(&counts, size, &mut current, &mut subsets);
        subsets
    }

    fn collect_subsets(
        counts: &[(T, usize)],
        size: usize,
        current: &mut Vec<T>,
        subsets: &mut Vec<SortedBag<T>>,
    ) {
        if size == 0 {
            subsets.push(SortedBag {
                elements: current.clone(),
            });
            return;
        }
        let Some(((element, available), rest)) = counts.split_first() else {
            return;
        };

        // Take as many copies of `element` as possible first, so that the output is sorted.
        for taken in (0..=(*available).min(size)).rev() {
            current.extend(repeat(element.clone()).take(taken));
            Self::collect_subsets(rest, size - taken, current, subsets);
            current.truncate(current.len() - taken);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// The sorted sequence of elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<T: Ord + Clone> Default for SortedBag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> FromIterator<T> for SortedBag<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut elements: Vec<T> = iter.into_iter().collect();
        elements.sort();
        Self { elements }
    }
}

impl<T: Ord + Clone> From<Vec<T>> for SortedBag<T> {
    fn from(elements: Vec<T>) -> Self {
        elements.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a SortedBag<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedBag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.elements.iter()).finish()
    }
}
