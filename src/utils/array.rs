//! Growable sequence of handles with comparator-driven search and sorting.
//!
//! Ownership follows the element type: a `DynamicArray<&'a T>` borrows its
//! elements and the caller keeps them alive, while a `DynamicArray<T>` owns
//! them and hands each one to a destructor callback when it is removed with
//! [`DynamicArray::set_length`] or [`DynamicArray::free_with`].

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicArray<T> {
    items: Vec<T>,
}

impl<T> DynamicArray<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Append an element, amortised O(1)
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the last element; `None` on an empty array
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Remove the element at `index`, keeping the order of the rest
    pub fn delete(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Index of the first element satisfying `pred`, scanning from the front
    pub fn index_of_linear<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().position(pred)
    }

    /// Binary search for `needle` in an array sorted by `cmp`.
    ///
    /// The caller keeps the array sorted. When several elements compare
    /// equal, whichever the midpoint lands on first is returned.
    pub fn index_of_sorted<P, F>(&self, needle: &P, mut cmp: F) -> Option<usize>
    where
        P: ?Sized,
        F: FnMut(&P, &T) -> Ordering,
    {
        if self.items.is_empty() {
            return None;
        }

        let mut lo = 0usize;
        let mut hi = self.items.len() - 1;
        loop {
            let mid = lo + (hi - lo) / 2;
            match cmp(needle, &self.items[mid]) {
                Ordering::Equal => return Some(mid),
                Ordering::Less => {
                    if mid == lo {
                        return None;
                    }
                    hi = mid - 1;
                }
                Ordering::Greater => {
                    if mid == hi {
                        return None;
                    }
                    lo = mid + 1;
                }
            }
        }
    }

    pub fn sort<F>(&mut self, cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(cmp);
    }

    /// Sort, then collapse every run of comparator-equal neighbours to its
    /// first element. The sort is stable, so the survivor is deterministic.
    pub fn sort_unique<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(&mut cmp);
        self.items.dedup_by(|later, kept| cmp(kept, later) == Ordering::Equal);
    }

    /// Sort the half-open range `lo..hi`, optionally dropping duplicates
    /// inside it; elements after the range move down to close the gap.
    ///
    /// `hi` is clamped to the length and `lo` to `hi`.
    pub fn sort_range<F>(&mut self, lo: usize, hi: usize, unique: bool, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let hi = hi.min(self.items.len());
        let lo = lo.min(hi);
        if hi - lo < 2 {
            return;
        }

        let mut tail = self.items.split_off(hi);
        let mut middle = self.items.split_off(lo);
        middle.sort_by(&mut cmp);
        if unique {
            middle.dedup_by(|later, kept| cmp(kept, later) == Ordering::Equal);
        }
        self.items.append(&mut middle);
        self.items.append(&mut tail);
    }

    /// Grow with elements produced by `alloc`, or shrink by handing every
    /// dropped tail element to `free`
    pub fn set_length<A, D>(&mut self, len: usize, mut alloc: A, mut free: D)
    where
        A: FnMut() -> T,
        D: FnMut(T),
    {
        if len < self.items.len() {
            for item in self.items.drain(len..) {
                free(item);
            }
        } else {
            self.items.reserve(len - self.items.len());
            while self.items.len() < len {
                self.items.push(alloc());
            }
        }
    }

    /// Tear down, passing each element to `destructor` in order
    pub fn free_with<D>(self, destructor: D)
    where
        D: FnMut(T),
    {
        self.items.into_iter().for_each(destructor);
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for DynamicArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_delete() {
        let mut a = DynamicArray::new();
        assert_eq!(a.pop(), None::<i32>);
        a.push(1);
        a.push(2);
        a.push(3);
        assert_eq!(a.delete(0), Some(1));
        assert_eq!(a.as_slice(), &[2, 3]);
        assert_eq!(a.delete(5), None);
        assert_eq!(a.pop(), Some(3));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_sort_unique_always_distinct_keeps_all() {
        let mut a: DynamicArray<u32> = vec![5, 3, 9, 1, 7].into();
        a.sort_unique(|x, y| x.cmp(y));
        assert_eq!(a.as_slice(), &[1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_sort_unique_always_equal_keeps_one() {
        for n in 1..20 {
            let mut a: DynamicArray<usize> = (0..n).collect();
            a.sort_unique(|_, _| Ordering::Equal);
            assert_eq!(a.len(), 1);
        }
        let mut empty: DynamicArray<usize> = DynamicArray::new();
        empty.sort_unique(|_, _| Ordering::Equal);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_sort_unique_collapses_runs() {
        let mut a: DynamicArray<&str> = vec!["b", "a", "B", "c", "A"].into();
        a.sort_unique(|x, y| x.to_lowercase().cmp(&y.to_lowercase()));
        assert_eq!(a.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn test_index_of_sorted() {
        let a: DynamicArray<i32> = vec![1, 3, 5, 7, 9, 11].into();
        for (i, v) in a.iter().enumerate() {
            assert_eq!(a.index_of_sorted(v, |p, e| p.cmp(e)), Some(i));
        }
        assert_eq!(a.index_of_sorted(&0, |p, e| p.cmp(e)), None);
        assert_eq!(a.index_of_sorted(&4, |p, e| p.cmp(e)), None);
        assert_eq!(a.index_of_sorted(&12, |p, e| p.cmp(e)), None);

        let empty: DynamicArray<i32> = DynamicArray::new();
        assert_eq!(empty.index_of_sorted(&1, |p, e| p.cmp(e)), None);
    }

    #[test]
    fn test_index_of_linear() {
        let a: DynamicArray<i32> = vec![4, 8, 15].into();
        assert_eq!(a.index_of_linear(|x| *x > 5), Some(1));
        assert_eq!(a.index_of_linear(|x| *x > 50), None);
    }

    #[test]
    fn test_sort_range_unique_shrinks() {
        let mut a: DynamicArray<i32> = vec![0, 3, 1, 3, 1, 99].into();
        a.sort_range(1, 5, true, |x, y| x.cmp(y));
        assert_eq!(a.as_slice(), &[0, 1, 3, 99]);

        let mut b: DynamicArray<i32> = vec![2, 1].into();
        b.sort_range(0, 100, false, |x, y| x.cmp(y));
        assert_eq!(b.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_set_length_calls_callbacks() {
        let mut a: DynamicArray<String> = DynamicArray::new();
        a.set_length(3, || "x".to_string(), |_| unreachable!());
        assert_eq!(a.len(), 3);

        let mut freed = Vec::new();
        a.set_length(1, || unreachable!(), |s| freed.push(s));
        assert_eq!(a.len(), 1);
        assert_eq!(freed.len(), 2);
    }

    #[test]
    fn test_free_with_visits_each() {
        let a: DynamicArray<u8> = vec![1, 2, 3].into();
        let mut seen = 0;
        a.free_with(|_| seen += 1);
        assert_eq!(seen, 3);
    }
}
