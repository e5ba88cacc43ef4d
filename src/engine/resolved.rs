use std::{slice, vec};

/// A non-empty, ordered query result. The first element is the primary pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    items: Vec<T>,
}

impl<T> Resolved<T> {
    /// Wraps `items`, or returns `None` if there are none.
    #[must_use]
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Resolved { items })
        }
    }

    /// The primary pick.
    #[must_use]
    pub fn primary(&self) -> &T {
        &self.items[0]
    }

    /// Every selected item, primary first.
    #[must_use]
    pub fn all(&self) -> &[T] {
        &self.items
    }

    /// Number of selected items, at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the selected items.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Consumes the result, keeping only the primary pick.
    #[must_use]
    pub fn into_primary(self) -> T {
        let mut items = self.items;
        items.swap_remove(0)
    }

    /// Consumes the result into its items.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: PartialEq> Resolved<T> {
    /// Returns `true` if `item` was selected.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Returns `true` if every element of `items` was selected.
    #[must_use]
    pub fn contains_all(&self, items: &[T]) -> bool {
        items.iter().all(|item| self.contains(item))
    }
}

impl<T> IntoIterator for Resolved<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Resolved<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
