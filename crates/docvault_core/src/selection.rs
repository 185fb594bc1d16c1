//! crates/docvault_core/src/selection.rs
//!
//! An ordered multi-select over ids, as used by batch actions and the share
//! dialog.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    items: Vec<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Copy + Eq> Selection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `item` if absent, removes it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, item: T) -> bool {
        if let Some(pos) = self.items.iter().position(|i| *i == item) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(item);
            true
        }
    }

    /// Selects every item of `all`, or clears the selection if all of them
    /// are already selected.
    pub fn toggle_all(&mut self, all: &[T]) {
        if self.is_all_selected(all) {
            self.items.clear();
        } else {
            self.items = all.to_vec();
        }
    }

    pub fn is_all_selected(&self, all: &[T]) -> bool {
        self.items.len() == all.len() && all.iter().all(|item| self.items.contains(item))
    }

    /// Drops selected items that are no longer in `available`.
    pub fn retain_available(&mut self, available: &[T]) {
        self.items.retain(|item| available.contains(item));
    }

    pub fn contains(&self, item: T) -> bool {
        self.items.contains(&item)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
