#![forbid(unsafe_code)]

/// Growable backing array shared by the element builders.
///
/// Capacity grows by 1.5x (or straight to the requested size when that is larger), so a long
/// sequence of single appends stays amortised O(1) while `push_no_grow` keeps the fast path for
/// callers that reserved the exact size up front.
#[derive(Clone, Debug)]
pub(crate) struct GrowableVec<T> {
    items: Vec<T>,
}

impl<T> GrowableVec<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn push(&mut self, item: T) {
        self.reserve_for(1);
        self.items.push(item);
    }

    pub fn push_no_grow(&mut self, item: T) {
        debug_assert!(
            self.items.len() < self.items.capacity(),
            "push_no_grow called without reserved capacity"
        );
        self.items.push(item);
    }

    pub fn push_repeated(&mut self, item: T, count: usize)
    where
        T: Clone,
    {
        self.reserve_for(count);
        let new_len = self.items.len() + count;
        self.items.resize(new_len, item);
    }

    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        self.reserve_for(items.len());
        self.items.extend_from_slice(items);
    }

    /// Hand over the appended items, releasing spare capacity.
    pub fn take(&mut self) -> Vec<T> {
        let mut items = std::mem::take(&mut self.items);
        items.shrink_to_fit();
        items
    }

    fn reserve_for(&mut self, additional: usize) {
        let needed = self.items.len() + additional;
        let capacity = self.items.capacity();
        if needed <= capacity {
            return;
        }

        let grown = capacity + capacity / 2 + 1;
        self.items.reserve_exact(grown.max(needed) - self.items.len());
    }
}
