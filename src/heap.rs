use crate::error::{try_reserve, Result};

const DEFAULT_CAPACITY: usize = 256;

/// Array-backed binary min-heap.
///
/// Equal items are never swapped, so for a fixed insertion sequence the
/// extraction order is fixed too.
#[derive(Debug, Clone)]
pub(crate) struct MinHeap<T> {
    items: Vec<T>,
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Result<Self> {
        let mut items = Vec::new();
        try_reserve(&mut items, DEFAULT_CAPACITY)?;
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn insert(&mut self, item: T) -> Result<()> {
        if self.items.len() == self.items.capacity() {
            // double
            let additional = self.items.len().max(1);
            try_reserve(&mut self.items, additional)?;
        }
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn extract_min(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let min = self.items.pop();
        self.sift_down(0);
        min
    }

    /// Whether every parent is no greater than its children.
    pub fn is_heap(&self) -> bool {
        (1..self.items.len()).all(|i| self.items[(i - 1) / 2] <= self.items[i])
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.items[parent] <= self.items[i] {
                break;
            }
            self.items.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.items.len();
        loop {
            let l = 2 * i + 1;
            let r = 2 * i + 2;
            let mut smallest = i;

            if l < len && self.items[l] < self.items[smallest] {
                smallest = l;
            }
            if r < len && self.items[r] < self.items[smallest] {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.items.swap(i, smallest);
            i = smallest;
        }
    }
}
