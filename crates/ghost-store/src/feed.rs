//! Bounded newest-first feed.

/// A feed of recent items, newest first, truncated at a fixed cap.
///
/// Used for the trade and decision tickers and per-commodity price history.
/// Pushing prepends; when the cap is exceeded the oldest items fall off.
#[derive(Debug, Clone)]
pub struct CappedFeed<T> {
    items: Vec<T>,
    cap: usize,
}

impl<T> CappedFeed<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
        }
    }

    /// Prepend one item, dropping the oldest beyond the cap.
    pub fn push(&mut self, item: T) {
        self.items.insert(0, item);
        self.items.truncate(self.cap);
    }

    /// Replace the whole feed, newest first, truncated at the cap.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.items.truncate(self.cap);
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

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl<T: Clone> CappedFeed<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}
