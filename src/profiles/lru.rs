use std::collections::VecDeque;

/// Bounded map with strict least-recently-used eviction.
///
/// Meant for a handful of entries: lookups are linear. The most recently
/// used entry is at the back.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    entries: VecDeque<(K, V)>,
    capacity: usize,
}

impl<K: PartialEq, V> LruCache<K, V> {
    /// Creates an empty cache holding at most `capacity` entries (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Inserts or replaces `key`, making it the most recently used. Returns
    /// the evicted entry, if the cache overflowed.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(index) = self.position(&key) {
            self.entries.remove(index);
        }
        self.entries.push_back((key, value));
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Returns the value of `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = self.position(key)?;
        let entry = self.entries.remove(index)?;
        self.entries.push_back(entry);
        self.entries.back().map(|(_, v)| v)
    }

    /// Returns true if `key` is cached, without touching recency.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Removes `key`.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.position(key)?;
        self.entries.remove(index).map(|(_, v)| v)
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
