// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Weighted LRU cache for compiled plans
//!
//! Entries report their own weight; the cache evicts least recently used
//! entries until the total weight fits the capacity.

use lru::LruCache;
use std::sync::Arc;

/// Weight of a cached value
pub trait CacheValue {
    fn size(&self) -> usize;
}

impl<T: CacheValue + ?Sized> CacheValue for Arc<T> {
    fn size(&self) -> usize {
        (**self).size()
    }
}

/// Not synchronized; callers wrap it in a lock
pub struct PlanCache<V> {
    entries: LruCache<String, V>,
    size: usize,
    capacity: usize,
}

impl<V: CacheValue + Clone> PlanCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            size: 0,
            capacity,
        }
    }

    /// Look up and mark as most recently used
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.entries.get(key).cloned()
    }

    /// Look up without touching recency
    pub fn peek(&self, key: &str) -> Option<V> {
        self.entries.peek(key).cloned()
    }

    pub fn set(&mut self, key: String, value: V) {
        self.size += value.size();
        if let Some(old) = self.entries.put(key, value) {
            self.size -= old.size();
        }
        self.evict();
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.entries.pop(key)?;
        self.size -= value.size();
        Some(value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.size = 0;
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict();
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total weight of cached entries
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict(&mut self) {
        while self.size > self.capacity {
            match self.entries.pop_lru() {
                Some((_, value)) => self.size -= value.size(),
                None => break,
            }
        }
    }
}
