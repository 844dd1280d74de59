use std::{collections::HashMap, hash::Hash};

use chrono::{DateTime, Duration, Utc};

/// Per-owner state that expires after a fixed time to live.
///
/// Expired entries are invisible to lookups but stay in memory until
/// [`SessionMap::evict_expired`] is called.
#[derive(Debug, Clone)]
pub struct SessionMap<K, V> {
    ttl: Duration,
    entries: HashMap<K, (V, DateTime<Utc>)>,
}

impl<K, V> SessionMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Store `value` for `key`, starting its time to live at `now`.
    pub fn insert(&mut self, key: K, value: V, now: DateTime<Utc>) -> Option<V> {
        self.entries
            .insert(key, (value, now))
            .map(|(previous, _)| previous)
    }

    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|(_, inserted_at)| now - *inserted_at < self.ttl)
            .map(|(value, _)| value)
    }

    /// Time until the entry for `key` expires.
    pub fn remaining(&self, key: &K, now: DateTime<Utc>) -> Option<Duration> {
        self.entries
            .get(key)
            .map(|(_, inserted_at)| *inserted_at + self.ttl - now)
            .filter(|remaining| *remaining > Duration::zero())
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(value, _)| value)
    }

    /// Drop every expired entry. Returns how many were dropped.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();

        self.entries
            .retain(|_, (_, inserted_at)| now - *inserted_at < ttl);

        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
