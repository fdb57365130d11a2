use std::time::{Duration, Instant};

/// A single memoized value with a time-to-live.
///
/// The value is tagged with the key it was computed for; asking with a
/// different key is a miss. Callers pass `now` explicitly so expiry can be
/// tested without sleeping.
#[derive(Debug, Clone)]
pub struct TimedCache<K, V> {
    ttl: Duration,
    entry: Option<Entry<K, V>>,
}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    stored_at: Instant,
}

impl<K: PartialEq, V> TimedCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// True when nothing is stored or the stored value has outlived the TTL.
    pub fn is_expired(&self, now: Instant) -> bool {
        match &self.entry {
            Some(entry) => now.saturating_duration_since(entry.stored_at) >= self.ttl,
            None => true,
        }
    }

    /// Time left before the stored value expires.
    pub fn remaining(&self, now: Instant) -> Duration {
        match &self.entry {
            Some(entry) => self
                .ttl
                .saturating_sub(now.saturating_duration_since(entry.stored_at)),
            None => Duration::ZERO,
        }
    }

    pub fn get(&self, key: &K, now: Instant) -> Option<&V> {
        if self.is_expired(now) {
            return None;
        }
        self.entry
            .as_ref()
            .filter(|entry| entry.key == *key)
            .map(|entry| &entry.value)
    }

    /// Replaces whatever was stored.
    pub fn store(&mut self, key: K, value: V, now: Instant) -> &V {
        let entry = self.entry.insert(Entry {
            key,
            value,
            stored_at: now,
        });
        &entry.value
    }

    /// Drop the stored value so the next lookup misses.
    pub fn force_invalidate(&mut self) {
        self.entry = None;
    }
}
