#[cfg(test)]
mod tests {
    use smart_money::cache::TimedCache;
    use std::time::{Duration, Instant};

    type Key = (Vec<String>, String);

    fn key(symbols: &[&str], timeframe: &str) -> Key {
        (
            symbols.iter().map(|s| s.to_string()).collect(),
            timeframe.to_string(),
        )
    }

    #[test]
    fn test_empty_cache_is_expired() {
        let cache: TimedCache<Key, u32> = TimedCache::new(Duration::from_secs(600));
        let now = Instant::now();
        assert!(cache.is_expired(now));
        assert!(cache.get(&key(&["BTC/USDT"], "1d"), now).is_none());
        assert_eq!(cache.remaining(now), Duration::ZERO);
    }

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = TimedCache::new(Duration::from_secs(600));
        let t0 = Instant::now();
        cache.store(key(&["BTC/USDT"], "1d"), 42u32, t0);

        let later = t0 + Duration::from_secs(599);
        assert!(!cache.is_expired(later));
        assert_eq!(cache.get(&key(&["BTC/USDT"], "1d"), later), Some(&42));
        assert_eq!(cache.remaining(later), Duration::from_secs(1));
    }

    #[test]
    fn test_expires_at_ttl() {
        let mut cache = TimedCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.store(key(&["BTC/USDT"], "1d"), 1u32, t0);

        let expired = t0 + Duration::from_secs(300);
        assert!(cache.is_expired(expired));
        assert!(cache.get(&key(&["BTC/USDT"], "1d"), expired).is_none());
    }

    #[test]
    fn test_different_key_misses() {
        let mut cache = TimedCache::new(Duration::from_secs(600));
        let t0 = Instant::now();
        cache.store(key(&["BTC/USDT", "ETH/USDT"], "1d"), 7u32, t0);

        assert!(cache.get(&key(&["BTC/USDT"], "1d"), t0).is_none());
        assert!(cache.get(&key(&["BTC/USDT", "ETH/USDT"], "4h"), t0).is_none());
        assert_eq!(cache.get(&key(&["BTC/USDT", "ETH/USDT"], "1d"), t0), Some(&7));
    }

    #[test]
    fn test_force_invalidate_and_replace() {
        let mut cache = TimedCache::new(Duration::from_secs(600));
        let t0 = Instant::now();
        let k = key(&["BTC/USDT"], "1d");

        cache.store(k.clone(), 1u32, t0);
        cache.force_invalidate();
        assert!(cache.get(&k, t0).is_none());

        assert_eq!(*cache.store(k.clone(), 2u32, t0), 2);
        assert_eq!(*cache.store(k.clone(), 3u32, t0), 3);
        assert_eq!(cache.get(&k, t0), Some(&3));
    }
}
