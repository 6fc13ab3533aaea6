use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// One hour, matching how long search and page data stay fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Identifies a cached call: the operation name plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    function: &'static str,
    args: Vec<String>,
}

impl CacheKey {
    pub fn new<I, S>(function: &'static str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function,
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Process-wide time-to-live cache. Entries expire a fixed duration after
/// insertion; there is no other invalidation.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: CacheKey, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, key: &CacheKey, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Inserting also sweeps every expired entry, so the map never holds
    /// more than one TTL window worth of calls.
    fn insert_at(&self, key: CacheKey, value: V, now: Instant) {
        let entry = Entry {
            value,
            expires_at: now + self.ttl,
        };
        let mut entries = self.lock();
        entries.retain(|_, e| now < e.expires_at);
        entries.insert(key, entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Entry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let key = CacheKey::new("serp", ["caffè", "creds"]);
        let start = Instant::now();

        cache.insert_at(key.clone(), 7, start);

        assert_eq!(cache.get_at(&key, start + Duration::from_secs(59)), Some(7));
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let key = CacheKey::new("serp", ["caffè", "creds"]);
        let start = Instant::now();

        cache.insert_at(key.clone(), 7, start);

        assert_eq!(cache.get_at(&key, start + Duration::from_secs(60)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_sweeps_expired_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let start = Instant::now();

        cache.insert_at(CacheKey::new("serp", ["pizza"]), 1, start);
        cache.insert_at(CacheKey::new("serp", ["pasta"]), 2, start + Duration::from_secs(30));
        assert_eq!(cache.len(), 2);

        cache.insert_at(CacheKey::new("serp", ["gelato"]), 3, start + Duration::from_secs(61));
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get_at(&CacheKey::new("serp", ["pizza"]), start + Duration::from_secs(61)),
            None
        );
        assert_eq!(
            cache.get_at(&CacheKey::new("serp", ["pasta"]), start + Duration::from_secs(61)),
            Some(2)
        );
    }

    #[test]
    fn test_function_identity_is_part_of_key() {
        let cache = TtlCache::default();
        cache.insert(CacheKey::new("serp", ["https://a.it"]), "serp".to_string());

        assert_eq!(cache.get(&CacheKey::new("content", ["https://a.it"])), None);
        assert_eq!(
            cache.get(&CacheKey::new("serp", ["https://a.it"])),
            Some("serp".to_string())
        );
    }

    #[test]
    fn test_arguments_are_part_of_key() {
        let cache = TtlCache::default();
        cache.insert(CacheKey::new("serp", ["pizza", "creds-a"]), 1);

        assert_eq!(cache.get(&CacheKey::new("serp", ["pizza", "creds-b"])), None);
        assert_eq!(cache.get(&CacheKey::new("serp", ["pasta", "creds-a"])), None);
        assert_eq!(cache.len(), 1);
    }
}
