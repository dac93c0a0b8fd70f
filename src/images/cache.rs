use anyhow::Result;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::clock::Clock;
use crate::model::{CachedImage, ImageSource};
use crate::normalize::place_key;
use crate::store::kv;
use crate::store::status::CITY_IMAGE_PREFIX;

pub const IMAGE_TTL: Duration = Duration::from_millis(7 * 24 * 60 * 60 * 1000);

/// Raw string storage behind the image cache (per-key atomic writes).
pub trait ImageStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

impl ImageStore for Connection {
    fn load(&self, key: &str) -> Result<Option<String>> {
        kv::get(self, key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        kv::set(self, key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        kv::remove(self, key).map(|_| ())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl ImageStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: ImageStore + ?Sized> ImageStore for &S {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

pub fn cache_key(name: &str, country: Option<&str>) -> String {
    format!("{CITY_IMAGE_PREFIX}{}", place_key(name, country))
}

/// TTL-bound image cache. Stale entries are removed when read; there is no sweeper.
pub struct ImageCache<S, C> {
    store: S,
    clock: C,
    ttl: Duration,
}

impl<S: ImageStore, C: Clock> ImageCache<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            ttl: IMAGE_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fresh entry for the place, if any. Storage or decode problems count as a miss.
    pub fn get(&self, name: &str, country: Option<&str>) -> Option<CachedImage> {
        let key = cache_key(name, country);

        let raw = match self.store.load(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "image cache read failed");
                return None;
            }
        };

        let entry: CachedImage = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(%key, error = %e, "dropping unreadable image cache entry");
                self.evict(&key);
                return None;
            }
        };

        // An age that does not fit (corrupt timestamp) counts as expired.
        let ttl = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let age = self.clock.now_millis().checked_sub(entry.timestamp);
        if age.is_none_or(|age| age > ttl) {
            tracing::debug!(%key, age_ms = ?age, "image cache entry expired");
            self.evict(&key);
            return None;
        }

        Some(entry)
    }

    /// Stores `url` with a fresh timestamp.
    pub fn put(&self, name: &str, country: Option<&str>, url: &str, source: ImageSource) {
        let key = cache_key(name, country);
        let entry = CachedImage {
            url: url.to_string(),
            timestamp: self.clock.now_millis(),
            source,
        };

        let write = serde_json::to_string(&entry)
            .map_err(anyhow::Error::from)
            .and_then(|raw| self.store.save(&key, &raw));
        if let Err(e) = write {
            tracing::warn!(%key, error = %e, "image cache write failed");
        }
    }

    fn evict(&self, key: &str) {
        if let Err(e) = self.store.delete(key) {
            tracing::warn!(%key, error = %e, "image cache eviction failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    const DAY: Duration = Duration::from_millis(24 * 60 * 60 * 1000);
    const T0: i64 = 1_760_000_000_000;

    #[test]
    fn hit_within_ttl_keeps_source() {
        let clock = FixedClock::new(T0);
        let cache = ImageCache::new(MemoryStore::new(), &clock);
        cache.put("Lyon", Some("France"), "https://img/lyon.jpg", ImageSource::GooglePlaces);

        clock.advance(6 * DAY);
        let hit = cache.get("lyon", Some("france")).expect("fresh entry");
        assert_eq!(hit.url, "https://img/lyon.jpg");
        assert_eq!(hit.source, ImageSource::GooglePlaces);
        assert_eq!(hit.timestamp, T0);
    }

    #[test]
    fn expired_entry_is_a_miss_and_is_removed() {
        let clock = FixedClock::new(T0);
        let cache = ImageCache::new(MemoryStore::new(), &clock);
        cache.put("Lyon", Some("France"), "https://img/lyon.jpg", ImageSource::Wikipedia);

        clock.set(T0 + IMAGE_TTL.as_millis() as i64 + 1);
        assert!(cache.get("Lyon", Some("France")).is_none());
        assert!(cache.store().is_empty());
    }

    #[test]
    fn exactly_seven_days_is_still_fresh() {
        let clock = FixedClock::new(T0);
        let cache = ImageCache::new(MemoryStore::new(), &clock);
        cache.put("Nice", None, "u", ImageSource::Wikipedia);

        clock.set(T0 + IMAGE_TTL.as_millis() as i64);
        assert!(cache.get("Nice", None).is_some());
    }

    #[test]
    fn corrupt_entry_is_dropped() {
        let clock = FixedClock::new(T0);
        let store = MemoryStore::new();
        store.save(&cache_key("Nice", None), "not json").unwrap();

        let cache = ImageCache::new(&store, &clock);
        assert!(cache.get("Nice", None).is_none());
        assert!(!store.contains(&cache_key("Nice", None)));
    }

    #[test]
    fn out_of_range_timestamp_is_evicted() {
        let clock = FixedClock::new(T0);
        let store = MemoryStore::new();
        let key = cache_key("Lyon", None);
        store
            .save(
                &key,
                r#"{"url":"u","timestamp":-9223372036854775807,"source":"wikipedia"}"#,
            )
            .unwrap();

        let cache = ImageCache::new(&store, &clock);
        assert!(cache.get("Lyon", None).is_none());
        assert!(!store.contains(&key));
    }

    #[test]
    fn keys_use_city_image_prefix() {
        assert_eq!(cache_key("Málaga", Some("Spain")), "cityImage:malaga|spain");
    }
}
