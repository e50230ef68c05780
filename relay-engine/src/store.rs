//! Keyed store abstraction behind the thread registry and conversation states.
//!
//! [`KeyedStore`] is async so a durable backend can replace [`InMemoryStore`] without touching
//! routing logic. [`InMemoryStore`] is a sharded concurrent map; entries live for the process lifetime.

use async_trait::async_trait;
use dashmap::DashMap;
use relay_core::Result;
use std::hash::Hash;

/// get / set / upsert-if-absent over a single key space. Each operation is atomic per key.
#[async_trait]
pub trait KeyedStore<K, V>: Send + Sync
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Returns the value stored for `key`, if any.
    async fn get(&self, key: &K) -> Result<Option<V>>;

    /// Stores `value` for `key`, replacing any previous value (last writer wins).
    async fn set(&self, key: K, value: V) -> Result<()>;

    /// Stores `value` only when `key` is absent. Returns the value now stored for `key`.
    async fn upsert_if_absent(&self, key: K, value: V) -> Result<V>;
}

/// [`KeyedStore`] backed by a `DashMap`.
#[derive(Debug)]
pub struct InMemoryStore<K, V>
where
    K: Eq + Hash,
{
    map: DashMap<K, V>,
}

impl<K, V> InMemoryStore<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V> Default for InMemoryStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> KeyedStore<K, V> for InMemoryStore<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.map.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: K, value: V) -> Result<()> {
        self.map.insert(key, value);
        Ok(())
    }

    async fn upsert_if_absent(&self, key: K, value: V) -> Result<V> {
        let stored = self.map.entry(key).or_insert(value).value().clone();
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store: InMemoryStore<i64, String> = InMemoryStore::new();
        assert_eq!(store.get(&1).await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = InMemoryStore::new();
        store.set(1_i64, "a".to_string()).await.unwrap();
        store.set(1_i64, "b".to_string()).await.unwrap();
        assert_eq!(store.get(&1).await.unwrap(), Some("b".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_if_absent_keeps_existing_value() {
        let store = InMemoryStore::new();
        assert_eq!(store.upsert_if_absent(7_i64, 1_u8).await.unwrap(), 1);
        assert_eq!(store.upsert_if_absent(7_i64, 2_u8).await.unwrap(), 1);
        assert_eq!(store.get(&7).await.unwrap(), Some(1));
    }
}
