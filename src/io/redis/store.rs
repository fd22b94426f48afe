//! Key-value stores the Redis importer reads from.
//!
//! The importer only needs two operations: GET a key and list the keys
//! matching a pattern. [`RedisStore`] issues them against a Redis server,
//! [`MemoryStore`] serves them from memory for tests and offline use.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use redis::aio::ConnectionManager;
use tokio::runtime::Runtime;
use tracing::trace;

use crate::connection::{ConnectionConfig, RedisConnection};
use crate::error::{Error, Result};

/// Number of keys requested per SCAN round trip.
const SCAN_COUNT: usize = 100;

/// Read access to a store of string values.
pub trait KeyValueStore {
    /// Get the value at `key`.
    ///
    /// Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// List the keys matching a glob-style `pattern`.
    ///
    /// Order is defined by the store.
    fn keys(&self, pattern: &str) -> Result<Vec<String>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        (**self).keys(pattern)
    }
}

/// In-memory store. Keys are listed in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Vec<(String, String)>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value in place.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        let mut data = self
            .data
            .write()
            .map_err(|e| Error::Runtime(format!("Failed to acquire write lock: {}", e)))?;

        match data.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => data.push((key, value)),
        }
        Ok(())
    }

    /// Remove `key` if present.
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| Error::Runtime(format!("Failed to acquire write lock: {}", e)))?;
        data.retain(|(k, _)| k != key);
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data: Vec<(String, String)> = Vec::new();
        for (key, value) in iter {
            let key = key.into();
            let value = value.into();
            match data.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => data.push((key, value)),
            }
        }
        Self {
            data: RwLock::new(data),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| Error::Runtime(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone()))
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| Error::Runtime(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .iter()
            .filter(|(k, _)| glob_match(pattern.as_bytes(), k.as_bytes()))
            .map(|(k, _)| k.clone())
            .collect())
    }
}

/// Match `text` against a glob with `*` and `?` wildcards, as Redis SCAN does.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == b'?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}

/// Redis-backed store.
///
/// Each call blocks on an owned tokio runtime, so a `RedisStore` must not be
/// used from inside an async context. Wrap calls in `spawn_blocking` there.
pub struct RedisStore {
    runtime: Arc<Runtime>,
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to the Redis server at `url`.
    pub fn new(url: &str) -> Result<Self> {
        Self::connect(RedisConnection::new(url)?)
    }

    /// Connect using structured connection parameters.
    pub fn from_config(config: &ConnectionConfig) -> Result<Self> {
        Self::connect(RedisConnection::from_config(config)?)
    }

    /// Wrap an already-open connection.
    ///
    /// `runtime` must be the runtime `conn` was created on.
    pub fn from_manager(runtime: Arc<Runtime>, conn: ConnectionManager) -> Self {
        Self { runtime, conn }
    }

    fn connect(connection: RedisConnection) -> Result<Self> {
        let runtime = Arc::new(
            Runtime::new()
                .map_err(|e| Error::Runtime(format!("Failed to create runtime: {}", e)))?,
        );
        let conn = runtime.block_on(connection.get_connection_manager())?;
        Ok(Self { runtime, conn })
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();

        self.runtime.block_on(async {
            let result: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
            Ok(result)
        })
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();

        self.runtime.block_on(async {
            let mut keys = Vec::new();
            let mut seen = HashSet::new();
            let mut cursor: u64 = 0;

            loop {
                let (new_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(pattern)
                    .arg("COUNT")
                    .arg(SCAN_COUNT)
                    .query_async(&mut conn)
                    .await?;

                // SCAN may return a key more than once.
                for key in batch {
                    if seen.insert(key.clone()) {
                        keys.push(key);
                    }
                }
                cursor = new_cursor;

                if cursor == 0 {
                    break;
                }
            }

            trace!(pattern, count = keys.len(), "scanned keys");
            Ok(keys)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_memory_store_keys_in_insertion_order() {
        let store: MemoryStore = vec![("b", "1"), ("a", "2"), ("c", "3")]
            .into_iter()
            .collect();
        assert_eq!(store.keys("*").unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_memory_store_delete() {
        let store: MemoryStore = vec![("a", "1"), ("b", "2")].into_iter().collect();
        store.delete("a").unwrap();
        assert_eq!(store.keys("*").unwrap(), vec!["b"]);
    }

    #[test]
    fn test_memory_store_pattern() {
        let store: MemoryStore = vec![("user:1", "{}"), ("user:2", "{}"), ("order:1", "{}")]
            .into_iter()
            .collect();
        assert_eq!(store.keys("user:*").unwrap(), vec!["user:1", "user:2"]);
        assert_eq!(store.keys("*:1").unwrap(), vec!["user:1", "order:1"]);
        assert_eq!(store.keys("user:?").unwrap(), vec!["user:1", "user:2"]);
        assert!(store.keys("nothing*").unwrap().is_empty());
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match(b"*", b""));
        assert!(glob_match(b"*", b"anything"));
        assert!(glob_match(b"a*c", b"abbbc"));
        assert!(!glob_match(b"a*c", b"abbb"));
        assert!(glob_match(b"a?c", b"abc"));
        assert!(!glob_match(b"abc", b"abcd"));
    }

    fn lookup<S: KeyValueStore>(store: S, key: &str) -> Option<String> {
        store.get(key).unwrap()
    }

    #[test]
    fn test_store_by_reference() {
        let store: MemoryStore = vec![("k", "v")].into_iter().collect();
        assert_eq!(lookup(&store, "k"), Some("v".to_string()));
        assert_eq!(lookup(&store, "other"), None);
    }

    #[test]
    fn test_redis_store_invalid_url() {
        let result = RedisStore::new("not-a-valid-url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
