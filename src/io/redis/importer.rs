//! Redis JSON import.

use arrow::array::RecordBatch;
use tracing::debug;

use super::shape::{JsonEntry, JsonShape, KeyColumn, reshape};
use super::store::{KeyValueStore, RedisStore};
use crate::connection::ConnectionConfig;
use crate::error::{Error, Result};

/// Reads JSON values from a key-value store and arranges them into a table.
///
/// The layout of the first key's value decides how every value is read;
/// see [`JsonShape`].
///
/// # Example
/// ```ignore
/// use frame_io::{MemoryStore, RedisImporter};
///
/// let store: MemoryStore = vec![("a", r#"{"x": 1}"#), ("b", r#"{"x": 2}"#)]
///     .into_iter()
///     .collect();
/// let batch = RedisImporter::new(store).with_keys(["a", "b"]).load()?;
/// assert_eq!(batch.num_rows(), 2);
/// ```
pub struct RedisImporter<S> {
    store: S,
    keys: Vec<String>,
    pattern: String,
    include_key: bool,
    key_column_name: String,
}

impl<S: KeyValueStore> RedisImporter<S> {
    /// Create an importer over `store` that reads every key it holds.
    pub fn new(store: S) -> Self {
        Self {
            store,
            keys: Vec::new(),
            pattern: "*".to_string(),
            include_key: true,
            key_column_name: "_key".to_string(),
        }
    }

    /// Read these keys, in this order. An empty list reads every key.
    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Pattern used to list keys when none are given explicitly.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Set whether one-record-per-key tables get a key column.
    pub fn with_key(mut self, include: bool) -> Self {
        self.include_key = include;
        self
    }

    /// Set the name of the key column.
    pub fn with_key_column_name(mut self, name: impl Into<String>) -> Self {
        self.key_column_name = name.into();
        self
    }

    /// The keys that [`load`](Self::load) will read.
    pub fn resolve_keys(&self) -> Result<Vec<String>> {
        if self.keys.is_empty() {
            self.store.keys(&self.pattern)
        } else {
            Ok(self.keys.clone())
        }
    }

    /// GET and decode each key, one request per key, in order.
    pub fn fetch(&self, keys: &[String]) -> Result<Vec<JsonEntry>> {
        keys.iter()
            .map(|key| {
                let raw = self
                    .store
                    .get(key)?
                    .ok_or_else(|| Error::KeyNotFound(key.clone()))?;
                let value = serde_json::from_str(&raw).map_err(|source| Error::JsonDecode {
                    key: key.clone(),
                    source,
                })?;
                Ok(JsonEntry::new(key.clone(), value))
            })
            .collect()
    }

    /// Read the keys and build the table.
    pub fn load(&self) -> Result<RecordBatch> {
        let keys = self.resolve_keys()?;
        if keys.is_empty() {
            return Err(Error::NoData);
        }

        let entries = self.fetch(&keys)?;
        let shape = JsonShape::classify(&entries[0].value)?;

        debug!(keys = keys.len(), %shape, "importing redis json");

        let key_column = KeyColumn {
            include: self.include_key,
            name: &self.key_column_name,
        };
        reshape(shape, &entries, &key_column)
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}

/// Import `keys` from the Redis server at `url`. Empty `keys` reads every key.
pub fn read_redis(url: &str, keys: &[String]) -> Result<RecordBatch> {
    let store = RedisStore::new(url)?;
    RedisImporter::new(store).with_keys(keys.iter().cloned()).load()
}

/// Import `keys` from the Redis server described by `config`.
pub fn read_redis_with_config(config: &ConnectionConfig, keys: &[String]) -> Result<RecordBatch> {
    let store = RedisStore::from_config(config)?;
    RedisImporter::new(store).with_keys(keys.iter().cloned()).load()
}
