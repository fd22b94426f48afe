//! Redis JSON import.
//!
//! Each key holds a JSON document. The first document's layout picks one of
//! the [`JsonShape`] rules, which is then applied to every key:
//!
//! | First value | Table |
//! |-------------|-------|
//! | `[{"x": 1}, ...]` | one row per object, all keys flattened together |
//! | `[1, 2, ...]` | one column per key, named by the key |
//! | `{"x": [1, 2], ...}` | one column per field, keys stacked |
//! | `{"x": 1, ...}` | one row per key, labelled in a `_key` column |

mod importer;
mod shape;
mod store;

pub use importer::{RedisImporter, read_redis, read_redis_with_config};
pub use shape::{JsonEntry, JsonShape};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
