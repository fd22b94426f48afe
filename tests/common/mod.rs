//! Common utilities for integration tests.
//!
//! Helpers for building sample tables, reading back exported files, and
//! driving a local Redis through `redis-cli`.
//!
//! ## Environment Variables
//!
//! - `REDIS_URL`: Redis connection URL (default: `redis://localhost:6379`)
//! - `REDIS_PORT`: Redis port for CLI commands (default: `6379`)

#![allow(dead_code)]

use std::io::Read;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use flate2::read::GzDecoder;

/// A small table with an integer, a float and a string column.
///
/// The second row's name contains a comma and the third row's price is null.
pub fn sample_table() -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        ("id", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
        (
            "price",
            Arc::new(Float64Array::from(vec![Some(1.5), Some(20.25), None])) as ArrayRef,
        ),
        (
            "name",
            Arc::new(StringArray::from(vec!["apple", "a,b", "pear"])) as ArrayRef,
        ),
    ])
    .expect("valid sample table")
}

/// Read a file as UTF-8 text.
pub fn read_text(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Failed to read file")
}

/// Decompress a gzip file and return its text.
pub fn read_gzip_text(path: &Path) -> String {
    let file = std::fs::File::open(path).expect("Failed to open file");
    let mut text = String::new();
    GzDecoder::new(file)
        .read_to_string(&mut text)
        .expect("Failed to decompress file");
    text
}

/// Get the Redis URL from environment or default.
pub fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

/// Default Redis port for CLI commands.
/// Override with REDIS_PORT env var for CI.
pub fn redis_port() -> u16 {
    std::env::var("REDIS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(6379)
}

/// Check if Redis is available at the test URL.
pub fn redis_available() -> bool {
    let port = redis_port();
    let output = Command::new("redis-cli")
        .args(["-p", &port.to_string(), "PING"])
        .output();

    match output {
        Ok(o) => o.status.success() && String::from_utf8_lossy(&o.stdout).trim() == "PONG",
        Err(_) => false,
    }
}

/// Run a redis-cli command and return success status.
pub fn redis_cli(args: &[&str]) -> bool {
    let port_str = redis_port().to_string();
    let mut full_args = vec!["-p", &port_str];
    full_args.extend(args);

    Command::new("redis-cli")
        .args(&full_args)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Clean up all keys matching a pattern.
pub fn cleanup_keys(pattern: &str) {
    let port_str = redis_port().to_string();

    let output = Command::new("redis-cli")
        .args(["-p", &port_str, "KEYS", pattern])
        .output()
        .ok();

    if let Some(o) = output {
        let stdout = String::from_utf8_lossy(&o.stdout);
        for key in stdout.lines().filter(|s| !s.is_empty()) {
            let _ = Command::new("redis-cli")
                .args(["-p", &port_str, "DEL", key])
                .output();
        }
    }
}

/// Store JSON text under each key.
pub fn set_json(pairs: &[(&str, &str)]) {
    for (key, json) in pairs {
        redis_cli(&["SET", key, json]);
    }
}
