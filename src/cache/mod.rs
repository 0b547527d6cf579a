//! Cache module for storing API responses
//!
//! This module provides a two-layer cache: an in-memory map in front of a
//! durable key-value store. Entries are stamped when written and treated as
//! absent once older than the configured TTL.

mod manager;
mod store;

pub use manager::{CacheEntry, CacheManager, Clock, SystemClock};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
