//! chain-hashmap: a fixed-capacity string map with separately chained
//! buckets and djb2 hashing.
//!
//! Internal Design:
//!
//! Summary
//! - `ChainMap<S>` maps owned `String` keys to owned `String` values.
//! - The table is a fixed sequence of buckets chosen at construction;
//!   there is no resize or rehash. Each bucket names the head of a singly
//!   linked chain of entries.
//! - Every operation hashes the key, reduces it modulo the capacity to
//!   pick a bucket, then scans that bucket's chain comparing keys.
//!
//! Storage
//! - Entries live in a generational arena (`slotmap::SlotMap`) and link
//!   to their successor by arena key. Buckets hold the key of the chain
//!   head. No entry is reachable from more than one chain.
//! - New keys are appended at the chain tail. Chain order carries no
//!   meaning for callers beyond the diagnostic dump.
//! - `len` is kept incrementally and always equals the number of entries
//!   reachable from the buckets.
//!
//! Entry lifecycle
//! - A new key first gets an unpopulated entry linked into its chain,
//!   which is then populated with copies of the key and value. If either
//!   copy cannot be allocated, the entry is unlinked and dropped again
//!   before `put` returns, so chains never hold unpopulated entries
//!   between calls.
//! - Replacing a value keeps the entry and its key; the old value buffer
//!   is reused when large enough.
//! - `locate_entry` and `entry_for_key` stay crate-private: the latter
//!   hands out unpopulated entries, which callers must never observe.
//!
//! Hashing
//! - The default hasher is djb2 (seed 5381, `h * 33 + c`, wrapping `u64`).
//!   Keys are hashed by writing their raw bytes to a fresh hasher, so any
//!   `BuildHasher` can be swapped in with `ChainMap::with_hasher`.
//!
//! Errors
//! - Allocation failure (bucket table, entry arena, key/value buffers) is
//!   reported as `MapError::Alloc` and leaves the map usable and unchanged.
//!   A zero capacity is rejected up front.
//! - Missing keys are not errors: `get`/`contains`/`remove` answer with
//!   `Option`/`bool`.
//!
//! Notes and non-goals
//! - Single-threaded: there is no internal locking; mutation needs
//!   `&mut self`, and values returned by `get` borrow the map.
//! - No resizing, eviction, persistence, or ordered iteration.

mod chain_map;
mod dump;
mod entry;
mod error;
pub mod hash;

#[cfg(test)]
mod chain_map_proptest;

// Public surface
pub use chain_map::{Buckets, Chain, ChainMap};
pub use dump::Dump;
pub use error::MapError;
pub use hash::{djb2, Djb2Hasher, Djb2State};
