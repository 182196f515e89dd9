//! stretchy-map: growable arrays and an open-addressing string-keyed map
//! built on them.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small set of containers that grow geometrically, report
//!   allocation failure explicitly, and keep element indices stable.
//! - Layers:
//!   - GrowableArray<T>: contiguous buffer with a configurable growth
//!     policy (`max(min_capacity, max(floor(factor * cap), required))`),
//!     plus formatted-append helpers for byte arrays.
//!   - SlotStore<T>: GrowableArray of optional slots with a LIFO
//!     reclamation list, so removals leave holes that later inserts fill.
//!   - BucketTable (crate-private): linear-probing table of
//!     `{data_index, key_index, list_index, hash}` entries with tombstones.
//!   - StrHashMap<V, S>: public map from owned `str` keys to values, made
//!     of one BucketTable and three SlotStores (values, keys, and the
//!     bucket-index list used for enumeration).
//!
//! Constraints
//! - Single-threaded; no interior mutability.
//! - Every allocating operation has a `try_*` form returning
//!   [`Error`]. The plain form treats allocation failure as fatal: it logs
//!   the error and panics.
//! - Duplicate inserts fail and leave the map unchanged.
//! - A value's `data_index` is stable until that entry is deleted; deletes
//!   and growth never move values.
//! - Load bound: after every insert `load_ratio * len < capacity`.
//!
//! Hashing
//! - Keys are hashed once with a [`KeyHasher`] (32-bit MurmurHash2, seed
//!   5381, by default). The hash is stored in the bucket and growth
//!   relocates entries by it.
//! - Buckets match when the stored hash matches and the key bytes are
//!   equal. [`KeyMatch::HashOnly`] skips the byte comparison and treats
//!   equal hashes as equal keys.
//!
//! Notes and non-goals
//! - No shrinking; `clear` keeps allocations, `free` releases them.
//! - Tombstones are only reclaimed by inserts landing on them or by growth.
//! - MurmurHash2 is not randomized; do not feed it adversarial keys.
//! - `keys()` follows the bucket-index list. Deleted positions are reused
//!   by later inserts, so the order is insertion order only until the
//!   first delete.

pub mod config;
pub mod error;
pub mod growable_array;
pub mod hash;
pub mod slot_store;
pub mod str_hash_map;

mod bucket_table;
mod str_hash_map_proptest;

// Public surface
pub use config::{ArrayConfig, KeyMatch, MapConfig};
pub use error::{Error, InsertError, Result};
pub use growable_array::GrowableArray;
pub use hash::{murmur2, KeyHasher, Murmur2};
pub use slot_store::SlotStore;
pub use str_hash_map::{Iter, Keys, StrHashMap};
