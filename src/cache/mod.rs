// Cache module.
// Stores canonical CKAN results keyed by URL fingerprint, in memory or on disk.

pub mod file;
pub mod key;
pub mod memory;
pub mod paths;
pub mod store;

pub use file::FileCache;
pub use key::fingerprint;
pub use memory::MemoryCache;
pub use store::{CacheEntry, CacheStore, FAILURE_TTL, SUCCESS_TTL, TtlPolicy};
