//! # modhub-cache
//!
//! Caching for ModHub. Two independent concerns live here:
//!
//! - **query cache**: the process-local read-through cache for catalog reads,
//!   built on [moka](https://crates.io/crates/moka) with a per-entry TTL
//! - **limiter store**: a shared key-value backend with atomic set-if-absent,
//!   either in-memory (moka) or [redis](https://crates.io/crates/redis),
//!   selected at runtime from configuration; the download limiter is built
//!   on top of it

pub mod expiry;
pub mod keys;
pub mod limiter;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
pub mod query;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use limiter::CacheDownloadLimiter;
pub use provider::CacheManager;
pub use query::{CachedValue, Cacheable, QueryCache};
