//! Core traits defined in `modhub-core` and implemented by other crates.

pub mod cache;
pub mod limiter;
pub mod storage;

pub use cache::CacheProvider;
pub use limiter::DownloadLimiter;
pub use storage::LinkProvider;
