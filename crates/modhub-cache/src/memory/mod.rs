//! In-memory limiter store.

pub mod store;

pub use store::MemoryCacheProvider;
