//! # modhub-database
//!
//! PostgreSQL connection management, migrations, and the version store.
//! The [`store::VersionStore`] trait is the seam the catalog service depends
//! on; [`repositories::VersionRepository`] implements it with sqlx, and the
//! `memory` feature adds an in-process implementation for tests.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
#[cfg(feature = "memory")]
pub use memory::MemoryVersionStore;
pub use repositories::VersionRepository;
pub use store::{VersionQuery, VersionStore};
