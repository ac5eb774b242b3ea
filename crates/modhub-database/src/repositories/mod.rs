//! Repository implementations backed by PostgreSQL.

pub mod version;

pub use version::VersionRepository;
