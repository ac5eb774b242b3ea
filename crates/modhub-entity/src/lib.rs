//! # modhub-entity
//!
//! Entity models for the ModHub version catalog. Every struct in this crate
//! represents a database table row or a draft used to create one. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! database rows additionally derive `sqlx::FromRow`.

pub mod version;

pub use version::{NewDependency, NewVersion, Stability, Version, VersionDependency};
