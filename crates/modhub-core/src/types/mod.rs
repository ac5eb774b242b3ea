//! Core type definitions used across the ModHub workspace.

pub mod filter;
pub mod id;
pub mod sorting;

pub use filter::{ResolvedFilter, VersionFilter, VersionOrderField};
pub use id::generate_id;
pub use sorting::SortDirection;
