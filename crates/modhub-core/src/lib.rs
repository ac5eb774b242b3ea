//! # modhub-core
//!
//! Core crate for ModHub. Contains collaborator traits, configuration
//! schemas, the version query filter and its cache hash, identifier
//! generation, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ModHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
