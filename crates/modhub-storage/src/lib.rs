//! # modhub-storage
//!
//! Download link providers for ModHub. Objects are uploaded out of band;
//! this crate only turns an object key into a time-limited URL. Supports a
//! local base-URL provider and S3-compatible presigned URLs.

pub mod manager;
pub mod providers;

pub use manager::LinkManager;
