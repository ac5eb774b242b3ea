//! HTTP request handlers.

pub mod health;
pub mod mods;
pub mod versions;
