//! Custom Axum extractors.

pub mod context;
pub mod filter;

pub use context::CatalogContext;
pub use filter::{FilterParams, IdsParams};
