//! # modhub-service
//!
//! Version catalog services for ModHub. Each service orchestrates the
//! version store, the read-through query cache, the download limiter and
//! the link provider to implement catalog use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod error;
pub mod version;

pub use context::RequestContext;
pub use error::{CatalogError, CatalogResult};
pub use version::{CatalogService, CreationThrottle, DownloadService};
