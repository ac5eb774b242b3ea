//! Version catalog services.

pub mod catalog;
pub mod download;
pub mod throttle;

pub use catalog::CatalogService;
pub use download::DownloadService;
pub use throttle::CreationThrottle;
