//! Version domain entities.

pub mod dependency;
pub mod model;
pub mod stability;

pub use dependency::{NewDependency, VersionDependency};
pub use model::{NewVersion, Version};
pub use stability::Stability;
