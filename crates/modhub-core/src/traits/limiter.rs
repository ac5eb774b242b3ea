//! Short-window admission limiter.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Admits an `(identity, scope)` pair at most once per window.
///
/// Implementations must be atomic: two concurrent calls for the same pair
/// inside one window yield exactly one `true`.
#[async_trait]
pub trait DownloadLimiter: Send + Sync + std::fmt::Debug + 'static {
    /// Try to admit the pair. Returns `true` the first time within `window`.
    async fn try_admit(&self, identity: &str, scope: &str, window: Duration) -> AppResult<bool>;
}
