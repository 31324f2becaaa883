//! Account Cache Invalidator.
//!
//! An external access-key → account cache, authoritative for the data
//! plane's lookups. Injected as a capability rather than reached through a
//! process-wide singleton, so the store stays testable and so a missing
//! invalidation shows up as an assertion failure instead of a silent
//! correctness bug in production.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Invalidates any cached lookup for `access_key`.
    async fn invalidate(&self, access_key: &str) -> Result<()>;
}

/// Invalidator that does nothing, for callers with no cache in front of the
/// store (e.g. a single-process test harness).
pub struct NoopCacheInvalidator;

#[async_trait]
impl CacheInvalidator for NoopCacheInvalidator {
    async fn invalidate(&self, _access_key: &str) -> Result<()> {
        Ok(())
    }
}
