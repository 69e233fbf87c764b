//! Physical time effect interface
//!
//! Wall-clock time behind a trait so expiration sweeps and watermark counts
//! are deterministic under test.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Wall-clock time source.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current wall-clock time.
    async fn now(&self) -> DateTime<Utc>;
}
