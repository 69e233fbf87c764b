//! Time effect handler - production only
//!
//! Stateless implementation of `PhysicalTimeEffects` delegating to the
//! system clock. Deterministic clocks belong in `meshpod-testkit`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meshpod_core::PhysicalTimeEffects;

/// Real time handler for production use.
#[derive(Debug, Clone, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    async fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
