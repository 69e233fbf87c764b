//! Manually advanced clock for deterministic tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use meshpod_core::PhysicalTimeEffects;
use std::sync::{Arc, Mutex};

/// A clock that only moves when the test says so.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock stopped at `start`.
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a clock stopped at an arbitrary fixed epoch.
    pub fn fixed() -> Self {
        Self::at(default_epoch())
    }

    #[allow(clippy::expect_used)]
    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        self.now.lock().expect("clock mutex poisoned")
    }

    /// Move the clock to an absolute time.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock() = now;
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.lock();
        *now += duration;
    }

    /// Current reading without going through the effect interface.
    pub fn current(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::fixed()
    }
}

/// The fixed epoch used by [`ManualClock::fixed`]: 2024-01-01T00:00:00Z.
#[allow(clippy::expect_used)]
pub fn default_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixed epoch")
}

#[async_trait]
impl PhysicalTimeEffects for ManualClock {
    async fn now(&self) -> DateTime<Utc> {
        self.current()
    }
}
