//! Lock records and store options shared by the backends.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a conditional lock insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockInsert {
    /// No live marker existed; the marker is now present.
    Applied,
    /// A live marker already existed; nothing was written.
    Rejected,
    /// The backend accepted the write but could not report whether it applied.
    ///
    /// Neither bundled store returns this. It exists for backends whose
    /// conditional write can come back without a confirming row.
    Unconfirmed,
}

/// Value stored in the lock table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// When the lock was taken.
    pub acquired_at: DateTime<Utc>,
}

impl LockRecord {
    /// A record for a lock taken now.
    #[must_use]
    pub fn now() -> Self {
        Self {
            acquired_at: Utc::now(),
        }
    }

    /// Whether the record has outlived `ttl` at time `now`.
    ///
    /// Without a TTL a record never expires.
    #[must_use]
    pub fn is_expired(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        let Some(ttl) = ttl else {
            return false;
        };
        now.signed_duration_since(self.acquired_at)
            .to_std()
            .is_ok_and(|age| age >= ttl)
    }
}

/// Backend options.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Lock markers older than this are treated as absent.
    pub lock_ttl: Option<Duration>,
}
