//! Audit timestamps
//!
//! Every persisted record carries `created_at` and `updated_at`. They are set
//! explicitly when a record is constructed and refreshed through
//! [`AuditStamp::touch`] on every mutation; nothing sets them implicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid audit stamp: updated_at {updated_at} is before created_at {created_at}")]
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

/// Creation and last-modification timestamps of a record
///
/// Invariant: `created_at <= updated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditStamp {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AuditStamp {
    /// Stamps a record created at `now`
    pub fn created(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Restores a stamp from stored values
    ///
    /// # Errors
    ///
    /// Returns `TemporalError::UpdatedBeforeCreated` if `updated_at < created_at`
    pub fn new(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Result<Self, TemporalError> {
        if updated_at < created_at {
            return Err(TemporalError::UpdatedBeforeCreated {
                created_at,
                updated_at,
            });
        }
        Ok(Self {
            created_at,
            updated_at,
        })
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records a mutation at `now`
    ///
    /// A clock that runs backwards never moves `updated_at` before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_created_sets_both_fields() {
        let stamp = AuditStamp::created(t0());
        assert_eq!(stamp.created_at(), t0());
        assert_eq!(stamp.updated_at(), t0());
    }

    #[test]
    fn test_new_rejects_updated_before_created() {
        let result = AuditStamp::new(t0(), t0() - Duration::seconds(1));
        assert!(matches!(result, Err(TemporalError::UpdatedBeforeCreated { .. })));
    }

    #[test]
    fn test_touch_refreshes_updated_at() {
        let mut stamp = AuditStamp::created(t0());
        stamp.touch(t0() + Duration::days(3));
        assert_eq!(stamp.created_at(), t0());
        assert_eq!(stamp.updated_at(), t0() + Duration::days(3));
    }

    #[test]
    fn test_touch_never_precedes_creation() {
        let mut stamp = AuditStamp::created(t0());
        stamp.touch(t0() - Duration::days(1));
        assert_eq!(stamp.updated_at(), t0());
    }
}
