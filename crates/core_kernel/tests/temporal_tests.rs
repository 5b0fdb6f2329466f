//! Unit tests for the Temporal module
//!
//! Tests cover construction, validation and update of audit stamps.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{AuditStamp, TemporalError};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

mod construction {
    use super::*;

    #[test]
    fn test_created_sets_both_timestamps() {
        let stamp = AuditStamp::created(t0());
        assert_eq!(stamp.created_at(), t0());
        assert_eq!(stamp.updated_at(), t0());
    }

    #[test]
    fn test_new_accepts_equal_and_later_updates() {
        assert!(AuditStamp::new(t0(), t0()).is_ok());
        let stamp = AuditStamp::new(t0(), t0() + Duration::days(3)).unwrap();
        assert_eq!(stamp.updated_at(), t0() + Duration::days(3));
    }

    #[test]
    fn test_new_rejects_update_before_creation() {
        let err = AuditStamp::new(t0(), t0() - Duration::seconds(1)).unwrap_err();
        assert!(matches!(err, TemporalError::UpdatedBeforeCreated { .. }));
        assert!(err.to_string().contains("before created_at"));
    }
}

mod touch {
    use super::*;

    #[test]
    fn test_touch_moves_updated_at() {
        let mut stamp = AuditStamp::created(t0());
        stamp.touch(t0() + Duration::hours(5));
        assert_eq!(stamp.created_at(), t0());
        assert_eq!(stamp.updated_at(), t0() + Duration::hours(5));
    }

    #[test]
    fn test_touch_never_precedes_creation() {
        let mut stamp = AuditStamp::created(t0());
        stamp.touch(t0() - Duration::days(1));
        assert_eq!(stamp.updated_at(), t0());
    }
}
