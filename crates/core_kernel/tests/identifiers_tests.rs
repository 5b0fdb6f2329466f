//! Unit tests for the Identifiers module
//!
//! Tests cover creation, name derivation, parsing, conversion, ordering and
//! serialization of the policy and term identifiers.

use core_kernel::{PolicyId, PolicyTermId};
use proptest::prelude::*;
use uuid::Uuid;

mod creation {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(PolicyId::new(), PolicyId::new());
        assert_ne!(PolicyTermId::new(), PolicyTermId::new());
    }

    #[test]
    fn test_from_name_is_stable() {
        let a = PolicyId::from_name("policy-OH-000001");
        let b = PolicyId::from_name("policy-OH-000001");
        assert_eq!(a, b);
        assert_eq!(a.as_uuid().get_version_num(), 5);
    }

    #[test]
    fn test_from_name_distinguishes_names() {
        assert_ne!(
            PolicyTermId::from_name("OH-000001-term-1"),
            PolicyTermId::from_name("OH-000001-term-2")
        );
    }

    #[test]
    fn test_same_name_same_uuid_across_types() {
        let policy = PolicyId::from_name("shared");
        let term = PolicyTermId::from_name("shared");
        assert_eq!(policy.as_uuid(), term.as_uuid());
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_display_uses_prefix() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
        assert_eq!(
            PolicyTermId::from_uuid(uuid).to_string(),
            "TRM-550e8400-e29b-41d4-a716-446655440001"
        );
        assert_eq!(PolicyId::prefix(), "POL");
    }

    #[test]
    fn test_parse_accepts_bare_and_prefixed_forms() {
        let bare: PolicyTermId = "550e8400-e29b-41d4-a716-446655440001".parse().unwrap();
        let prefixed: PolicyTermId = "TRM-550e8400-e29b-41d4-a716-446655440001".parse().unwrap();
        assert_eq!(bare, prefixed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<PolicyTermId>().is_err());
        assert!("POL-550e8400-e29b-41d4-a716-446655440001".parse::<PolicyTermId>().is_err());
        assert!("".parse::<PolicyId>().is_err());
    }
}

mod conversion {
    use super::*;

    #[test]
    fn test_uuid_round_trip() {
        let uuid = Uuid::new_v4();
        let id = PolicyId::from(uuid);
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
        let json = serde_json::to_string(&PolicyTermId::from_uuid(uuid)).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440001\"");
    }

    #[test]
    fn test_ordering_follows_uuid_bytes() {
        let low = PolicyTermId::from_uuid(Uuid::from_u128(1));
        let high = PolicyTermId::from_uuid(Uuid::from_u128(u128::MAX));
        assert!(low < high);
    }
}

proptest! {
    #[test]
    fn test_display_parse_round_trip(bits in any::<u128>()) {
        let id = PolicyTermId::from_uuid(Uuid::from_u128(bits));
        let parsed: PolicyTermId = id.to_string().parse().unwrap();
        prop_assert_eq!(id, parsed);
    }
}
