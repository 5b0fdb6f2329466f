//! Tests for the deterministic seed generator

use chrono::{Datelike, Duration, Months, NaiveDate};
use core_kernel::{PolicyId, PolicyTermId};
use domain_policy::seed::{policy_number, STATES};
use domain_policy::{SeedData, SeedGenerator, TermStatus};
use std::collections::{HashMap, HashSet};

fn seeded() -> SeedData {
    SeedGenerator::new().generate().expect("seed generation failed")
}

mod determinism {
    use super::*;

    #[test]
    fn test_two_runs_produce_identical_data() {
        assert_eq!(seeded(), seeded());
    }

    #[test]
    fn test_insured_names_and_term_counts_are_stable() {
        let names = |data: &SeedData| -> HashMap<String, (String, usize)> {
            data.policies
                .iter()
                .map(|p| {
                    (
                        p.policy_number.clone(),
                        (p.insured_name.clone(), data.terms_of(p.id).count()),
                    )
                })
                .collect()
        };
        assert_eq!(names(&seeded()), names(&seeded()));
    }

    #[test]
    fn test_other_seed_produces_other_data() {
        let other = SeedGenerator::new().with_seed(7).generate().unwrap();
        assert_ne!(seeded(), other);
    }
}

mod policies {
    use super::*;

    #[test]
    fn test_policy_count_in_range() {
        let data = seeded();
        assert!((400..=500).contains(&data.policies.len()));
    }

    #[test]
    fn test_first_policy() {
        let data = seeded();
        let first = &data.policies[0];
        assert_eq!(first.policy_number, "OH-000001");
        assert!((1..=3).contains(&data.terms_of(first.id).count()));
    }

    #[test]
    fn test_policy_numbers_are_sequential() {
        let data = seeded();
        for (index, policy) in data.policies.iter().enumerate() {
            assert_eq!(policy.policy_number, policy_number(index + 1));
        }
    }

    #[test]
    fn test_policy_ids_derive_from_policy_number() {
        let data = seeded();
        for policy in &data.policies {
            assert_eq!(
                policy.id,
                PolicyId::from_name(&format!("policy-{}", policy.policy_number))
            );
        }
        let unique: HashSet<_> = data.policies.iter().map(|p| p.id).collect();
        assert_eq!(unique.len(), data.policies.len());
    }

    #[test]
    fn test_insured_names_mix_people_and_companies() {
        let data = seeded();
        let words: HashSet<usize> = data
            .policies
            .iter()
            .map(|p| p.insured_name.split(' ').count())
            .collect();
        assert_eq!(words, HashSet::from([2, 3]));
    }

    #[test]
    fn test_audit_window() {
        let generator = SeedGenerator::new();
        let anchor = generator.anchor();
        let data = generator.generate().unwrap();
        for policy in &data.policies {
            let created = policy.created_at().date_naive();
            assert!(created <= anchor);
            assert!(created > anchor - Duration::days(365));
            assert!(policy.created_at() <= policy.updated_at());
            assert!(policy.updated_at() - policy.created_at() <= Duration::days(29));
        }
    }
}

mod terms {
    use super::*;

    #[test]
    fn test_term_numbers_are_contiguous_from_one() {
        let data = seeded();
        for policy in &data.policies {
            let numbers: Vec<i32> = data.terms_of(policy.id).map(|t| t.term_number).collect();
            let expected: Vec<i32> = (1..=numbers.len() as i32).collect();
            assert_eq!(numbers, expected, "{}", policy.policy_number);
        }
    }

    #[test]
    fn test_effective_to_is_one_year_minus_one_day() {
        for term in &seeded().terms {
            let expected = term
                .effective_from_date
                .checked_add_months(Months::new(12))
                .unwrap()
                .pred_opt()
                .unwrap();
            assert_eq!(term.effective_to_date, expected);
        }
    }

    #[test]
    fn test_renewals_advance_by_whole_years() {
        let data = seeded();
        for policy in &data.policies {
            let starts: Vec<NaiveDate> =
                data.terms_of(policy.id).map(|t| t.effective_from_date).collect();
            let first = starts[0];
            assert_eq!(first.day(), 1);
            for (offset, start) in starts.iter().enumerate() {
                assert_eq!(
                    *start,
                    first.checked_add_months(Months::new(12 * offset as u32)).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_first_term_starts_within_two_years_before_anchor() {
        let generator = SeedGenerator::new();
        let anchor = generator.anchor();
        let data = generator.generate().unwrap();
        for term in data.terms.iter().filter(|t| t.term_number == 1) {
            assert!(term.effective_from_date <= anchor);
            assert!(term.effective_from_date > anchor.checked_sub_months(Months::new(24)).unwrap());
        }
    }

    #[test]
    fn test_payment_dates() {
        for term in &seeded().terms {
            let next = term.next_due_date.unwrap();
            let last = term.last_payment_date.unwrap();
            assert!(last < next);
            let gap = (next - last).num_days();
            assert!((5..=24).contains(&gap), "gap {gap}");

            let after_start = (1..=3).any(|m| {
                term.effective_from_date.checked_add_months(Months::new(m)) == Some(next)
            });
            assert!(after_start, "next due {next} for start {}", term.effective_from_date);
        }
    }

    #[test]
    fn test_states_and_statuses_come_from_fixed_sets() {
        let statuses: HashSet<&str> = TermStatus::ALL.iter().map(|s| s.as_str()).collect();
        for term in &seeded().terms {
            assert!(STATES.contains(&term.state.as_str()));
            assert!(statuses.contains(term.status.as_str()));
        }
    }

    #[test]
    fn test_balances_are_in_range_with_two_decimals() {
        for term in &seeded().terms {
            assert!(term.balance_due >= rust_decimal::Decimal::from(50));
            assert!(term.balance_due <= rust_decimal::Decimal::from(1500));
            assert_eq!(term.balance_due.scale(), 2);
        }
    }

    #[test]
    fn test_terms_share_policy_timestamps() {
        let data = seeded();
        let by_id: HashMap<_, _> = data.policies.iter().map(|p| (p.id, p)).collect();
        for term in &data.terms {
            assert_eq!(term.audit, by_id[&term.policy_id].audit);
        }
    }

    #[test]
    fn test_term_ids_derive_from_policy_number_and_term_number() {
        let data = seeded();
        let by_id: HashMap<_, _> = data.policies.iter().map(|p| (p.id, p)).collect();
        for term in &data.terms {
            let number = &by_id[&term.policy_id].policy_number;
            assert_eq!(
                term.id,
                PolicyTermId::from_name(&format!("{number}-term-{}", term.term_number))
            );
        }
    }
}
