//! Deterministic seed data
//!
//! Generates a self-consistent set of policies and terms for local
//! development. The pseudo-random source is seeded with a fixed value, so
//! every run produces exactly the same dataset on every platform.
//!
//! Layout of the generated data:
//!
//! ```text
//! OH-000001 ── term 1: [start,            start + 1y - 1d]
//!           ├─ term 2: [start + 1y,       start + 2y - 1d]
//!           └─ term 3: [start + 2y,       start + 3y - 1d]
//! OH-000002 ── term 1: ...
//! ```
//!
//! Term 1 starts within the 24 months before the anchor date. The generator
//! only builds values; writing them is the job of
//! [`PolicyTermPort::replace_dataset`](crate::ports::PolicyTermPort::replace_dataset).

use chrono::{DateTime, Days, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use core_kernel::{AuditStamp, PolicyId, PolicyTermId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::PolicyError;
use crate::term::{Policy, PolicyTerm, TermStatus};

/// Seed of the pseudo-random source
pub const SEED: u64 = 49_201;

/// Jurisdiction codes terms are drawn from
pub const STATES: [&str; 10] = ["CA", "TX", "NY", "FL", "IL", "WA", "OR", "AZ", "CO", "GA"];

const FIRST_NAMES: [&str; 15] = [
    "Ava", "Ethan", "Maya", "Liam", "Noah", "Sophia", "Isabella", "Lucas", "Mason",
    "Amelia", "Harper", "Elijah", "Logan", "Charlotte", "James",
];

const LAST_NAMES: [&str; 15] = [
    "Garcia", "Patel", "Nguyen", "Kim", "Johnson", "Chen", "Martinez", "Walker",
    "Brown", "Davis", "Thompson", "Lopez", "Rivera", "Allen", "Parker",
];

const ORG_SUFFIXES: [&str; 10] = [
    "Holdings", "Group", "Partners", "Logistics", "Manufacturing", "Foods", "Energy",
    "Consulting", "Retail", "Industries",
];

const MIN_POLICIES: usize = 400;
const MAX_POLICIES: usize = 500;
const MAX_TERMS_PER_POLICY: u32 = 3;

/// Formats the policy number for a one-based sequence position
pub fn policy_number(sequence: usize) -> String {
    format!("OH-{:06}", sequence)
}

/// Generated policies and their terms, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub policies: Vec<Policy>,
    pub terms: Vec<PolicyTerm>,
}

impl SeedData {
    /// Terms belonging to `policy_id`, in term-number order
    pub fn terms_of(&self, policy_id: PolicyId) -> impl Iterator<Item = &PolicyTerm> {
        self.terms.iter().filter(move |t| t.policy_id == policy_id)
    }
}

/// Builds the development dataset
#[derive(Debug, Clone)]
pub struct SeedGenerator {
    seed: u64,
    anchor: NaiveDate,
}

impl Default for SeedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedGenerator {
    /// Generator with the fixed seed and the 2024-01-01 anchor
    pub fn new() -> Self {
        Self {
            seed: SEED,
            anchor: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }

    /// Overrides the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the anchor date all generated dates are relative to
    pub fn with_anchor(mut self, anchor: NaiveDate) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Generates the dataset
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Seed` if date arithmetic leaves the supported
    /// calendar range, which only happens for extreme anchors
    pub fn generate(&self) -> Result<SeedData, PolicyError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let policy_count = rng.gen_range(MIN_POLICIES..=MAX_POLICIES);

        let mut data = SeedData {
            policies: Vec::with_capacity(policy_count),
            terms: Vec::with_capacity(policy_count * 2),
        };

        for sequence in 1..=policy_count {
            let number = policy_number(sequence);
            let insured_name = insured_name(&mut rng);
            let audit = self.audit_stamp(&mut rng)?;
            let policy = Policy::new(
                PolicyId::from_name(&format!("policy-{number}")),
                number.clone(),
                insured_name,
                audit,
            )?;

            let term_count = rng.gen_range(1..=MAX_TERMS_PER_POLICY);
            let first_start = self
                .anchor
                .checked_sub_months(Months::new(rng.gen_range(0..24)))
                .ok_or_else(|| PolicyError::seed("term start before calendar range"))?;

            for term_number in 1..=term_count {
                let term = build_term(&mut rng, &policy, &number, term_number, first_start)?;
                data.terms.push(term);
            }
            data.policies.push(policy);
        }

        debug!(
            policies = data.policies.len(),
            terms = data.terms.len(),
            seed = self.seed,
            "Generated seed data"
        );
        Ok(data)
    }

    /// Created within the last year before the anchor, updated up to 29 days later
    fn audit_stamp(&self, rng: &mut ChaCha8Rng) -> Result<AuditStamp, PolicyError> {
        let created_day = self
            .anchor
            .checked_sub_days(Days::new(rng.gen_range(0..365)))
            .ok_or_else(|| PolicyError::seed("creation date before calendar range"))?;
        let created_at: DateTime<Utc> = Utc.from_utc_datetime(&created_day.and_time(NaiveTime::MIN));
        let updated_at = created_at + Duration::days(rng.gen_range(0..30));
        Ok(AuditStamp::new(created_at, updated_at)?)
    }
}

fn insured_name(rng: &mut ChaCha8Rng) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    if rng.gen_bool(0.5) {
        let suffix = ORG_SUFFIXES[rng.gen_range(0..ORG_SUFFIXES.len())];
        format!("{first} {last} {suffix}")
    } else {
        format!("{first} {last}")
    }
}

/// Uniform in [50, 1500), rounded half-up to cents
fn balance_due(rng: &mut ChaCha8Rng) -> Result<Decimal, PolicyError> {
    let raw = 50.0 + rng.gen::<f64>() * 1450.0;
    Decimal::from_f64(raw)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| PolicyError::seed(format!("balance {raw} is not representable")))
}

fn build_term(
    rng: &mut ChaCha8Rng,
    policy: &Policy,
    number: &str,
    term_number: u32,
    first_start: NaiveDate,
) -> Result<PolicyTerm, PolicyError> {
    let out_of_range = || PolicyError::seed(format!("{number} term {term_number} leaves calendar range"));

    let effective_from = first_start
        .checked_add_months(Months::new(12 * (term_number - 1)))
        .ok_or_else(out_of_range)?;
    let effective_to = effective_from
        .checked_add_months(Months::new(12))
        .and_then(|d| d.pred_opt())
        .ok_or_else(out_of_range)?;
    let next_due = effective_from
        .checked_add_months(Months::new(rng.gen_range(1..=3)))
        .ok_or_else(out_of_range)?;
    let last_payment = next_due
        .checked_sub_days(Days::new(rng.gen_range(5..=24)))
        .ok_or_else(out_of_range)?;

    let status = TermStatus::ALL[rng.gen_range(0..TermStatus::ALL.len())];
    let balance = balance_due(rng)?;
    let state = STATES[rng.gen_range(0..STATES.len())];

    PolicyTerm::builder(policy.id, term_number as i32)
        .id(PolicyTermId::from_name(&format!("{number}-term-{term_number}")))
        .state(state)
        .status(status.as_str())
        .effective(effective_from, effective_to)
        .balance_due(balance)
        .next_due_date(Some(next_due))
        .last_payment_date(Some(last_payment))
        .audit(policy.audit)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_number_is_zero_padded() {
        assert_eq!(policy_number(1), "OH-000001");
        assert_eq!(policy_number(123), "OH-000123");
    }

    #[test]
    fn test_balance_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1_000 {
            let balance = balance_due(&mut rng).unwrap();
            assert!(balance >= Decimal::from(50));
            assert!(balance <= Decimal::from(1500));
            assert!(balance.scale() <= 2);
        }
    }

    #[test]
    fn test_insured_name_has_two_or_three_words() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let name = insured_name(&mut rng);
            let words = name.split(' ').count();
            assert!(words == 2 || words == 3, "unexpected name {name}");
        }
    }
}
