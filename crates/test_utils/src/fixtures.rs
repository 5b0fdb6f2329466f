//! Test Fixtures
//!
//! Pre-built values shared across the test suites. Everything here is
//! deterministic so assertions can name exact ids and orders.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{AuditStamp, PolicyTermId};
use domain_policy::{SeedData, TermWithPolicy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::builders::{joined_rows, term_id_for, TestDatasetBuilder};

/// Fixture for dates and timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Default start date of a built term
    pub fn term_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    /// Timestamp records are created at
    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 12, 1, 9, 30, 0).unwrap()
    }

    /// Timestamp records were last touched at
    pub fn updated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 15, 16, 45, 0).unwrap()
    }

    pub fn audit() -> AuditStamp {
        AuditStamp::new(Self::created_at(), Self::updated_at()).unwrap()
    }

    /// Anchor date handed to the seed generator in tests
    pub fn seed_anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }
}

/// Fixture for the small known dataset
///
/// | policy    | insured            | term | state | status      | effective               |
/// |-----------|--------------------|------|-------|-------------|-------------------------|
/// | OH-000001 | Ava Garcia         | 1    | CA    | EXPIRED     | 2022-03-01 .. 2023-02-28 |
/// | OH-000001 | Ava Garcia         | 2    | CA    | ACTIVE      | 2023-03-01 .. 2024-02-29 |
/// | OH-000002 | Liam Chen Holdings | 1    | TX    | ACTIVE      | 2023-07-01 .. 2024-06-30 |
/// | OH-000003 | Maya Patel         | 1    | NY    | CANCELLED   | 2023-01-15 .. 2024-01-14 |
/// | OH-000004 | Noah Kim Foods     | 1    | NY    | NON_RENEWED | 2022-10-01 .. 2023-09-30 |
/// | OH-000004 | Noah Kim Foods     | 2    | FL    | ACTIVE      | 2023-10-01 .. 2024-09-30 |
pub struct DatasetFixtures;

impl DatasetFixtures {
    pub const POLICY_COUNT: usize = 4;
    pub const TERM_COUNT: usize = 6;

    pub fn small() -> SeedData {
        Self::builder().build()
    }

    pub fn small_joined() -> Vec<TermWithPolicy> {
        joined_rows(&Self::small())
    }

    /// Id of the active term of OH-000001
    pub fn ava_current_term() -> PolicyTermId {
        term_id_for("OH-000001", 2)
    }

    /// Id that no fixture term uses
    pub fn unknown_term() -> PolicyTermId {
        PolicyTermId::from_name("no-such-term")
    }

    fn builder() -> TestDatasetBuilder {
        TestDatasetBuilder::new()
            .policy("OH-000001", "Ava Garcia")
            .term_with(|t| {
                t.state("CA")
                    .status("EXPIRED")
                    .starting(date(2022, 3, 1))
                    .balance_due(Decimal::ZERO)
                    .paid_days_before_due(7)
            })
            .term("CA", "ACTIVE", date(2023, 3, 1))
            .policy("OH-000002", "Liam Chen Holdings")
            .term_with(|t| {
                t.state("TX")
                    .status("ACTIVE")
                    .starting(date(2023, 7, 1))
                    .balance_due(dec!(1250.75))
            })
            .policy("OH-000003", "Maya Patel")
            .term("NY", "CANCELLED", date(2023, 1, 15))
            .policy("OH-000004", "Noah Kim Foods")
            .term_with(|t| {
                t.state("NY")
                    .status("NON_RENEWED")
                    .starting(date(2022, 10, 1))
                    .balance_due(dec!(89.10))
            })
            .term("FL", "ACTIVE", date(2023, 10, 1))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
