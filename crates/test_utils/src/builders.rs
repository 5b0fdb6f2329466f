//! Test Data Builders
//!
//! Builders with sensible defaults for policies, terms and whole datasets.
//! Identifiers are derived from policy numbers, so the same builder calls
//! always produce the same ids.

use chrono::{Days, Months, NaiveDate};
use core_kernel::{AuditStamp, PolicyId, PolicyTermId};
use domain_policy::{Policy, PolicyTerm, SeedData, TermWithPolicy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::TemporalFixtures;

/// Id used for a policy number
pub fn policy_id_for(policy_number: &str) -> PolicyId {
    PolicyId::from_name(&format!("policy-{policy_number}"))
}

/// Id used for a policy's n-th term
pub fn term_id_for(policy_number: &str, term_number: i32) -> PolicyTermId {
    PolicyTermId::from_name(&format!("{policy_number}-term-{term_number}"))
}

/// Last day of a twelve month term starting on `from`
pub fn twelve_month_end(from: NaiveDate) -> NaiveDate {
    from.checked_add_months(Months::new(12))
        .and_then(|d| d.pred_opt())
        .expect("term end out of range")
}

/// Builder for test policies
#[derive(Debug, Clone)]
pub struct TestPolicyBuilder {
    policy_number: String,
    insured_name: String,
    audit: AuditStamp,
}

impl Default for TestPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPolicyBuilder {
    pub fn new() -> Self {
        Self {
            policy_number: "OH-000001".to_string(),
            insured_name: "Ava Garcia".to_string(),
            audit: TemporalFixtures::audit(),
        }
    }

    pub fn policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy_number = number.into();
        self
    }

    pub fn insured_name(mut self, name: impl Into<String>) -> Self {
        self.insured_name = name.into();
        self
    }

    pub fn audit(mut self, audit: AuditStamp) -> Self {
        self.audit = audit;
        self
    }

    /// Builds the policy
    ///
    /// # Panics
    ///
    /// Panics if the number or name is blank
    pub fn build(self) -> Policy {
        Policy::new(
            policy_id_for(&self.policy_number),
            self.policy_number,
            self.insured_name,
            self.audit,
        )
        .expect("Failed to build test policy")
    }
}

/// Builder for test policy terms
///
/// Defaults to an active twelve month Californian term starting
/// 2023-01-01 with a balance of 250.00.
#[derive(Debug, Clone)]
pub struct TestPolicyTermBuilder {
    policy_number: String,
    term_number: i32,
    state: String,
    status: String,
    effective_from: NaiveDate,
    effective_to: Option<NaiveDate>,
    balance_due: Decimal,
    next_due_date: Option<NaiveDate>,
    last_payment_date: Option<NaiveDate>,
    audit: AuditStamp,
}

impl TestPolicyTermBuilder {
    pub fn new(policy_number: impl Into<String>, term_number: i32) -> Self {
        let effective_from = TemporalFixtures::term_start();
        Self {
            policy_number: policy_number.into(),
            term_number,
            state: "CA".to_string(),
            status: "ACTIVE".to_string(),
            effective_from,
            effective_to: None,
            balance_due: dec!(250.00),
            next_due_date: effective_from.checked_add_months(Months::new(1)),
            last_payment_date: None,
            audit: TemporalFixtures::audit(),
        }
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the start date; the end follows twelve months later unless set
    pub fn starting(mut self, from: NaiveDate) -> Self {
        self.effective_from = from;
        self.next_due_date = from.checked_add_months(Months::new(1));
        self
    }

    pub fn ending(mut self, to: NaiveDate) -> Self {
        self.effective_to = Some(to);
        self
    }

    pub fn balance_due(mut self, balance: Decimal) -> Self {
        self.balance_due = balance;
        self
    }

    pub fn next_due_date(mut self, date: Option<NaiveDate>) -> Self {
        self.next_due_date = date;
        self
    }

    /// Sets the last payment to `days` before the next due date
    pub fn paid_days_before_due(mut self, days: u64) -> Self {
        self.last_payment_date = self
            .next_due_date
            .and_then(|due| due.checked_sub_days(Days::new(days)));
        self
    }

    pub fn audit(mut self, audit: AuditStamp) -> Self {
        self.audit = audit;
        self
    }

    /// Builds the term
    ///
    /// # Panics
    ///
    /// Panics if the term violates a domain invariant
    pub fn build(self) -> PolicyTerm {
        let to = self
            .effective_to
            .unwrap_or_else(|| twelve_month_end(self.effective_from));
        PolicyTerm::builder(policy_id_for(&self.policy_number), self.term_number)
            .id(term_id_for(&self.policy_number, self.term_number))
            .state(self.state)
            .status(self.status)
            .effective(self.effective_from, to)
            .balance_due(self.balance_due)
            .next_due_date(self.next_due_date)
            .last_payment_date(self.last_payment_date)
            .audit(self.audit)
            .build()
            .expect("Failed to build test policy term")
    }
}

/// Builder for whole datasets
///
/// Terms attach to the most recently added policy and are numbered in the
/// order they are added.
///
/// ```rust,ignore
/// let data = TestDatasetBuilder::new()
///     .policy("OH-000001", "Ava Garcia")
///     .term("CA", "EXPIRED", date(2022, 3, 1))
///     .term("CA", "ACTIVE", date(2023, 3, 1))
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestDatasetBuilder {
    policies: Vec<Policy>,
    terms: Vec<PolicyTerm>,
}

impl TestDatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a policy with the default audit stamp
    pub fn policy(self, number: &str, insured_name: &str) -> Self {
        self.policy_with(
            TestPolicyBuilder::new()
                .policy_number(number)
                .insured_name(insured_name),
        )
    }

    pub fn policy_with(mut self, builder: TestPolicyBuilder) -> Self {
        self.policies.push(builder.build());
        self
    }

    /// Adds the next twelve month term of the current policy
    pub fn term(self, state: &str, status: &str, from: NaiveDate) -> Self {
        self.term_with(|t| t.state(state).status(status).starting(from))
    }

    /// Adds the next term of the current policy, customised by `f`
    ///
    /// # Panics
    ///
    /// Panics if no policy has been added yet
    pub fn term_with(
        mut self,
        f: impl FnOnce(TestPolicyTermBuilder) -> TestPolicyTermBuilder,
    ) -> Self {
        let policy = self.policies.last().expect("add a policy before its terms");
        let term_number = self.terms_of_current() + 1;
        let term = f(TestPolicyTermBuilder::new(policy.policy_number.clone(), term_number)
            .audit(policy.audit))
        .build();
        self.terms.push(term);
        self
    }

    fn terms_of_current(&self) -> i32 {
        let Some(policy) = self.policies.last() else {
            return 0;
        };
        let count = self.terms.iter().filter(|t| t.policy_id == policy.id).count();
        i32::try_from(count).expect("too many terms")
    }

    pub fn build(self) -> SeedData {
        SeedData {
            policies: self.policies,
            terms: self.terms,
        }
    }

    /// Builds the dataset already joined, in insertion order
    pub fn build_joined(self) -> Vec<TermWithPolicy> {
        let data = self.build();
        joined_rows(&data)
    }
}

/// Joins every term of `data` with its policy, in term insertion order
///
/// # Panics
///
/// Panics if a term references a policy missing from `data`
pub fn joined_rows(data: &SeedData) -> Vec<TermWithPolicy> {
    data.terms
        .iter()
        .map(|term| {
            let policy = data
                .policies
                .iter()
                .find(|p| p.id == term.policy_id)
                .expect("term references unknown policy");
            TermWithPolicy {
                term: term.clone(),
                policy: policy.clone(),
            }
        })
        .collect()
}
