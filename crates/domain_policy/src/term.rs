//! Policy and PolicyTerm entities
//!
//! A [`Policy`] is the insurance contract, identified by its policy number.
//! Each policy owns one or more [`PolicyTerm`]s, one per renewal year, each
//! with its own coverage window, balance and payment dates.
//!
//! Both entities are immutable through the API. Timestamps are carried in an
//! explicit [`AuditStamp`] that constructors set and [`Policy::rename_insured`]
//! refreshes.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{AuditStamp, PolicyId, PolicyTermId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PolicyError;

/// Lifecycle label of a term
///
/// Storage keeps the status as a free string; these are the only values the
/// service itself writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TermStatus {
    Active,
    Expired,
    Cancelled,
    NonRenewed,
}

impl TermStatus {
    /// Every status, in the order the seed generator draws from
    pub const ALL: [TermStatus; 4] = [
        TermStatus::Active,
        TermStatus::Expired,
        TermStatus::Cancelled,
        TermStatus::NonRenewed,
    ];

    /// Returns the stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TermStatus::Active => "ACTIVE",
            TermStatus::Expired => "EXPIRED",
            TermStatus::Cancelled => "CANCELLED",
            TermStatus::NonRenewed => "NON_RENEWED",
        }
    }
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An insurance contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub policy_number: String,
    pub insured_name: String,
    pub audit: AuditStamp,
}

impl Policy {
    /// Creates a policy
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::MissingRequiredField` if the policy number or
    /// insured name is blank
    pub fn new(
        id: PolicyId,
        policy_number: impl Into<String>,
        insured_name: impl Into<String>,
        audit: AuditStamp,
    ) -> Result<Self, PolicyError> {
        let policy_number = policy_number.into();
        let insured_name = insured_name.into();
        if policy_number.trim().is_empty() {
            return Err(PolicyError::MissingRequiredField("policy_number".to_string()));
        }
        if insured_name.trim().is_empty() {
            return Err(PolicyError::MissingRequiredField("insured_name".to_string()));
        }
        Ok(Self {
            id,
            policy_number,
            insured_name,
            audit,
        })
    }

    /// Changes the insured name and refreshes `updated_at`
    pub fn rename_insured(
        &mut self,
        insured_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), PolicyError> {
        let insured_name = insured_name.into();
        if insured_name.trim().is_empty() {
            return Err(PolicyError::MissingRequiredField("insured_name".to_string()));
        }
        self.insured_name = insured_name;
        self.audit.touch(now);
        Ok(())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.audit.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.audit.updated_at()
    }
}

/// One renewal period of a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTerm {
    pub id: PolicyTermId,
    pub policy_id: PolicyId,
    pub term_number: i32,
    pub state: String,
    pub status: String,
    pub effective_from_date: NaiveDate,
    pub effective_to_date: NaiveDate,
    pub balance_due: Decimal,
    pub next_due_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub audit: AuditStamp,
}

impl PolicyTerm {
    /// Starts building a term owned by `policy_id`
    pub fn builder(policy_id: PolicyId, term_number: i32) -> PolicyTermBuilder {
        PolicyTermBuilder::new(policy_id, term_number)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.audit.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.audit.updated_at()
    }
}

/// A term joined with the policy that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermWithPolicy {
    pub term: PolicyTerm,
    pub policy: Policy,
}

/// Builder for [`PolicyTerm`]
///
/// `build` enforces the term invariants: positive term number, a window whose
/// start precedes its end, a non-negative balance with at most two fractional
/// digits, and a last payment strictly before the next due date.
#[derive(Debug, Clone)]
pub struct PolicyTermBuilder {
    id: Option<PolicyTermId>,
    policy_id: PolicyId,
    term_number: i32,
    state: Option<String>,
    status: Option<String>,
    effective_from_date: Option<NaiveDate>,
    effective_to_date: Option<NaiveDate>,
    balance_due: Decimal,
    next_due_date: Option<NaiveDate>,
    last_payment_date: Option<NaiveDate>,
    audit: Option<AuditStamp>,
}

impl PolicyTermBuilder {
    pub fn new(policy_id: PolicyId, term_number: i32) -> Self {
        Self {
            id: None,
            policy_id,
            term_number,
            state: None,
            status: None,
            effective_from_date: None,
            effective_to_date: None,
            balance_due: Decimal::ZERO,
            next_due_date: None,
            last_payment_date: None,
            audit: None,
        }
    }

    /// Sets the term id; a random id is used otherwise
    pub fn id(mut self, id: PolicyTermId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the jurisdiction code
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the lifecycle status
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the coverage window
    pub fn effective(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.effective_from_date = Some(from);
        self.effective_to_date = Some(to);
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

    pub fn last_payment_date(mut self, date: Option<NaiveDate>) -> Self {
        self.last_payment_date = date;
        self
    }

    pub fn audit(mut self, audit: AuditStamp) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Builds the term
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for absent fields and `InvalidTerm` when
    /// an invariant does not hold
    pub fn build(self) -> Result<PolicyTerm, PolicyError> {
        let state = self.state
            .ok_or(PolicyError::MissingRequiredField("state".to_string()))?;
        let status = self.status
            .ok_or(PolicyError::MissingRequiredField("status".to_string()))?;
        let effective_from_date = self.effective_from_date
            .ok_or(PolicyError::MissingRequiredField("effective_from_date".to_string()))?;
        let effective_to_date = self.effective_to_date
            .ok_or(PolicyError::MissingRequiredField("effective_to_date".to_string()))?;
        let audit = self.audit
            .ok_or(PolicyError::MissingRequiredField("audit".to_string()))?;

        if self.term_number < 1 {
            return Err(PolicyError::invalid_term(format!(
                "term number must be positive, got {}",
                self.term_number
            )));
        }
        if effective_from_date >= effective_to_date {
            return Err(PolicyError::invalid_term(format!(
                "effective window {} .. {} is empty",
                effective_from_date, effective_to_date
            )));
        }
        if self.balance_due.is_sign_negative() && !self.balance_due.is_zero() {
            return Err(PolicyError::invalid_term(format!(
                "balance due must not be negative, got {}",
                self.balance_due
            )));
        }
        if self.balance_due.round_dp(2) != self.balance_due {
            return Err(PolicyError::invalid_term(format!(
                "balance due has more than two fractional digits: {}",
                self.balance_due
            )));
        }
        if let (Some(last), Some(next)) = (self.last_payment_date, self.next_due_date) {
            if last >= next {
                return Err(PolicyError::invalid_term(format!(
                    "last payment {} must precede next due date {}",
                    last, next
                )));
            }
        }

        let mut balance_due = self.balance_due.abs();
        balance_due.rescale(2);

        Ok(PolicyTerm {
            id: self.id.unwrap_or_default(),
            policy_id: self.policy_id,
            term_number: self.term_number,
            state,
            status,
            effective_from_date,
            effective_to_date,
            balance_due,
            next_due_date: self.next_due_date,
            last_payment_date: self.last_payment_date,
            audit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stamp() -> AuditStamp {
        AuditStamp::created(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap())
    }

    fn base_builder() -> PolicyTermBuilder {
        PolicyTerm::builder(PolicyId::new(), 1)
            .state("CA")
            .status(TermStatus::Active.as_str())
            .effective(date(2023, 1, 1), date(2023, 12, 31))
            .balance_due(dec!(120.5))
            .audit(stamp())
    }

    #[test]
    fn test_build_rescales_balance_to_two_places() {
        let term = base_builder().build().unwrap();
        assert_eq!(term.balance_due.to_string(), "120.50");
    }

    #[test]
    fn test_build_rejects_empty_window() {
        let result = base_builder()
            .effective(date(2023, 1, 1), date(2023, 1, 1))
            .build();
        assert!(matches!(result, Err(PolicyError::InvalidTerm(_))));
    }

    #[test]
    fn test_build_rejects_negative_balance() {
        let result = base_builder().balance_due(dec!(-1.00)).build();
        assert!(matches!(result, Err(PolicyError::InvalidTerm(_))));
    }

    #[test]
    fn test_build_rejects_payment_after_due_date() {
        let result = base_builder()
            .next_due_date(Some(date(2023, 2, 1)))
            .last_payment_date(Some(date(2023, 2, 1)))
            .build();
        assert!(matches!(result, Err(PolicyError::InvalidTerm(_))));
    }

    #[test]
    fn test_build_requires_state() {
        let result = PolicyTerm::builder(PolicyId::new(), 1)
            .status("ACTIVE")
            .effective(date(2023, 1, 1), date(2023, 12, 31))
            .audit(stamp())
            .build();
        assert!(matches!(result, Err(PolicyError::MissingRequiredField(f)) if f == "state"));
    }

    #[test]
    fn test_rename_insured_touches_updated_at() {
        let mut policy = Policy::new(PolicyId::new(), "OH-000001", "Ava Kim", stamp()).unwrap();
        let later = Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap();
        policy.rename_insured("Ava Kim Holdings", later).unwrap();
        assert_eq!(policy.insured_name, "Ava Kim Holdings");
        assert_eq!(policy.updated_at(), later);
        assert!(policy.created_at() <= policy.updated_at());
    }

    #[test]
    fn test_status_wire_form() {
        assert_eq!(TermStatus::NonRenewed.as_str(), "NON_RENEWED");
        assert_eq!(
            serde_json::to_string(&TermStatus::NonRenewed).unwrap(),
            "\"NON_RENEWED\""
        );
    }
}
