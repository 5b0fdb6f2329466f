//! In-memory Policy Term Port
//!
//! Keeps policies and terms in maps behind a `tokio::sync::RwLock` and runs
//! searches through [`execute_in_memory`]. Useful for tests and demos
//! without a database.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PolicyId, PolicyTermId,
    PortError,
};
use tokio::sync::RwLock;

use crate::ports::{PolicyTermPort, SeedReport};
use crate::search::{execute_in_memory, Page, TermQuery};
use crate::seed::SeedData;
use crate::term::{Policy, PolicyTerm, TermWithPolicy};

#[derive(Debug, Default)]
struct Tables {
    policies: HashMap<PolicyId, Policy>,
    terms: BTreeMap<PolicyTermId, PolicyTerm>,
}

impl Tables {
    /// Inner join of terms to policies; a term is keyed by id so it appears once
    fn joined(&self) -> Vec<TermWithPolicy> {
        self.terms
            .values()
            .filter_map(|term| {
                self.policies.get(&term.policy_id).map(|policy| TermWithPolicy {
                    term: term.clone(),
                    policy: policy.clone(),
                })
            })
            .collect()
    }
}

/// In-memory implementation of [`PolicyTermPort`]
#[derive(Debug, Default, Clone)]
pub struct InMemoryPolicyTermPort {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPolicyTermPort {
    /// Creates an empty port
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a port pre-populated with `data`
    ///
    /// # Errors
    ///
    /// Same as [`PolicyTermPort::replace_dataset`]
    pub async fn with_data(data: &SeedData) -> Result<Self, PortError> {
        let port = Self::new();
        port.replace_dataset(data).await?;
        Ok(port)
    }

    /// Number of stored terms
    pub async fn term_count(&self) -> usize {
        self.tables.read().await.terms.len()
    }
}

impl DomainPort for InMemoryPolicyTermPort {}

#[async_trait]
impl HealthCheckable for InMemoryPolicyTermPort {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "memory-policy-term-port".to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: None,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl PolicyTermPort for InMemoryPolicyTermPort {
    async fn search_terms(&self, query: &TermQuery) -> Result<Page<TermWithPolicy>, PortError> {
        let tables = self.tables.read().await;
        Ok(execute_in_memory(tables.joined(), query))
    }

    async fn get_term(&self, id: PolicyTermId) -> Result<TermWithPolicy, PortError> {
        let tables = self.tables.read().await;
        let term = tables
            .terms
            .get(&id)
            .ok_or_else(|| PortError::not_found("PolicyTerm", id))?;
        let policy = tables
            .policies
            .get(&term.policy_id)
            .ok_or_else(|| PortError::not_found("PolicyTerm", id))?;
        Ok(TermWithPolicy {
            term: term.clone(),
            policy: policy.clone(),
        })
    }

    async fn replace_dataset(&self, data: &SeedData) -> Result<SeedReport, PortError> {
        // Build the replacement first so a rejected dataset leaves the old one in place
        let mut next = Tables::default();
        let mut numbers = HashSet::new();
        for policy in &data.policies {
            if !numbers.insert(policy.policy_number.as_str()) {
                return Err(PortError::validation_field(
                    format!("duplicate policy number {}", policy.policy_number),
                    "policy_number",
                ));
            }
            if next.policies.insert(policy.id, policy.clone()).is_some() {
                return Err(PortError::validation_field(
                    format!("duplicate policy id {}", policy.id),
                    "id",
                ));
            }
        }
        let mut term_numbers = HashSet::new();
        for term in &data.terms {
            if !next.policies.contains_key(&term.policy_id) {
                return Err(PortError::validation_field(
                    format!("term {} references unknown policy {}", term.id, term.policy_id),
                    "policy_id",
                ));
            }
            if !term_numbers.insert((term.policy_id, term.term_number)) {
                return Err(PortError::validation_field(
                    format!(
                        "duplicate term number {} for policy {}",
                        term.term_number, term.policy_id
                    ),
                    "term_number",
                ));
            }
            if next.terms.insert(term.id, term.clone()).is_some() {
                return Err(PortError::validation_field(
                    format!("duplicate term id {}", term.id),
                    "id",
                ));
            }
        }

        let report = SeedReport {
            policies: next.policies.len(),
            terms: next.terms.len(),
        };
        *self.tables.write().await = next;
        Ok(report)
    }
}
