//! PostgreSQL Policy Term Adapter
//!
//! Implements `PolicyTermPort` on top of [`PolicyTermRepository`]. The
//! adapter:
//!
//! - Delegates SQL to the repository
//! - Converts row types back to domain values
//! - Translates `DatabaseError` into `PortError`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresPolicyTermAdapter;
//! use domain_policy::PolicyTermPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn PolicyTermPort> = Arc::new(PostgresPolicyTermAdapter::new(pool));
//! let page = port.search_terms(&query).await?;
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PolicyTermId, PortError,
};
use domain_policy::{Page, PolicyTermPort, SeedData, SeedReport, TermQuery, TermWithPolicy};

use crate::error::{db_to_port_error, DatabaseError};
use crate::repositories::PolicyTermRepository;

const ADAPTER_ID: &str = "postgres-policy-term-adapter";

/// PostgreSQL-backed implementation of [`PolicyTermPort`]
///
/// # Health Checking
///
/// `health_check` runs `SELECT 1` through the pool; `/ready` uses it
/// to report whether the database is reachable.
#[derive(Debug, Clone)]
pub struct PostgresPolicyTermAdapter {
    repository: PolicyTermRepository,
}

impl PostgresPolicyTermAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PolicyTermRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresPolicyTermAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPolicyTermAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = self.repository.ping().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(()) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };
        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl PolicyTermPort for PostgresPolicyTermAdapter {
    #[instrument(skip(self, query), fields(sort = %query.sort.field, page = query.page.page()))]
    async fn search_terms(&self, query: &TermQuery) -> Result<Page<TermWithPolicy>, PortError> {
        let page = self
            .repository
            .search(query)
            .await
            .map_err(db_to_port_error)?;

        let items = page
            .items
            .into_iter()
            .map(TermWithPolicy::try_from)
            .collect::<Result<Vec<_>, DatabaseError>>()
            .map_err(db_to_port_error)?;

        debug!(returned = items.len(), total = page.total_elements, "Search complete");
        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        })
    }

    #[instrument(skip(self), fields(term_id = %id))]
    async fn get_term(&self, id: PolicyTermId) -> Result<TermWithPolicy, PortError> {
        debug!("Fetching policy term by ID");

        let row = self
            .repository
            .find_by_id(*id.as_uuid())
            .await
            .map_err(db_to_port_error)?;

        TermWithPolicy::try_from(row).map_err(db_to_port_error)
    }

    #[instrument(skip(self, data), fields(policies = data.policies.len(), terms = data.terms.len()))]
    async fn replace_dataset(&self, data: &SeedData) -> Result<SeedReport, PortError> {
        let report = self
            .repository
            .replace_all(data)
            .await
            .map_err(db_to_port_error)?;

        info!(
            policies = report.policies,
            terms = report.terms,
            "Replaced policy term dataset"
        );
        Ok(report)
    }
}
