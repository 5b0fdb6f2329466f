//! Policy Term Port
//!
//! The storage port for policy terms. The HTTP layer depends only on this
//! trait; `infra_db` implements it on PostgreSQL and [`crate::memory`]
//! implements it in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{PolicyTermPort, TermQuery};
//! use std::sync::Arc;
//!
//! let port: Arc<dyn PolicyTermPort> = Arc::new(adapter);
//! let page = port.search_terms(&TermQuery::default()).await?;
//! ```

use async_trait::async_trait;
use core_kernel::{DomainPort, HealthCheckable, PolicyTermId, PortError};

use crate::search::{Page, TermQuery};
use crate::seed::SeedData;
use crate::term::TermWithPolicy;

/// Counts written by a dataset replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub policies: usize,
    pub terms: usize,
}

/// Read access to policy terms plus the out-of-band dataset replacement
///
/// Implementations must uphold:
/// - `search_terms` returns terms joined with their policy, each at most once,
///   with `total_elements` counted over the same filter as the items
/// - `replace_dataset` is all-or-nothing: on error the previous data is intact
#[async_trait]
pub trait PolicyTermPort: DomainPort + HealthCheckable {
    /// Runs a filtered, sorted, paged search
    async fn search_terms(&self, query: &TermQuery) -> Result<Page<TermWithPolicy>, PortError>;

    /// Fetches one term with its policy
    ///
    /// # Errors
    ///
    /// Returns `PortError::NotFound` if no term has this id
    async fn get_term(&self, id: PolicyTermId) -> Result<TermWithPolicy, PortError>;

    /// Deletes every term and policy, then inserts `data`
    async fn replace_dataset(&self, data: &SeedData) -> Result<SeedReport, PortError>;
}
