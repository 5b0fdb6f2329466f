//! Policy Terms Domain
//!
//! This crate holds the policy terms domain, free of storage and transport
//! concerns:
//! - **Entities**: [`Policy`] and its renewal [`PolicyTerm`]s
//! - **Search**: predicate-list filtering, allow-listed sorting, paging
//! - **Port**: [`PolicyTermPort`], the storage boundary
//! - **Seed**: the deterministic development dataset
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{SeedGenerator, TermQuery, TermSort, PolicyTermPort};
//!
//! let data = SeedGenerator::new().generate()?;
//! port.replace_dataset(&data).await?;
//!
//! let mut query = TermQuery::default();
//! query.sort = TermSort::parse("insured_name,desc")?;
//! let page = port.search_terms(&query).await?;
//! ```

pub mod error;
pub mod term;
pub mod search;
pub mod ports;
pub mod seed;
#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use error::PolicyError;
pub use term::{Policy, PolicyTerm, PolicyTermBuilder, TermStatus, TermWithPolicy};
pub use search::{
    Page, PageRequest, SortDirection, SortField, TermFilter, TermPredicate, TermQuery, TermSort,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use ports::{PolicyTermPort, SeedReport};
pub use seed::{SeedData, SeedGenerator};
#[cfg(any(test, feature = "memory"))]
pub use memory::InMemoryPolicyTermPort;
