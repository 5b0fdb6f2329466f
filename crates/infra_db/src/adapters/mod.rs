//! Domain Adapters
//!
//! Adapter implementations for domain ports, connecting the domain's
//! interfaces to the PostgreSQL repositories.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresPolicyTermAdapter;
//! use domain_policy::PolicyTermPort;
//!
//! let adapter = PostgresPolicyTermAdapter::new(pool);
//! let term = adapter.get_term(term_id).await?;
//! ```

pub mod policy_term;

pub use policy_term::PostgresPolicyTermAdapter;
