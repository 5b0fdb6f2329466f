//! Test Utilities for the Policy Terms API
//!
//! This crate provides shared testing infrastructure:
//! - Test fixtures for dates, audit stamps and a small known dataset
//! - Builders for policies, terms and whole datasets
//! - PostgreSQL testcontainer management
//! - Assertions over search pages
//! - Property-based testing generators
//!
//! # Usage
//!
//! Add to your `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! test_utils = { workspace = true }
//! ```

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
