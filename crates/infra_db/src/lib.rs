//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the policy terms service, built on SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. [`repositories`] owns the SQL
//! and the row types; [`adapters`] implements the domain's
//! `PolicyTermPort` on top of a repository and translates errors into
//! `PortError`.
//!
//! Search queries are assembled at runtime from the domain's predicate list,
//! so only allow-listed columns ever reach the SQL text and every operand is
//! a bound parameter.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresPolicyTermAdapter;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/policy_terms")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresPolicyTermAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::{db_to_port_error, DatabaseError};
pub use adapters::PostgresPolicyTermAdapter;
pub use repositories::PolicyTermRepository;
