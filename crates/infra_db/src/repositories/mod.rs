//! Repository implementations
//!
//! Repositories own the SQL and the row types, and map between database rows
//! and domain values. Writes that touch more than one table run inside a
//! single transaction.

pub mod policy_term;

pub use policy_term::{PolicyTermRepository, PolicyTermRow};
