//! Core Kernel - Foundational types shared by the policy terms service
//!
//! This crate provides the building blocks used across the workspace:
//! - Strongly-typed identifiers, including name-derived ids for seed data
//! - Audit timestamps with an explicit update path
//! - Port error vocabulary and health-check abstractions for adapters

pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use temporal::{AuditStamp, TemporalError};
pub use identifiers::{PolicyId, PolicyTermId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
