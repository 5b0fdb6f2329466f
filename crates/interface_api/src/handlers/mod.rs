//! Request handlers

pub mod health;
pub mod policy_term;
