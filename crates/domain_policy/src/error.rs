//! Policy domain errors
//!
//! This module defines all error types that can occur within the
//! policy terms domain.

use core_kernel::TemporalError;
use thiserror::Error;

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Required field is missing
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// A term violates one of its own invariants
    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    /// Sort field is not in the allow-list
    #[error("Unsupported sort field: {0}")]
    UnsupportedSortField(String),

    /// Page number or page size out of bounds
    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    /// Audit timestamps out of order
    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// Seed data could not be generated
    #[error("Seed generation failed: {0}")]
    Seed(String),
}

impl PolicyError {
    /// Creates an invalid term error
    pub fn invalid_term(message: impl Into<String>) -> Self {
        PolicyError::InvalidTerm(message.into())
    }

    /// Creates a seed generation error
    pub fn seed(message: impl Into<String>) -> Self {
        PolicyError::Seed(message.into())
    }

    /// Returns true if the error stems from caller input rather than data or infrastructure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PolicyError::UnsupportedSortField(_) | PolicyError::InvalidPage(_)
        )
    }
}
