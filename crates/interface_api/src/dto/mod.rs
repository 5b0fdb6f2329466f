//! Request and response data transfer objects

pub mod policy_term;

pub use policy_term::{
    PageResponse, PolicyTermDetailResponse, PolicyTermSearchParams, PolicyTermSummaryResponse,
};
