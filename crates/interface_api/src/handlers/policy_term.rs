//! Policy term handlers

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use core_kernel::PolicyTermId;
use tracing::debug;

use crate::dto::{
    PageResponse, PolicyTermDetailResponse, PolicyTermSearchParams, PolicyTermSummaryResponse,
};
use crate::{error::ApiError, AppState};

/// Searches policy terms
///
/// Parameters are validated in full before the port is called.
pub async fn list_policy_terms(
    State(state): State<AppState>,
    params: Result<Query<PolicyTermSearchParams>, QueryRejection>,
) -> Result<Json<PageResponse<PolicyTermSummaryResponse>>, ApiError> {
    let Query(params) = params?;
    let query = params.into_query()?;
    debug!(
        sort = %query.sort.field,
        page = query.page.page(),
        size = query.page.size(),
        "Searching policy terms"
    );

    let page = state.port.search_terms(&query).await?;
    Ok(Json(PageResponse::from_page(page, |row| {
        PolicyTermSummaryResponse::from(row)
    })))
}

/// Gets a policy term by ID
///
/// Accepts a bare UUID or the prefixed `TRM-<uuid>` form.
pub async fn get_policy_term(
    State(state): State<AppState>,
    term_id: Result<Path<String>, PathRejection>,
) -> Result<Json<PolicyTermDetailResponse>, ApiError> {
    let Path(term_id) = term_id?;
    let id: PolicyTermId = term_id
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation(format!("'{term_id}' is not a valid term id")))?;

    let row = state.port.get_term(id).await?;
    Ok(Json(PolicyTermDetailResponse::from(&row)))
}
