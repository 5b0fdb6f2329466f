//! Policy term DTOs

use chrono::{DateTime, NaiveDate, Utc};
use domain_policy::{
    Page, PageRequest, TermFilter, TermQuery, TermSort, TermWithPolicy, DEFAULT_PAGE_SIZE,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

fn default_size() -> i64 {
    i64::from(DEFAULT_PAGE_SIZE)
}

/// Query parameters of `GET /policy-terms`
///
/// Numbers are signed; negative values are rejected by validation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PolicyTermSearchParams {
    /// Substring of policy number or insured name
    pub q: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
    /// `YYYY-MM-DD`, inclusive lower bound on the expiry date
    pub exp_from: Option<String>,
    /// `YYYY-MM-DD`, inclusive upper bound on the expiry date
    pub exp_to: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "page must be >= 0"))]
    pub page: i64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 200, message = "size must be between 1 and 200"))]
    pub size: i64,
    /// `<field>[,asc|desc]`
    pub sort: Option<String>,
}

impl Default for PolicyTermSearchParams {
    fn default() -> Self {
        Self {
            q: None,
            state: None,
            status: None,
            exp_from: None,
            exp_to: None,
            page: 0,
            size: default_size(),
            sort: None,
        }
    }
}

impl PolicyTermSearchParams {
    /// Validates the parameters and converts them into a domain query
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidParameters` for out-of-range paging and
    /// `ApiError::Validation` for malformed dates or an unsupported sort field
    pub fn into_query(self) -> Result<TermQuery, ApiError> {
        self.validate()?;

        let page = u32::try_from(self.page)
            .map_err(|_| ApiError::Validation(format!("page {} is out of range", self.page)))?;
        let size = u32::try_from(self.size)
            .map_err(|_| ApiError::Validation(format!("size {} is out of range", self.size)))?;
        let page = PageRequest::new(page, size)?;

        let sort = TermSort::parse(self.sort.as_deref().unwrap_or_default())?;

        let filter = TermFilter {
            query: self.q,
            state: self.state,
            status: self.status,
            expires_from: parse_date("exp_from", self.exp_from.as_deref())?,
            expires_to: parse_date("exp_to", self.exp_to.as_deref())?,
        };

        Ok(TermQuery::new(filter, sort, page))
    }
}

/// Parses an optional ISO date; blank input counts as absent
fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                ApiError::Validation(format!("{name} must be a date in YYYY-MM-DD format, got '{raw}'"))
            }),
    }
}

/// One row of a search result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTermSummaryResponse {
    pub id: Uuid,
    pub policy_number: String,
    pub insured_name: String,
    pub term_number: i32,
    pub state: String,
    pub status: String,
    pub effective_from_date: NaiveDate,
    pub effective_to_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance_due: Decimal,
    pub next_due_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
}

impl From<&TermWithPolicy> for PolicyTermSummaryResponse {
    fn from(row: &TermWithPolicy) -> Self {
        Self {
            id: *row.term.id.as_uuid(),
            policy_number: row.policy.policy_number.clone(),
            insured_name: row.policy.insured_name.clone(),
            term_number: row.term.term_number,
            state: row.term.state.clone(),
            status: row.term.status.clone(),
            effective_from_date: row.term.effective_from_date,
            effective_to_date: row.term.effective_to_date,
            balance_due: row.term.balance_due,
            next_due_date: row.term.next_due_date,
            last_payment_date: row.term.last_payment_date,
        }
    }
}

/// Full view of a single term, with audit timestamps
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTermDetailResponse {
    #[serde(flatten)]
    pub summary: PolicyTermSummaryResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TermWithPolicy> for PolicyTermDetailResponse {
    fn from(row: &TermWithPolicy) -> Self {
        Self {
            summary: PolicyTermSummaryResponse::from(row),
            created_at: row.term.created_at(),
            updated_at: row.term.updated_at(),
        }
    }
}

/// Page envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn from_page<S>(page: Page<S>, f: impl Fn(&S) -> T) -> Self {
        Self {
            items: page.items.iter().map(f).collect(),
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}
