//! Policy term search
//!
//! A search is a [`TermQuery`]: a [`TermFilter`] of optional parameters, a
//! [`TermSort`] drawn from a fixed allow-list, and a [`PageRequest`].
//!
//! The filter is lowered into an explicit list of [`TermPredicate`]s, one per
//! supplied parameter, which are ANDed together. Each predicate can evaluate
//! itself against an in-memory term and its policy; storage adapters translate
//! the same list into their own query language.
//!
//! # Example
//!
//! ```rust
//! use domain_policy::search::{PageRequest, TermFilter, TermQuery, TermSort};
//!
//! let filter = TermFilter {
//!     query: Some("  oh-0001 ".to_string()),
//!     state: Some("ca".to_string()),
//!     ..Default::default()
//! };
//! let query = TermQuery::new(
//!     filter,
//!     TermSort::parse("term_number,desc").unwrap(),
//!     PageRequest::new(0, 20).unwrap(),
//! );
//! assert_eq!(query.predicates().len(), 2);
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::error::PolicyError;
use crate::term::{Policy, PolicyTerm, TermWithPolicy};

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 200;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Folds ASCII letters only, so every storage adapter agrees on non-ASCII text
fn fold_case(value: &str) -> String {
    value.to_ascii_lowercase()
}

/// Trims a text parameter and drops it when blank
fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(fold_case)
}

/// Optional search parameters
///
/// Text values are raw caller input; trimming and case folding happen when the
/// filter is lowered to predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFilter {
    /// Substring of the policy number or insured name
    pub query: Option<String>,
    /// Exact jurisdiction code
    pub state: Option<String>,
    /// Exact term status
    pub status: Option<String>,
    /// Lower bound (inclusive) on `effective_to_date`
    pub expires_from: Option<NaiveDate>,
    /// Upper bound (inclusive) on `effective_to_date`
    pub expires_to: Option<NaiveDate>,
}

impl TermFilter {
    /// Lowers the filter into the predicates it implies
    ///
    /// Blank text parameters contribute nothing, so an empty filter yields an
    /// empty list and matches every term.
    pub fn predicates(&self) -> Vec<TermPredicate> {
        let mut predicates = Vec::new();

        if let Some(needle) = normalized(self.query.as_deref()) {
            predicates.push(TermPredicate::PolicyTextContains(needle));
        }
        if let Some(state) = normalized(self.state.as_deref()) {
            predicates.push(TermPredicate::StateEquals(state));
        }
        if let Some(status) = normalized(self.status.as_deref()) {
            predicates.push(TermPredicate::StatusEquals(status));
        }
        if let Some(from) = self.expires_from {
            predicates.push(TermPredicate::ExpiresOnOrAfter(from));
        }
        if let Some(to) = self.expires_to {
            predicates.push(TermPredicate::ExpiresOnOrBefore(to));
        }

        predicates
    }
}

/// A single search constraint
///
/// Text operands are already trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermPredicate {
    /// Policy number or insured name contains the operand, ignoring case
    PolicyTextContains(String),
    /// Term state equals the operand, ignoring case
    StateEquals(String),
    /// Term status equals the operand, ignoring case
    StatusEquals(String),
    /// `effective_to_date >= operand`
    ExpiresOnOrAfter(NaiveDate),
    /// `effective_to_date <= operand`
    ExpiresOnOrBefore(NaiveDate),
}

impl TermPredicate {
    /// Evaluates the predicate against a term and its owning policy
    pub fn matches(&self, term: &PolicyTerm, policy: &Policy) -> bool {
        match self {
            TermPredicate::PolicyTextContains(needle) => {
                fold_case(&policy.policy_number).contains(needle.as_str())
                    || fold_case(&policy.insured_name).contains(needle.as_str())
            }
            TermPredicate::StateEquals(state) => fold_case(&term.state) == *state,
            TermPredicate::StatusEquals(status) => fold_case(&term.status) == *status,
            TermPredicate::ExpiresOnOrAfter(date) => term.effective_to_date >= *date,
            TermPredicate::ExpiresOnOrBefore(date) => term.effective_to_date <= *date,
        }
    }
}

/// Checks a term against every predicate (logical AND)
pub fn matches_all(predicates: &[TermPredicate], term: &PolicyTerm, policy: &Policy) -> bool {
    predicates.iter().all(|p| p.matches(term, policy))
}

/// Sortable fields
///
/// This is the complete allow-list of external sort names; anything else is
/// rejected before a query is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    EffectiveToDate,
    EffectiveFromDate,
    PolicyNumber,
    InsuredName,
    State,
    Status,
    TermNumber,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::EffectiveToDate,
        SortField::EffectiveFromDate,
        SortField::PolicyNumber,
        SortField::InsuredName,
        SortField::State,
        SortField::Status,
        SortField::TermNumber,
    ];

    /// Returns the name callers use for this field
    pub fn external_name(&self) -> &'static str {
        match self {
            SortField::EffectiveToDate => "effective_to_date",
            SortField::EffectiveFromDate => "effective_from_date",
            SortField::PolicyNumber => "policy_number",
            SortField::InsuredName => "insured_name",
            SortField::State => "state",
            SortField::Status => "status",
            SortField::TermNumber => "term_number",
        }
    }

    /// Looks up a field by its external name
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::UnsupportedSortField` for names outside the allow-list
    pub fn from_external(name: &str) -> Result<Self, PolicyError> {
        SortField::ALL
            .into_iter()
            .find(|field| field.external_name() == name)
            .ok_or_else(|| PolicyError::UnsupportedSortField(name.to_string()))
    }

    /// Compares two joined rows on this field only
    pub fn compare(&self, a: &TermWithPolicy, b: &TermWithPolicy) -> Ordering {
        match self {
            SortField::EffectiveToDate => a.term.effective_to_date.cmp(&b.term.effective_to_date),
            SortField::EffectiveFromDate => {
                a.term.effective_from_date.cmp(&b.term.effective_from_date)
            }
            SortField::PolicyNumber => a.policy.policy_number.cmp(&b.policy.policy_number),
            SortField::InsuredName => a.policy.insured_name.cmp(&b.policy.insured_name),
            SortField::State => a.term.state.cmp(&b.term.state),
            SortField::Status => a.term.status.cmp(&b.term.status),
            SortField::TermNumber => a.term.term_number.cmp(&b.term.term_number),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.external_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parses `asc` / `desc` in any case; anything else is ascending
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Descending)
    }
}

/// Single-key ordering of search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for TermSort {
    fn default() -> Self {
        Self {
            field: SortField::EffectiveToDate,
            direction: SortDirection::Ascending,
        }
    }
}

impl TermSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parses `"<field>[,<direction>]"`
    ///
    /// A blank value yields the default (`effective_to_date` ascending). A
    /// missing or unrecognized direction is ascending.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::UnsupportedSortField` if the field is not in the allow-list
    pub fn parse(raw: &str) -> Result<Self, PolicyError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut parts = raw.split(',');
        let field = SortField::from_external(parts.next().unwrap_or_default().trim())?;
        let direction = parts
            .next()
            .map(SortDirection::parse_lenient)
            .unwrap_or_default();

        Ok(Self { field, direction })
    }

    /// Total order used for paging
    ///
    /// Ties on the sort key fall back to the term id so that consecutive pages
    /// never overlap or skip rows.
    pub fn compare(&self, a: &TermWithPolicy, b: &TermWithPolicy) -> Ordering {
        let primary = match self.direction {
            SortDirection::Ascending => self.field.compare(a, b),
            SortDirection::Descending => self.field.compare(b, a),
        };
        primary.then_with(|| a.term.id.cmp(&b.term.id))
    }
}

/// Zero-based page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Creates a page request
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidPage` unless `1 <= size <= MAX_PAGE_SIZE`
    pub fn new(page: u32, size: u32) -> Result<Self, PolicyError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PolicyError::InvalidPage(format!(
                "size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, size
            )));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// A complete search request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermQuery {
    pub filter: TermFilter,
    pub sort: TermSort,
    pub page: PageRequest,
}

impl TermQuery {
    pub fn new(filter: TermFilter, sort: TermSort, page: PageRequest) -> Self {
        Self { filter, sort, page }
    }

    pub fn predicates(&self) -> Vec<TermPredicate> {
        self.filter.predicates()
    }
}

/// One page of results plus totals across all pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Wraps one page of items; `total_elements` counts the whole filtered set
    pub fn new(items: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(request.size())),
        }
    }

    /// Transforms the items, keeping the page coordinates
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// Applies a query to an in-memory set of joined rows
///
/// Filters with the query's predicates, sorts with its total order, counts
/// the filtered set and cuts out the requested page.
pub fn execute_in_memory(
    rows: impl IntoIterator<Item = TermWithPolicy>,
    query: &TermQuery,
) -> Page<TermWithPolicy> {
    let predicates = query.predicates();
    let mut matched: Vec<TermWithPolicy> = rows
        .into_iter()
        .filter(|row| matches_all(&predicates, &row.term, &row.policy))
        .collect();
    matched.sort_by(|a, b| query.sort.compare(a, b));

    let total = matched.len() as u64;
    let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
    let items = matched
        .into_iter()
        .skip(offset)
        .take(query.page.size() as usize)
        .collect();

    Page::new(items, query.page, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_parameters_produce_no_predicates() {
        let filter = TermFilter {
            query: Some("   ".to_string()),
            state: Some(String::new()),
            status: Some("\t".to_string()),
            ..Default::default()
        };
        assert!(filter.predicates().is_empty());
    }

    #[test]
    fn test_text_parameters_are_trimmed_and_folded() {
        let filter = TermFilter {
            query: Some("  Garcia ".to_string()),
            status: Some(" Active".to_string()),
            ..Default::default()
        };
        assert_eq!(
            filter.predicates(),
            vec![
                TermPredicate::PolicyTextContains("garcia".to_string()),
                TermPredicate::StatusEquals("active".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_parse_defaults() {
        assert_eq!(TermSort::parse("").unwrap(), TermSort::default());
        assert_eq!(TermSort::parse("  ").unwrap(), TermSort::default());

        let sort = TermSort::parse("policy_number").unwrap();
        assert_eq!(sort.field, SortField::PolicyNumber);
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_parse_direction() {
        let sort = TermSort::parse("term_number,DESC").unwrap();
        assert_eq!(sort.field, SortField::TermNumber);
        assert!(sort.direction.is_descending());

        let sort = TermSort::parse("state,sideways").unwrap();
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_parse_rejects_unknown_field() {
        let result = TermSort::parse("balance_due,asc");
        assert!(matches!(result, Err(PolicyError::UnsupportedSortField(f)) if f == "balance_due"));
    }

    #[test]
    fn test_every_field_round_trips_through_its_external_name() {
        for field in SortField::ALL {
            assert_eq!(SortField::from_external(field.external_name()).unwrap(), field);
        }
    }

    #[test]
    fn test_page_request_bounds() {
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, MAX_PAGE_SIZE + 1).is_err());
        assert!(PageRequest::new(0, 1).is_ok());
        assert!(PageRequest::new(3, MAX_PAGE_SIZE).is_ok());
        assert_eq!(PageRequest::new(3, 20).unwrap().offset(), 60);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(0, 20).unwrap();
        assert_eq!(Page::<()>::new(vec![], request, 0).total_pages, 0);
        assert_eq!(Page::<()>::new(vec![], request, 1).total_pages, 1);
        assert_eq!(Page::<()>::new(vec![], request, 20).total_pages, 1);
        assert_eq!(Page::<()>::new(vec![], request, 21).total_pages, 2);
    }
}
