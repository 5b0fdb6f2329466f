//! Property-Based Testing Generators
//!
//! Proptest strategies for datasets, filters and sort orders. Generated
//! text stays ASCII so case folding agrees between Rust and PostgreSQL.

use chrono::{Datelike, Months, NaiveDate};
use domain_policy::{
    PageRequest, SeedData, SortDirection, SortField, TermFilter, TermQuery, TermSort,
    MAX_PAGE_SIZE,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::TestDatasetBuilder;

/// Insured names, mixed case on purpose
pub const INSURED_NAMES: [&str; 6] = [
    "Ava Garcia",
    "Liam Chen Holdings",
    "maya patel",
    "Noah KIM Foods",
    "Harper Lopez",
    "Ethan Walker Group",
];

/// State codes, including one stored in lower case
pub const GENERATED_STATES: [&str; 5] = ["CA", "TX", "NY", "FL", "wa"];

/// Statuses, including one stored in mixed case
pub const GENERATED_STATUSES: [&str; 5] = ["ACTIVE", "EXPIRED", "CANCELLED", "NON_RENEWED", "Active"];

const BASE_YEAR: i32 = 2022;

fn first_of_month(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(BASE_YEAR, 1, 1)
        .and_then(|d| d.checked_add_months(Months::new(offset)))
        .expect("generated date out of range")
}

/// Strategy for a balance due with two fractional digits
pub fn balance_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..200_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for an expiry bound inside the generated date range
pub fn expiry_bound_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u32..60, 0u32..28).prop_map(|(months, day)| {
        first_of_month(months)
            .with_day0(day)
            .expect("day is within every month")
    })
}

/// Strategy for one generated term: state, status, balance
fn term_spec_strategy() -> impl Strategy<Value = (&'static str, &'static str, Decimal)> {
    (
        prop::sample::select(GENERATED_STATES.to_vec()),
        prop::sample::select(GENERATED_STATUSES.to_vec()),
        balance_strategy(),
    )
}

/// Strategy for a whole dataset of up to `max_policies` policies
///
/// Policies get sequential numbers and one to three consecutive twelve
/// month terms starting on the first of a month.
pub fn dataset_strategy(max_policies: usize) -> impl Strategy<Value = SeedData> {
    let policy = (
        prop::sample::select(INSURED_NAMES.to_vec()),
        0u32..24,
        prop::collection::vec(term_spec_strategy(), 1..=3),
    );
    prop::collection::vec(policy, 0..=max_policies).prop_map(|policies| {
        let mut builder = TestDatasetBuilder::new();
        for (index, (name, start_offset, terms)) in policies.into_iter().enumerate() {
            builder = builder.policy(&format!("OH-{:06}", index + 1), name);
            for (n, (state, status, balance)) in terms.into_iter().enumerate() {
                let from = first_of_month(start_offset + 12 * n as u32);
                builder = builder.term_with(|t| {
                    t.state(state)
                        .status(status)
                        .starting(from)
                        .balance_due(balance)
                });
            }
        }
        builder.build()
    })
}

/// Strategy for filters, each field independently present or absent
pub fn term_filter_strategy() -> impl Strategy<Value = TermFilter> {
    let query = prop::option::of(prop::sample::select(vec![
        "oh-00000", "GARCIA", "holdings", "  kim ", "walker", "x%_", "",
    ]));
    let state = prop::option::of(prop::sample::select(vec!["ca", "WA", "ny", " tx ", "ZZ"]));
    let status = prop::option::of(prop::sample::select(vec![
        "active", "EXPIRED", "non_renewed", "Cancelled",
    ]));
    (
        query,
        state,
        status,
        prop::option::of(expiry_bound_strategy()),
        prop::option::of(expiry_bound_strategy()),
    )
        .prop_map(|(query, state, status, expires_from, expires_to)| TermFilter {
            query: query.map(str::to_string),
            state: state.map(str::to_string),
            status: status.map(str::to_string),
            expires_from,
            expires_to,
        })
}

/// Strategy for every sort field in both directions
pub fn term_sort_strategy() -> impl Strategy<Value = TermSort> {
    (
        prop::sample::select(SortField::ALL.to_vec()),
        prop::bool::ANY,
    )
        .prop_map(|(field, descending)| {
            let direction = if descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            TermSort::new(field, direction)
        })
}

/// Strategy for a valid page request with small pages
pub fn page_request_strategy() -> impl Strategy<Value = PageRequest> {
    (0u32..6, 1u32..=8).prop_map(|(page, size)| {
        PageRequest::new(page, size.min(MAX_PAGE_SIZE)).expect("size within bounds")
    })
}

/// Strategy for a complete query
pub fn term_query_strategy() -> impl Strategy<Value = TermQuery> {
    (
        term_filter_strategy(),
        term_sort_strategy(),
        page_request_strategy(),
    )
        .prop_map(|(filter, sort, page)| TermQuery::new(filter, sort, page))
}
