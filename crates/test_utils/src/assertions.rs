//! Custom Test Assertions
//!
//! Assertions over search results that report the offending rows.

use std::cmp::Ordering;

use domain_policy::search::matches_all;
use domain_policy::{Page, PageRequest, TermPredicate, TermSort, TermWithPolicy};

/// Asserts the paging metadata of `page` against the request and total
///
/// # Panics
///
/// Panics if any field disagrees or the item count is not what the total
/// implies for this page
pub fn assert_page_shape<T>(page: &Page<T>, request: PageRequest, expected_total: u64) {
    assert_eq!(page.page, request.page(), "page index");
    assert_eq!(page.size, request.size(), "page size");
    assert_eq!(page.total_elements, expected_total, "total elements");

    let expected_pages = expected_total.div_ceil(u64::from(request.size()));
    assert_eq!(page.total_pages, expected_pages, "total pages");

    let remaining = expected_total.saturating_sub(request.offset());
    let expected_items = remaining.min(u64::from(request.size()));
    assert_eq!(
        page.items.len() as u64,
        expected_items,
        "items on page {} of size {}",
        request.page(),
        request.size()
    );
}

/// Asserts that `rows` are in the total order `sort` defines
///
/// # Panics
///
/// Panics at the first adjacent pair that is out of order
pub fn assert_sorted_by(rows: &[TermWithPolicy], sort: TermSort) {
    for pair in rows.windows(2) {
        assert_ne!(
            sort.compare(&pair[0], &pair[1]),
            Ordering::Greater,
            "rows out of order for {} {:?}: {} #{} before {} #{}",
            sort.field,
            sort.direction,
            pair[0].policy.policy_number,
            pair[0].term.term_number,
            pair[1].policy.policy_number,
            pair[1].term.term_number
        );
    }
}

/// Asserts that every row satisfies every predicate
///
/// # Panics
///
/// Panics on the first row that fails
pub fn assert_all_match(rows: &[TermWithPolicy], predicates: &[TermPredicate]) {
    for row in rows {
        assert!(
            matches_all(predicates, &row.term, &row.policy),
            "row {} #{} does not match {:?}",
            row.policy.policy_number,
            row.term.term_number,
            predicates
        );
    }
}

/// Asserts that two pages hold the same rows in the same order
///
/// # Panics
///
/// Panics if the metadata or the term ids differ
pub fn assert_same_page(actual: &Page<TermWithPolicy>, expected: &Page<TermWithPolicy>) {
    assert_eq!(actual.total_elements, expected.total_elements, "total elements");
    assert_eq!(actual.total_pages, expected.total_pages, "total pages");
    let actual_ids: Vec<_> = actual.items.iter().map(|r| r.term.id).collect();
    let expected_ids: Vec<_> = expected.items.iter().map(|r| r.term.id).collect();
    assert_eq!(actual_ids, expected_ids, "term ids on page");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::DatasetFixtures;
    use domain_policy::search::execute_in_memory;
    use domain_policy::{SortDirection, SortField, TermQuery};

    #[test]
    fn test_in_memory_page_passes_shape_and_order() {
        let sort = TermSort::new(SortField::InsuredName, SortDirection::Descending);
        let request = PageRequest::new(1, 4).unwrap();
        let query = TermQuery::new(Default::default(), sort, request);

        let page = execute_in_memory(DatasetFixtures::small_joined(), &query);

        assert_page_shape(&page, request, DatasetFixtures::TERM_COUNT as u64);
        assert_sorted_by(&page.items, sort);
    }

    #[test]
    #[should_panic(expected = "rows out of order")]
    fn test_unsorted_rows_fail() {
        let mut rows = DatasetFixtures::small_joined();
        rows.reverse();
        assert_sorted_by(&rows, TermSort::new(SortField::PolicyNumber, SortDirection::Ascending));
    }
}
