//! PostgreSQL adapter integration tests
//!
//! Each test starts its own container, so these need Docker and are
//! ignored by default: `cargo test -p test_utils -- --ignored`.

use core_kernel::{HealthCheckable, PortError};
use domain_policy::{
    InMemoryPolicyTermPort, PageRequest, PolicyTermPort, SeedGenerator, SortDirection, SortField,
    TermFilter, TermQuery, TermSort,
};
use test_utils::{
    assert_all_match, assert_page_shape, assert_same_page, assert_sorted_by, db_test,
    DatasetFixtures, TemporalFixtures, TestDatasetBuilder,
};

fn queries() -> Vec<TermQuery> {
    let filters = vec![
        TermFilter::default(),
        TermFilter {
            query: Some("  GARCIA ".to_string()),
            ..Default::default()
        },
        TermFilter {
            state: Some("ny".to_string()),
            status: Some("Active".to_string()),
            ..Default::default()
        },
        TermFilter {
            query: Some("oh-0001".to_string()),
            expires_from: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
            expires_to: chrono::NaiveDate::from_ymd_opt(2025, 12, 31),
            ..Default::default()
        },
        TermFilter {
            query: Some("%".to_string()),
            ..Default::default()
        },
    ];

    let mut queries = Vec::new();
    for filter in filters {
        for field in SortField::ALL {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                for page in [0, 3] {
                    queries.push(TermQuery::new(
                        filter.clone(),
                        TermSort::new(field, direction),
                        PageRequest::new(page, 7).unwrap(),
                    ));
                }
            }
        }
    }
    queries
}

db_test!(test_search_matches_in_memory_engine, |db| {
    let data = SeedGenerator::new()
        .with_anchor(TemporalFixtures::seed_anchor())
        .generate()
        .unwrap();
    let adapter = db.adapter();
    adapter.replace_dataset(&data).await.unwrap();
    let memory = InMemoryPolicyTermPort::with_data(&data).await.unwrap();

    for query in queries() {
        let actual = adapter.search_terms(&query).await.unwrap();
        let expected = memory.search_terms(&query).await.unwrap();

        assert_same_page(&actual, &expected);
        assert_sorted_by(&actual.items, query.sort);
        assert_all_match(&actual.items, &query.predicates());
        assert_page_shape(&actual, query.page, expected.total_elements);
    }
});

db_test!(test_case_folding_matches_in_memory_engine, |db| {
    let data = TestDatasetBuilder::new()
        .policy("OH-000010", "ÉLODIE Dubois")
        .term("QC", "ACTIVE", TemporalFixtures::term_start())
        .policy("OH-000011", "Straße GmbH")
        .term("BY", "Active", TemporalFixtures::term_start())
        .build();
    let adapter = db.adapter();
    adapter.replace_dataset(&data).await.unwrap();
    let memory = InMemoryPolicyTermPort::with_data(&data).await.unwrap();

    for text in ["ÉLODIE", "élodie", "dubois", "STRASSE", "straße gmbh"] {
        let query = TermQuery::new(
            TermFilter {
                query: Some(text.to_string()),
                status: Some("ACTIVE".to_string()),
                ..Default::default()
            },
            TermSort::default(),
            PageRequest::default(),
        );
        let actual = adapter.search_terms(&query).await.unwrap();
        let expected = memory.search_terms(&query).await.unwrap();
        assert_same_page(&actual, &expected);
    }
});

db_test!(test_search_returns_joined_values, |db| {
    let adapter = db.adapter();
    adapter
        .replace_dataset(&DatasetFixtures::small())
        .await
        .unwrap();

    let row = adapter
        .get_term(DatasetFixtures::ava_current_term())
        .await
        .unwrap();
    let expected = DatasetFixtures::small_joined()
        .into_iter()
        .find(|r| r.term.id == DatasetFixtures::ava_current_term())
        .unwrap();

    assert_eq!(row, expected);
    assert_eq!(row.term.balance_due.scale(), 2);
});

db_test!(test_unknown_term_is_not_found, |db| {
    let adapter = db.adapter();
    adapter
        .replace_dataset(&DatasetFixtures::small())
        .await
        .unwrap();

    let err = adapter
        .get_term(DatasetFixtures::unknown_term())
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
});

db_test!(test_replace_dataset_is_idempotent, |db| {
    let adapter = db.adapter();
    let data = DatasetFixtures::small();

    let first = adapter.replace_dataset(&data).await.unwrap();
    let second = adapter.replace_dataset(&data).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.policies, DatasetFixtures::POLICY_COUNT);
    assert_eq!(first.terms, DatasetFixtures::TERM_COUNT);

    let page = adapter.search_terms(&TermQuery::default()).await.unwrap();
    assert_eq!(page.total_elements, DatasetFixtures::TERM_COUNT as u64);
});

db_test!(test_rejected_dataset_leaves_previous_data, |db| {
    let adapter = db.adapter();
    adapter
        .replace_dataset(&DatasetFixtures::small())
        .await
        .unwrap();

    let duplicate = TestDatasetBuilder::new()
        .policy("OH-000009", "First Holder")
        .term("CA", "ACTIVE", TemporalFixtures::term_start())
        .policy_with(
            test_utils::TestPolicyBuilder::new()
                .policy_number("OH-000009")
                .insured_name("Second Holder"),
        )
        .build();

    let err = adapter.replace_dataset(&duplicate).await.unwrap_err();
    assert!(matches!(err, PortError::Validation { .. } | PortError::Internal { .. }));

    let page = adapter.search_terms(&TermQuery::default()).await.unwrap();
    assert_eq!(page.total_elements, DatasetFixtures::TERM_COUNT as u64);
});

db_test!(test_clear_data_empties_tables, |db| {
    let adapter = db.adapter();
    adapter
        .replace_dataset(&DatasetFixtures::small())
        .await
        .unwrap();

    db.clear_data().await.unwrap();

    let page = adapter.search_terms(&TermQuery::default()).await.unwrap();
    assert_eq!(page.total_elements, 0);
    assert_eq!(page.total_pages, 0);
    assert!(page.items.is_empty());
});

db_test!(test_health_check_reports_healthy, |db| {
    let result = db.adapter().health_check().await;
    assert!(result.is_healthy(), "{:?}", result.message);
});
