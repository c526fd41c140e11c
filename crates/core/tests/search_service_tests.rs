//! Integration tests for the search orchestration
//!
//! These tests drive `SearchService` end to end through a scripted document
//! store and an in-memory item service:
//! - blank keys never reach the store
//! - primary query shape (pagination, projection, sort, aggregations)
//! - category/brand facet resolution and degradation
//! - the two-phase specification facet protocol

mod common;

use common::*;
use serde_json::json;
use shopfacet_core::{
    engine::{Aggregation, Aggregations, Query, SearchResponse, SourceFilter},
    SearchRequest, ShopfacetError, SpecFacet,
};
use std::sync::Arc;

fn phone_items() -> Arc<FakeItemService> {
    Arc::new(
        FakeItemService::default()
            .with_category(76, "phones")
            .with_category(75, "tablets")
            .with_brand(8557, "huawei")
            .with_brand(18374, "xiaomi")
            .with_schema(76, PHONE_SCHEMA),
    )
}

#[tokio::test]
async fn test_blank_key_skips_store() {
    let store = ScriptedStore::new(vec![]);
    let service = service(store.clone(), phone_items());

    for request in [
        SearchRequest::new(""),
        SearchRequest::new("   ").with_page(3),
        SearchRequest::new("").with_sort("price", true).with_page(-1),
    ] {
        assert!(service.search(&request).await.unwrap().is_none());
    }
    assert!(store.requests().is_empty());
}

#[tokio::test]
async fn test_primary_query_shape() {
    let store = ScriptedStore::new(vec![Scripted::Respond(primary_response(
        0,
        vec![],
        &[],
        &[],
    ))]);
    let service = service(store.clone(), phone_items());

    let request = SearchRequest::new("huawei phone")
        .with_page(3)
        .with_sort("price", true);
    let result = service.search(&request).await.unwrap().unwrap();
    assert_eq!(result.total, 0);
    assert_eq!(result.total_pages, 0);

    let requests = store.requests();
    assert_eq!(requests.len(), 1);

    let body = requests[0].to_json();
    assert_eq!(
        body["query"],
        json!({"match": {"all": {"query": "huawei phone", "operator": "and"}}})
    );
    assert_eq!(body["from"], json!(40));
    assert_eq!(body["size"], json!(20));
    assert_eq!(
        body["_source"],
        json!({"includes": ["id", "skus", "subTitle"]})
    );
    assert_eq!(body["sort"], json!([{"price": {"order": "desc"}}]));
    assert_eq!(body["aggs"]["category"], json!({"terms": {"field": "cid3"}}));
    assert_eq!(body["aggs"]["brand"], json!({"terms": {"field": "brandId"}}));
}

#[tokio::test]
async fn test_default_page_and_no_sort() {
    let store = ScriptedStore::new(vec![Scripted::Respond(primary_response(
        0,
        vec![],
        &[],
        &[],
    ))]);
    let service = service(store.clone(), phone_items());

    service.search(&SearchRequest::new("phone")).await.unwrap();

    let source = &store.requests()[0];
    assert_eq!(source.from, 0);
    assert!(source.sort.is_none());
}

#[tokio::test]
async fn test_multiple_categories_skip_spec_facets() {
    let store = ScriptedStore::new(vec![Scripted::Respond(primary_response(
        45,
        vec![goods(1), goods(2)],
        &[76, 75],
        &[8557, 18374, 999],
    ))]);
    let items = phone_items();
    let service = service(store.clone(), items.clone());

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.total, 45);
    assert_eq!(result.total_pages, 3);
    assert_eq!(result.items.len(), 2);
    let names: Vec<&str> = result.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["phones", "tablets"]);

    // brand 999 is unknown to the item service and simply absent
    let mut brand_ids: Vec<i64> = result.brands.iter().map(|b| b.id).collect();
    brand_ids.sort();
    assert_eq!(brand_ids, vec![8557, 18374]);

    assert!(result.specs.is_empty());
    assert_eq!(store.requests().len(), 1);
    assert_eq!(items.schema_calls(), 0);
}

#[tokio::test]
async fn test_single_category_builds_numeric_and_text_facets() {
    let facet_aggregations = Aggregations::new()
        .with("weight", histogram(&[0.0, 10.0, 50.0]))
        .with("color", terms(&["black", "white", "gold"]));

    let store = ScriptedStore::new(vec![
        Scripted::Respond(primary_response(3, vec![goods(1)], &[76], &[8557])),
        Scripted::Respond(stats_response(&[("weight", 0.0, 60.0, 42.0, 3)])),
        Scripted::Respond(SearchResponse {
            aggregations: facet_aggregations,
            ..Default::default()
        }),
    ]);
    let service = service(store.clone(), phone_items());

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        result.specs,
        vec![
            SpecFacet::numeric(
                "weight",
                Some("kg".to_string()),
                vec!["0-10".to_string(), "10-20".to_string(), "50-60".to_string()]
            ),
            SpecFacet::text(
                "color",
                vec!["black".to_string(), "white".to_string(), "gold".to_string()]
            ),
        ]
    );

    let requests = store.requests();
    assert_eq!(requests.len(), 3);

    // phase one: category filter only, no documents, stats per numeric key
    let stats = &requests[1];
    assert_eq!(stats.query, Query::term("cid3", 76));
    assert_eq!(stats.size, 0);
    assert_eq!(stats.source, SourceFilter::Disabled);
    assert_eq!(
        stats.aggregations.get("weight"),
        Some(&Aggregation::stats("specs.weight"))
    );
    assert!(!stats.aggregations.contains_key("release year"));

    // phase two: the base query with histogram and keyword terms
    let facets = &requests[2];
    assert_eq!(facets.query, Query::match_all_terms("all", "phone"));
    assert_eq!(
        facets.aggregations.get("weight"),
        Some(&Aggregation::histogram("specs.weight", 10.0, 1))
    );
    assert_eq!(
        facets.aggregations.get("color"),
        Some(&Aggregation::terms("specs.color.keyword"))
    );
}

#[tokio::test]
async fn test_numeric_labels_reproduce_interval() {
    let store = ScriptedStore::new(vec![
        Scripted::Respond(primary_response(3, vec![goods(1)], &[76], &[])),
        Scripted::Respond(stats_response(&[("weight", 0.0, 5.0, 2.5, 4)])),
        Scripted::Respond(SearchResponse {
            aggregations: Aggregations::new().with("weight", histogram(&[0.0, 0.8, 1.6, 4.0])),
            ..Default::default()
        }),
    ]);
    let service = service(store.clone(), phone_items());

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    let weight = &result.specs[0];
    assert_eq!(weight.options, vec!["0.0-0.8", "0.8-1.6", "1.6-2.4", "4.0-4.8"]);
    for label in &weight.options {
        let (begin, end) = label.split_once('-').unwrap();
        let width = end.parse::<f64>().unwrap() - begin.parse::<f64>().unwrap();
        assert!((width - 0.8).abs() < 1e-9, "label {}", label);
    }
}

#[tokio::test]
async fn test_equal_bounds_yield_single_option_when_hits_carry_it() {
    let store = ScriptedStore::new(vec![
        Scripted::Respond(primary_response(2, vec![goods(1)], &[76], &[])),
        Scripted::Respond(stats_response(&[("weight", 5.0, 5.0, 10.0, 2)])),
        Scripted::Respond(SearchResponse {
            aggregations: Aggregations::new()
                .with("weight", histogram(&[5.0]))
                .with("color", terms(&["red"])),
            ..Default::default()
        }),
    ]);
    let service = service(store.clone(), phone_items());

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.specs[0].options, vec!["5"]);

    // the single value is checked against the hits, not just the category
    let facets = &store.requests()[2];
    assert_eq!(facets.query, Query::match_all_terms("all", "phone"));
    assert_eq!(
        facets.aggregations.get("weight"),
        Some(&Aggregation::histogram("specs.weight", 1.0, 1))
    );
}

#[tokio::test]
async fn test_single_value_absent_from_hits_gives_no_option() {
    let store = ScriptedStore::new(vec![
        Scripted::Respond(primary_response(2, vec![goods(1)], &[76], &[])),
        Scripted::Respond(stats_response(&[("weight", 5.0, 5.0, 10.0, 2)])),
        Scripted::Respond(SearchResponse {
            aggregations: Aggregations::new().with("color", terms(&["red"])),
            ..Default::default()
        }),
    ]);
    let service = service(store, phone_items());

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.specs[0].key, "weight");
    assert!(result.specs[0].options.is_empty());
    assert_eq!(result.specs[1].options, vec!["red"]);
}

#[tokio::test]
async fn test_short_category_answer_skips_spec_facets() {
    let items = Arc::new(
        FakeItemService::default()
            .with_category(76, "phones")
            .with_schema(76, PHONE_SCHEMA)
            .truncating_categories(),
    );
    let store = ScriptedStore::new(vec![Scripted::Respond(primary_response(
        5,
        vec![goods(1)],
        &[76, 75],
        &[],
    ))]);
    let service = service(store.clone(), items.clone());

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert!(result.categories.is_empty());
    assert!(result.specs.is_empty());
    assert_eq!(store.requests().len(), 1);
    assert_eq!(items.schema_calls(), 0);
}

#[tokio::test]
async fn test_numeric_key_missing_from_stats_gets_empty_options() {
    let store = ScriptedStore::new(vec![
        Scripted::Respond(primary_response(2, vec![goods(1)], &[76], &[])),
        Scripted::Respond(stats_response(&[])),
        Scripted::Respond(SearchResponse {
            aggregations: Aggregations::new().with("color", terms(&["red"])),
            ..Default::default()
        }),
    ]);
    let service = service(store, phone_items());

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.specs.len(), 2);
    assert!(result.specs[0].options.is_empty());
    assert_eq!(result.specs[0].unit.as_deref(), Some("kg"));
    assert_eq!(result.specs[1].options, vec!["red"]);
}

#[tokio::test]
async fn test_missing_schema_keeps_primary_result() {
    let items = Arc::new(
        FakeItemService::default()
            .with_category(99, "cables")
            .with_brand(8557, "huawei"),
    );
    let store = ScriptedStore::new(vec![Scripted::Respond(primary_response(
        1,
        vec![goods(7)],
        &[99],
        &[8557],
    ))]);
    let service = service(store.clone(), items.clone());

    let result = service
        .search(&SearchRequest::new("cable"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.items.len(), 1);
    assert_eq!(result.categories.len(), 1);
    assert_eq!(result.brands.len(), 1);
    assert!(result.specs.is_empty());
    assert_eq!(items.schema_calls(), 1);
    assert_eq!(store.requests().len(), 1);
}

#[tokio::test]
async fn test_stats_phase_failure_degrades_spec_facets() {
    let store = ScriptedStore::new(vec![
        Scripted::Respond(primary_response(1, vec![goods(1)], &[76], &[])),
        Scripted::Fail("stats shard failure".to_string()),
    ]);
    let service = service(store.clone(), phone_items());

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.categories.len(), 1);
    assert!(result.specs.is_empty());
    assert_eq!(store.requests().len(), 2);
}

#[tokio::test]
async fn test_facet_phase_timeout_degrades_spec_facets() {
    let store = ScriptedStore::new(vec![
        Scripted::Respond(primary_response(1, vec![goods(1)], &[76], &[])),
        Scripted::Respond(stats_response(&[("weight", 0.0, 60.0, 42.0, 3)])),
        Scripted::Hang,
    ]);
    let service = service(store, phone_items());

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.items.len(), 1);
    assert!(result.specs.is_empty());
}

#[tokio::test]
async fn test_category_lookup_failure_degrades() {
    let items = Arc::new(
        FakeItemService::default()
            .with_brand(8557, "huawei")
            .with_schema(76, PHONE_SCHEMA)
            .failing_categories(),
    );
    let store = ScriptedStore::new(vec![Scripted::Respond(primary_response(
        1,
        vec![goods(1)],
        &[76],
        &[8557],
    ))]);
    let service = service(store.clone(), items);

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert!(result.categories.is_empty());
    assert_eq!(result.brands.len(), 1);
    // without a resolved category there are no specification facets
    assert!(result.specs.is_empty());
    assert_eq!(store.requests().len(), 1);
}

#[tokio::test]
async fn test_brand_lookup_failure_degrades() {
    let items = Arc::new(
        FakeItemService::default()
            .with_category(76, "phones")
            .with_category(75, "tablets")
            .failing_brands(),
    );
    let store = ScriptedStore::new(vec![Scripted::Respond(primary_response(
        1,
        vec![goods(1)],
        &[76, 75],
        &[8557],
    ))]);
    let service = service(store, items);

    let result = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.categories.len(), 2);
    assert!(result.brands.is_empty());
}

#[tokio::test]
async fn test_primary_failure_is_fatal() {
    let store = ScriptedStore::new(vec![Scripted::Fail("index not found".to_string())]);
    let service = service(store, phone_items());

    let err = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShopfacetError::Engine { .. }));
}

#[tokio::test]
async fn test_primary_timeout_is_fatal() {
    let store = ScriptedStore::new(vec![Scripted::Hang]);
    let service = service(store, phone_items());

    let err = service
        .search(&SearchRequest::new("phone"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShopfacetError::Timeout { .. }));
}

#[tokio::test]
async fn test_filters_carry_into_facet_phase() {
    let store = ScriptedStore::new(vec![
        Scripted::Respond(primary_response(1, vec![goods(1)], &[76], &[])),
        Scripted::Respond(stats_response(&[("weight", 0.0, 60.0, 42.0, 3)])),
        Scripted::Respond(SearchResponse::default()),
    ]);
    let service = service(store.clone(), phone_items());

    let request = SearchRequest::new("phone").with_filter("color", "black");
    service.search(&request).await.unwrap();

    let requests = store.requests();
    let expected = Query::Bool {
        must: vec![Query::match_all_terms("all", "phone")],
        filter: vec![Query::term("specs.color.keyword", "black")],
    };
    assert_eq!(requests[0].query, expected);
    assert_eq!(requests[2].query, expected);
    // phase one stays scoped to the category alone
    assert_eq!(requests[1].query, Query::term("cid3", 76));
}
