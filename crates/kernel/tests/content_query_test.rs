//! Integration tests for the content query layer.
//!
//! These exercise the mapper, filter engine, and paginator together
//! through the public library surface, the way the route layer composes
//! them: map stored rows into entities, filter and sort, then slice.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use segue_kernel::content::{
    ContentFilter, MappingError, filter_and_sort, map_post, map_posts, paginate,
};
use segue_kernel::models::PostRow;
use segue_test_utils::{code, document, heading, paragraph};
use uuid::Uuid;

fn row(slug: &str, kind: &str, published: bool, updated: i64, document: serde_json::Value) -> PostRow {
    PostRow {
        id: Uuid::now_v7(),
        slug: slug.to_string(),
        kind: kind.to_string(),
        published,
        deleted: false,
        created: updated - 1_000,
        updated,
        views: 0,
        likes: 0,
        author_id: Uuid::nil(),
        document,
    }
}

/// A small, mixed corpus: posts and tutorials, drafts and published.
fn corpus() -> Vec<PostRow> {
    vec![
        row(
            "swift-actors",
            "post",
            true,
            1_000,
            document("Swift Actors", "Isolation explained")
                .tag("Swift")
                .tag("Concurrency")
                .block(paragraph("Actors serialize access."))
                .block(code("swift", "actor Counter {}"))
                .build(),
        ),
        row(
            "swiftui-navigation",
            "tutorial",
            true,
            3_000,
            document("SwiftUI Navigation", "NavigationStack from scratch")
                .tag("SwiftUI")
                .level("beginner")
                .category("SwiftUI")
                .block(heading(2, "Getting started"))
                .build(),
        ),
        row(
            "draft-combine",
            "post",
            false,
            2_000,
            document("Combine Basics", "A draft about Swift's Combine")
                .tag("Combine")
                .build(),
        ),
        row(
            "kotlin-flows",
            "post",
            true,
            4_000,
            document("Kotlin Flows", "Not about Apple platforms at all").build(),
        ),
    ]
}

#[test]
fn map_filter_paginate_pipeline() {
    let rows = corpus();
    let items = map_posts(&rows).unwrap();
    assert_eq!(items.len(), 4);

    let filter = ContentFilter {
        search: Some("swift".to_string()),
        status: Some("published".to_string()),
        ..ContentFilter::default()
    };
    let matched = filter_and_sort(&items, &filter);

    // Two published items mention "swift"; the draft and Kotlin post don't pass.
    let slugs: Vec<_> = matched.iter().map(|i| i.slug.as_str()).collect();
    assert_eq!(slugs, vec!["swiftui-navigation", "swift-actors"]);

    let page = paginate(&matched, 1, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].slug, "swiftui-navigation");

    let beyond = paginate(&matched, 9, 1);
    assert!(beyond.items.is_empty());
}

#[test]
fn every_returned_item_satisfies_every_predicate() {
    let items = map_posts(&corpus()).unwrap();

    let filters = [
        ContentFilter {
            kind: Some("tutorial".to_string()),
            ..ContentFilter::default()
        },
        ContentFilter {
            tag: Some("Swift".to_string()),
            status: Some("published".to_string()),
            ..ContentFilter::default()
        },
        ContentFilter {
            level: Some("beginner".to_string()),
            search: Some("navigation".to_string()),
            ..ContentFilter::default()
        },
    ];

    for filter in filters {
        let out = filter_and_sort(&items, &filter);
        for item in &out {
            assert!(filter.matches(item));
            assert!(items.iter().any(|orig| orig.id == item.id));
        }
    }
}

#[test]
fn one_bad_block_fails_the_whole_record() {
    let bad = row(
        "broken",
        "post",
        true,
        1,
        serde_json::json!({
            "title": "Broken",
            "description": "has a bogus block",
            "blocks": [
                {"type": "paragraph", "text": "fine"},
                {"type": "carousel", "images": []}
            ]
        }),
    );

    let err = map_post(&bad).unwrap_err();
    assert_eq!(err, MappingError::UnknownBlockType("carousel".to_string()));

    // Batch mapping aborts rather than skipping the poisoned record.
    let mut rows = corpus();
    rows.push(bad);
    assert!(map_posts(&rows).is_err());
}

#[test]
fn defaults_flow_through_the_pipeline() {
    let rows = vec![row(
        "minimal",
        "post",
        true,
        1,
        document("Minimal", "nothing optional").build(),
    )];

    let items = map_posts(&rows).unwrap();
    assert_eq!(items[0].read_time, segue_kernel::content::DEFAULT_READ_TIME);
    assert!(items[0].tags.is_empty());
    assert!(items[0].blocks.is_empty());

    // An empty filter returns everything, newest first.
    let out = filter_and_sort(&items, &ContentFilter::default());
    assert_eq!(out.len(), 1);
}
