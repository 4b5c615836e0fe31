//! Integration tests for slug normalization.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use segue_kernel::content::{is_valid_tag_slug, normalize_tag, slug_to_tag, tag_to_slug};

#[test]
fn slugs_are_always_lowercase_kebab() {
    let inputs = [
        "SwiftUI",
        "Core Data",
        "What's New in iOS 18?",
        "  Grand   Central   Dispatch  ",
        "C++ & Objective-C Interop",
    ];

    for input in inputs {
        let slug = tag_to_slug(input);
        assert!(
            slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "unexpected characters in {slug:?}"
        );
        assert!(!slug.is_empty(), "empty slug for {input:?}");
    }
}

#[test]
fn exception_table_beats_title_casing() {
    assert_eq!(slug_to_tag("swiftui"), "SwiftUI");
    assert_eq!(slug_to_tag("ios"), "iOS");
    assert_eq!(slug_to_tag("unknown-tag"), "Unknown Tag");
}

#[test]
fn round_trip_is_best_effort_not_exact() {
    // "SwiftUI" survives via the exception table...
    assert_eq!(slug_to_tag(&tag_to_slug("SwiftUI")), "SwiftUI");
    // ...but arbitrary capitalization does not.
    assert_eq!(slug_to_tag(&tag_to_slug("gRPC Basics")), "Grpc Basics");
}

#[test]
fn normalize_only_trims() {
    assert_eq!(normalize_tag("  Swift Concurrency "), "Swift Concurrency");
}

#[test]
fn admin_slug_grammar_matches_contract() {
    assert!(is_valid_tag_slug("swift-concurrency"));
    assert!(!is_valid_tag_slug("Swift-Concurrency"));
    assert!(!is_valid_tag_slug("swift concurrency"));
    assert!(!is_valid_tag_slug(""));
}
