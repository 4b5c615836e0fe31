//! Tag slug normalization.
//!
//! Tags are displayed with their canonical capitalization ("SwiftUI",
//! "Concurrency") but travel through URLs as lowercase kebab-case slugs.
//! `slug_to_tag` is a lossy, best-effort inverse of `tag_to_slug`: it
//! consults a fixed exception table for names whose capitalization cannot
//! be recovered mechanically, and title-cases everything else.

use std::sync::LazyLock;

use regex::Regex;

/// Display names that cannot be recovered by title-casing their slug.
const SLUG_DISPLAY_EXCEPTIONS: &[(&str, &str)] = &[
    ("swiftui", "SwiftUI"),
    ("swiftdata", "SwiftData"),
    ("ios", "iOS"),
    ("ipados", "iPadOS"),
    ("macos", "macOS"),
    ("watchos", "watchOS"),
    ("tvos", "tvOS"),
    ("visionos", "visionOS"),
    ("uikit", "UIKit"),
    ("arkit", "ARKit"),
    ("xcode", "Xcode"),
    ("api", "API"),
    ("wwdc", "WWDC"),
];

/// Grammar for admin-created tag slugs.
static TAG_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // the pattern is a string literal
    Regex::new(r"^[a-z0-9-]+$").unwrap()
});

/// Convert a tag display name into a URL slug.
///
/// Lowercases, trims, collapses whitespace runs into single hyphens, and
/// strips anything that is not an ASCII letter, digit, or hyphen. Only
/// whitespace runs collapse: hyphens already present in the input pass
/// through untouched, so `"a--b"` stays `"a--b"`.
pub fn tag_to_slug(tag: &str) -> String {
    let lowered = tag.trim().to_lowercase();
    let hyphenated = lowered.split_whitespace().collect::<Vec<_>>().join("-");

    hyphenated
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Recover a display name from a URL slug.
///
/// Exact matches in the exception table win; otherwise each
/// hyphen-separated token is title-cased and the tokens are joined with
/// spaces. Not guaranteed to round-trip with [`tag_to_slug`].
pub fn slug_to_tag(slug: &str) -> String {
    if let Some((_, display)) = SLUG_DISPLAY_EXCEPTIONS
        .iter()
        .find(|(s, _)| *s == slug)
    {
        return (*display).to_string();
    }

    slug.split('-')
        .filter(|token| !token.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a tag for storage: trim surrounding whitespace only.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_string()
}

/// Check a slug against the admin tag-creation grammar `^[a-z0-9-]+$`.
pub fn is_valid_tag_slug(slug: &str) -> bool {
    TAG_SLUG_RE.is_match(slug)
}

/// Uppercase the first character of a token, leaving the rest as-is.
fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
