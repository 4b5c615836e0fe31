//! Shared route helpers.

use sha2::{Digest, Sha256};

use crate::config::MAX_PAGE_SIZE;

/// Coerce a `page` query value to a positive 1-based page number.
///
/// Page numbers arrive from URL query strings; absent, zero, or negative
/// values all mean page 1. The paginator itself assumes the result.
pub fn coerce_page(page: Option<i64>) -> usize {
    match page {
        Some(p) if p > 0 => p as usize,
        _ => 1,
    }
}

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`, falling back to
/// the configured default when absent or non-positive.
pub fn clamp_page_size(per_page: Option<i64>, default: usize) -> usize {
    match per_page {
        Some(p) if p > 0 => (p as usize).min(MAX_PAGE_SIZE),
        _ => default.clamp(1, MAX_PAGE_SIZE),
    }
}

/// Weak ETag for a list response, derived from the filter identity and
/// the page window. Stale clients re-requesting the same parameter
/// string get the same tag.
pub fn list_etag(identity: &str, page: usize, per_page: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    hasher.update(page.to_le_bytes());
    hasher.update(per_page.to_le_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("W/\"{}\"", &digest[..16])
}
