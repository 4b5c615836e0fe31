//! In-memory filter/sort engine for content listings.
//!
//! Every list surface (public posts, tutorials, tag pages, admin lists)
//! funnels through [`filter_and_sort`]: a pure function from a slice of
//! mapped entities and a [`ContentFilter`] to a new, ordered vector. The
//! store may have pre-filtered by kind or publication state; the engine
//! re-applies every predicate so server-filtered and client-filtered call
//! sites agree on the result.

use regex::Regex;

use super::mapper::ContentItem;

/// Minimum search-term length for highlighting. Shorter terms still
/// filter (any non-empty term is a predicate) but are not highlighted.
pub const MIN_HIGHLIGHT_LEN: usize = 2;

/// Sort order for listings. Recency is the only implemented order;
/// unrecognized values from the `sort` query parameter fall back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
}

impl SortOrder {
    /// Parse the `sort` query parameter.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("newest") | Some("") | None => SortOrder::Newest,
            Some(_) => SortOrder::Newest,
        }
    }
}

/// Filter parameters bound from a listing URL. Absence means
/// "no constraint".
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    /// Case-insensitive substring match over title, description, and tags.
    pub search: Option<String>,
    /// `"published"` keeps published items; any other non-empty value
    /// keeps unpublished items; empty/absent applies no filter.
    pub status: Option<String>,
    /// Exact match against the item kind (`"post"` / `"tutorial"`).
    pub kind: Option<String>,
    /// Exact match against the tutorial level.
    pub level: Option<String>,
    /// Exact membership test against the item's tag set.
    pub tag: Option<String>,
    pub sort: SortOrder,
}

impl ContentFilter {
    /// True when an item satisfies every active predicate.
    pub fn matches(&self, item: &ContentItem) -> bool {
        if let Some(term) = active(&self.search) {
            if !matches_search(item, term) {
                return false;
            }
        }

        if let Some(status) = active(&self.status) {
            let want_published = status == "published";
            if item.published != want_published {
                return false;
            }
        }

        if let Some(kind) = active(&self.kind) {
            if item.kind != kind {
                return false;
            }
        }

        if let Some(level) = active(&self.level) {
            if item.level.as_deref() != Some(level) {
                return false;
            }
        }

        if let Some(tag) = active(&self.tag) {
            if !item.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        true
    }

    /// Concatenation of the active filter values, used by the route layer
    /// as a content-identity key for list responses.
    pub fn identity(&self) -> String {
        [&self.search, &self.status, &self.kind, &self.level, &self.tag]
            .into_iter()
            .filter_map(active)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Apply all active predicates and the sort order.
///
/// Returns a new vector; the input is never mutated. The sort is stable,
/// so items with equal recency keep their input order.
pub fn filter_and_sort(items: &[ContentItem], filter: &ContentFilter) -> Vec<ContentItem> {
    let mut out: Vec<ContentItem> = items
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect();

    match filter.sort {
        SortOrder::Newest => out.sort_by(|a, b| b.recency().cmp(&a.recency())),
    }

    out
}

/// Case-insensitive substring match over title, description, and tags.
pub fn matches_search(item: &ContentItem, term: &str) -> bool {
    let needle = term.to_lowercase();

    item.title.to_lowercase().contains(&needle)
        || item.description.to_lowercase().contains(&needle)
        || item
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Wrap case-insensitive occurrences of `term` in `<mark>` tags.
///
/// Terms shorter than [`MIN_HIGHLIGHT_LEN`] return the text unchanged.
pub fn highlight(text: &str, term: &str) -> String {
    let term = term.trim();
    if term.len() < MIN_HIGHLIGHT_LEN {
        return text.to_string();
    }

    let Ok(re) = Regex::new(&format!("(?i){}", regex::escape(term))) else {
        return text.to_string();
    };

    re.replace_all(text, "<mark>$0</mark>").into_owned()
}

/// Treat empty strings like absent parameters.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
