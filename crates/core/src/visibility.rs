// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Render-decision logic for the attendance tree.
//!
//! Decides, per merged node, whether the node is visible given a free-text
//! search term and a status filter. All functions here are pure; the same
//! tree and query always yield the same decisions.

use crate::merge::MergedNode;
use rollcall_domain::{FilterStatus, StatRecord};

/// A search term plus status filter, as selected in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewQuery {
    /// Free-text search term, matched case-insensitively against node
    /// name and title. Empty means no text filtering.
    pub search_term: String,
    /// The status category filter.
    pub status: FilterStatus,
}

impl ViewQuery {
    /// Creates a new `ViewQuery`.
    #[must_use]
    pub fn new(search_term: impl Into<String>, status: FilterStatus) -> Self {
        Self {
            search_term: search_term.into(),
            status,
        }
    }

    /// Returns whether any filtering is in effect.
    ///
    /// Active filtering changes two behaviors: non-matching subtrees are
    /// pruned, and every rendered branch is force-expanded so matches are
    /// never hidden behind a collapsed node.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || self.status != FilterStatus::All
    }
}

fn matches_search(node: &MergedNode, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle: String = term.to_lowercase();
    node.name.to_lowercase().contains(&needle)
        || node
            .title
            .as_ref()
            .is_some_and(|title| title.to_lowercase().contains(&needle))
}

fn matches_status(stats: Option<&StatRecord>, status: FilterStatus) -> bool {
    match status {
        FilterStatus::All => true,
        FilterStatus::Online => stats.is_some_and(|s| s.is_online),
        FilterStatus::Overtime => stats.is_some_and(|s| s.overtime_minutes() > 0),
        FilterStatus::Missing => stats.is_some_and(|s| s.missing_minutes() > 0),
    }
}

/// A match that requires actual statistics data on the node.
///
/// Used for descendant matching: a node only pulls its ancestors into
/// view on the strength of real data, never via the loading fallback.
fn strict_self_match(node: &MergedNode, query: &ViewQuery) -> bool {
    matches_search(node, &query.search_term)
        && matches_status(node.stats.as_ref(), query.status)
        && node.stats.as_ref().is_some_and(StatRecord::has_employee_id)
}

/// Returns whether the node itself satisfies the query.
///
/// While `stats_loaded` is false (no statistics response has been applied
/// yet) the stats requirement is waived, so the org tree still renders
/// instead of a blank screen during the initial load.
#[must_use]
pub fn self_matches(node: &MergedNode, query: &ViewQuery, stats_loaded: bool) -> bool {
    matches_search(node, &query.search_term)
        && matches_status(node.stats.as_ref(), query.status)
        && (node.stats.as_ref().is_some_and(StatRecord::has_employee_id) || !stats_loaded)
}

/// Returns whether any node strictly below this one matches the query.
#[must_use]
pub fn has_matching_descendant(node: &MergedNode, query: &ViewQuery) -> bool {
    node.children
        .iter()
        .any(|child| strict_self_match(child, query) || has_matching_descendant(child, query))
}

/// Decides whether a node is rendered.
///
/// Group nodes have no self-match of their own: they render whenever
/// filtering is inactive, and only as ancestors of a match otherwise.
/// Employee nodes render when they match, or when filtering is active and
/// a descendant matches. Non-matching subtrees prune through arbitrarily
/// many levels.
#[must_use]
pub fn is_rendered(node: &MergedNode, query: &ViewQuery, stats_loaded: bool) -> bool {
    if node.kind.is_group() {
        return !query.is_active() || has_matching_descendant(node, query);
    }
    self_matches(node, query, stats_loaded)
        || (query.is_active() && has_matching_descendant(node, query))
}
