// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::merge::{MergedNode, merge_forest};
use crate::rows::{ExpandedState, VisibleRow, compute_visible_rows};
use crate::visibility::ViewQuery;
use rollcall_domain::{HierarchyNode, ReportingPeriod, StatRecord};
use time::OffsetDateTime;

/// Token identifying one refresh cycle.
///
/// Handed out by [`SnapshotStore::begin_refresh`]; a fetched response can
/// only be applied under the token of the newest refresh. Responses from
/// superseded refreshes are rejected, so a slow fetch can never overwrite
/// data for a period the user has already navigated away from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    generation: u64,
    period: ReportingPeriod,
    department: Option<String>,
}

impl RefreshToken {
    /// Returns the refresh generation this token belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the reporting period this refresh is fetching.
    #[must_use]
    pub const fn period(&self) -> ReportingPeriod {
        self.period
    }

    /// Returns the department filter for this refresh, if any.
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }
}

/// The latest successfully fetched attendance snapshot.
///
/// Holds the merged org forest, the expansion state, and refresh
/// bookkeeping. Applying a response is atomic: a stale or failed refresh
/// leaves the previous snapshot fully intact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnapshotStore {
    latest_generation: u64,
    period: Option<ReportingPeriod>,
    department: Option<String>,
    forest: Vec<MergedNode>,
    expanded: ExpandedState,
    stats_loaded: bool,
    stat_count: usize,
    fetched_at: Option<OffsetDateTime>,
}

impl SnapshotStore {
    /// Creates an empty store with no data applied.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new refresh cycle, superseding all earlier ones.
    ///
    /// The store itself is not modified beyond the generation counter;
    /// the period and department are committed only when the matching
    /// response is applied.
    pub fn begin_refresh(
        &mut self,
        period: ReportingPeriod,
        department: Option<String>,
    ) -> RefreshToken {
        self.latest_generation += 1;
        RefreshToken {
            generation: self.latest_generation,
            period,
            department,
        }
    }

    /// Applies a fetched statistics + hierarchy response pair.
    ///
    /// Rebuilds the merged forest and marks statistics as loaded. Manual
    /// expansion toggles are preserved across refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleGeneration`] without touching any state
    /// if a newer refresh has been started since `token` was issued.
    pub fn apply(
        &mut self,
        token: &RefreshToken,
        stats: &[StatRecord],
        hierarchy: &[HierarchyNode],
    ) -> Result<(), CoreError> {
        if token.generation != self.latest_generation {
            return Err(CoreError::StaleGeneration {
                latest: self.latest_generation,
                got: token.generation,
            });
        }

        self.forest = merge_forest(hierarchy, stats);
        self.period = Some(token.period);
        self.department = token.department.clone();
        self.stats_loaded = true;
        self.stat_count = stats.len();
        self.fetched_at = Some(OffsetDateTime::now_utc());
        Ok(())
    }

    /// Computes the rendered rows for the current snapshot and query.
    #[must_use]
    pub fn visible_rows(&self, query: &ViewQuery) -> Vec<VisibleRow> {
        compute_visible_rows(&self.forest, &self.expanded, query, self.stats_loaded)
    }

    /// Flips the expansion state of a node in the current tree.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownNode`] if the id is not in the tree.
    pub fn toggle_expanded(&mut self, node_id: &str) -> Result<bool, CoreError> {
        self.expanded
            .toggle(&self.forest, node_id)
            .ok_or_else(|| CoreError::UnknownNode {
                node_id: node_id.to_string(),
            })
    }

    /// Returns the merged forest of the current snapshot.
    #[must_use]
    pub fn forest(&self) -> &[MergedNode] {
        &self.forest
    }

    /// Returns whether a statistics response has ever been applied.
    ///
    /// Distinct from "the statistics list is empty": a confirmed empty
    /// list still counts as loaded.
    #[must_use]
    pub const fn stats_loaded(&self) -> bool {
        self.stats_loaded
    }

    /// Returns the reporting period of the applied snapshot, if any.
    #[must_use]
    pub const fn period(&self) -> Option<ReportingPeriod> {
        self.period
    }

    /// Returns the department filter of the applied snapshot, if any.
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Returns the number of statistics records in the applied snapshot.
    #[must_use]
    pub const fn stat_count(&self) -> usize {
        self.stat_count
    }

    /// Returns when the current snapshot was applied, if ever.
    #[must_use]
    pub const fn fetched_at(&self) -> Option<OffsetDateTime> {
        self.fetched_at
    }

    /// Returns the newest refresh generation handed out.
    #[must_use]
    pub const fn latest_generation(&self) -> u64 {
        self.latest_generation
    }
}
