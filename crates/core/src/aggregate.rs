// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bottom-up aggregation of attendance statistics over a merged org tree.
//!
//! Aggregates are **computed**, not stored. Each call is a pure function of
//! the node's subtree, and summation is order-independent over children.

use crate::merge::MergedNode;
use rollcall_domain::StatRecord;

/// Summed attendance statistics for a node and all of its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct AggregatedStats {
    /// Number of stats-bearing employees in the subtree.
    pub count: u32,
    /// Number of those employees currently checked in.
    pub online_count: u32,
    /// Summed worked minutes.
    pub total_worked: i64,
    /// Summed overtime minutes.
    pub total_overtime: i64,
    /// Summed missing minutes.
    pub total_missing: i64,
    /// Summed normal minutes for the current day.
    pub today_normal: i64,
    /// Summed overtime minutes for the current day.
    pub today_overtime: i64,
    /// Summed break minutes for the current day.
    pub today_break: i64,
    /// Summed monthly net balance (worked minus required minutes).
    pub monthly_deviation: i64,
}

impl AggregatedStats {
    /// Adds one employee's record to the totals. Absent counters read as
    /// zero.
    fn record(&mut self, stats: &StatRecord) {
        self.count += 1;
        if stats.is_online {
            self.online_count += 1;
        }
        self.total_worked += stats.worked_minutes();
        self.total_overtime += stats.overtime_minutes();
        self.total_missing += stats.missing_minutes();
        self.today_normal += stats.today_normal_minutes();
        self.today_overtime += stats.today_overtime_minutes();
        self.today_break += stats.today_break_minutes();
        self.monthly_deviation += stats.net_balance_minutes();
    }

    /// Adds another aggregate into this one, elementwise.
    fn absorb(&mut self, other: &Self) {
        self.count += other.count;
        self.online_count += other.online_count;
        self.total_worked += other.total_worked;
        self.total_overtime += other.total_overtime;
        self.total_missing += other.total_missing;
        self.today_normal += other.today_normal;
        self.today_overtime += other.today_overtime;
        self.today_break += other.today_break;
        self.monthly_deviation += other.monthly_deviation;
    }
}

/// Computes the aggregate statistics for a node's subtree.
///
/// The node contributes its own record only when it carries stats with a
/// non-empty employee id; every child subtree is then summed in. A node
/// with no stats and no children aggregates to all zeros.
#[must_use]
pub fn aggregate(node: &MergedNode) -> AggregatedStats {
    let mut totals: AggregatedStats = AggregatedStats::default();

    if let Some(stats) = &node.stats
        && stats.has_employee_id()
    {
        totals.record(stats);
    }

    for child in &node.children {
        totals.absorb(&aggregate(child));
    }

    totals
}

/// Computes the aggregate statistics across an entire forest.
#[must_use]
pub fn aggregate_forest(forest: &[MergedNode]) -> AggregatedStats {
    let mut totals: AggregatedStats = AggregatedStats::default();
    for root in forest {
        totals.absorb(&aggregate(root));
    }
    totals
}
