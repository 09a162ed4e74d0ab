// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall_domain::{HierarchyNode, NodeKind, StatRecord};
use std::collections::HashMap;

/// An org hierarchy node enriched with its statistics record.
///
/// Produced by [`merge_forest`]; the same shape as the input hierarchy with
/// `stats` attached wherever the statistics list has a record for the node
/// id. Group nodes never carry stats.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MergedNode {
    /// Node identifier, copied from the hierarchy.
    pub id: String,
    /// The node kind.
    pub kind: NodeKind,
    /// Display name.
    pub name: String,
    /// Job title. Absent for groups.
    pub title: Option<String>,
    /// The statistics record for this employee, if one exists for the
    /// reporting period. `None` is a valid "no data yet" state, not an
    /// error (e.g., an employee hired after the period started).
    pub stats: Option<StatRecord>,
    /// Merged subordinates or group members, in hierarchy order.
    pub children: Vec<MergedNode>,
}

impl MergedNode {
    /// Returns whether this node has any children.
    #[must_use]
    pub const fn is_branch(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Merges a flat statistics list onto an org hierarchy forest.
///
/// Builds an O(n) id lookup over the statistics list (last write wins on a
/// duplicate `employee_id`) and recursively copies the hierarchy, attaching
/// the matching record to each employee node. The inputs are not mutated.
///
/// # Arguments
///
/// * `hierarchy` - The org chart roots from the hierarchy endpoint
/// * `stats` - The per-employee records from the statistics endpoint
#[must_use]
pub fn merge_forest(hierarchy: &[HierarchyNode], stats: &[StatRecord]) -> Vec<MergedNode> {
    let lookup: HashMap<&str, &StatRecord> = stats
        .iter()
        .map(|record| (record.employee_id.as_str(), record))
        .collect();

    hierarchy
        .iter()
        .map(|node| merge_node(node, &lookup))
        .collect()
}

fn merge_node(node: &HierarchyNode, lookup: &HashMap<&str, &StatRecord>) -> MergedNode {
    let stats: Option<StatRecord> = if node.kind.is_group() {
        None
    } else {
        lookup.get(node.id.as_str()).map(|record| (*record).clone())
    };

    MergedNode {
        id: node.id.clone(),
        kind: node.kind,
        name: node.name.clone(),
        title: node.title.clone(),
        stats,
        children: node
            .children
            .iter()
            .map(|child| merge_node(child, lookup))
            .collect(),
    }
}
