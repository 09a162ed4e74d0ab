// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::aggregate::{AggregatedStats, aggregate};
use crate::merge::MergedNode;
use crate::visibility::{ViewQuery, is_rendered};
use rollcall_domain::{NodeKind, StatRecord};
use std::collections::HashMap;

/// Per-node manual expand/collapse state.
///
/// Stored sparsely: a node without an entry uses its kind-based default
/// (groups with children start expanded, everything else collapsed).
/// Toggles survive snapshot refreshes, so a collapsed branch stays
/// collapsed when the period changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpandedState {
    toggles: HashMap<String, bool>,
}

impl ExpandedState {
    /// Creates an empty `ExpandedState` (all nodes at their defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn default_for(node: &MergedNode) -> bool {
        node.kind.is_group() && node.is_branch()
    }

    /// Returns whether a node is manually expanded.
    #[must_use]
    pub fn is_expanded(&self, node: &MergedNode) -> bool {
        self.toggles
            .get(&node.id)
            .copied()
            .unwrap_or_else(|| Self::default_for(node))
    }

    /// Flips the expansion state of the node with the given id.
    ///
    /// # Arguments
    ///
    /// * `forest` - The current merged forest, searched for the node
    /// * `node_id` - The id of the node to toggle
    ///
    /// # Returns
    ///
    /// The new expansion state of the node, or `None` if no node with
    /// that id exists in the forest.
    pub fn toggle(&mut self, forest: &[MergedNode], node_id: &str) -> Option<bool> {
        let node: &MergedNode = find_node(forest, node_id)?;
        let next: bool = !self.is_expanded(node);
        self.toggles.insert(node_id.to_string(), next);
        Some(next)
    }
}

fn find_node<'a>(forest: &'a [MergedNode], node_id: &str) -> Option<&'a MergedNode> {
    for node in forest {
        if node.id == node_id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, node_id) {
            return Some(found);
        }
    }
    None
}

/// Flat projection of a merged node for one rendered row.
///
/// Children are not carried; the renderer reconstructs nesting from row
/// order, `depth`, and `expanded`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RowNode {
    /// Node identifier.
    pub id: String,
    /// The node kind.
    pub kind: NodeKind,
    /// Display name.
    pub name: String,
    /// Job title. Absent for groups.
    pub title: Option<String>,
    /// The employee's statistics record, if present.
    pub stats: Option<StatRecord>,
}

/// One rendered row of the attendance tree, in paint order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VisibleRow {
    /// The node this row paints.
    pub node: RowNode,
    /// Nesting depth; roots are at depth zero.
    pub depth: u32,
    /// Subtree badge numbers. `Some` for groups and for any node with
    /// children; `None` for leaf employees, whose numbers come from
    /// `node.stats` directly.
    pub aggregates: Option<AggregatedStats>,
    /// Whether this row's children follow it in the list.
    pub expanded: bool,
    /// Number of direct children, rendered or not.
    pub child_count: u32,
}

/// Computes the ordered list of rendered rows for a merged forest.
///
/// Depth-first preorder over the rendered nodes, descending only into
/// expanded branches. While the query is active every rendered branch is
/// force-expanded, overriding manual collapse state; otherwise expansion
/// follows `expanded`.
#[must_use]
pub fn compute_visible_rows(
    forest: &[MergedNode],
    expanded: &ExpandedState,
    query: &ViewQuery,
    stats_loaded: bool,
) -> Vec<VisibleRow> {
    let ctx: RowCtx<'_> = RowCtx {
        expanded,
        query,
        stats_loaded,
    };
    let mut rows: Vec<VisibleRow> = Vec::new();
    for root in forest {
        push_rows(root, 0, ctx, &mut rows);
    }
    rows
}

#[derive(Clone, Copy)]
struct RowCtx<'a> {
    expanded: &'a ExpandedState,
    query: &'a ViewQuery,
    stats_loaded: bool,
}

fn push_rows(node: &MergedNode, depth: u32, ctx: RowCtx<'_>, rows: &mut Vec<VisibleRow>) {
    if !is_rendered(node, ctx.query, ctx.stats_loaded) {
        return;
    }

    let show_children: bool =
        node.is_branch() && (ctx.query.is_active() || ctx.expanded.is_expanded(node));
    let aggregates: Option<AggregatedStats> =
        (node.kind.is_group() || node.is_branch()).then(|| aggregate(node));

    rows.push(VisibleRow {
        node: RowNode {
            id: node.id.clone(),
            kind: node.kind,
            name: node.name.clone(),
            title: node.title.clone(),
            stats: node.stats.clone(),
        },
        depth,
        aggregates,
        expanded: show_children,
        child_count: u32::try_from(node.children.len()).unwrap_or(u32::MAX),
    });

    if show_children {
        for child in &node.children {
            push_rows(child, depth + 1, ctx, rows);
        }
    }
}
