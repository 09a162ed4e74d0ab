// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall_domain::{HierarchyNode, NodeKind, StatRecord};

/// Builds a statistics record with every counter absent.
pub fn stat(employee_id: &str, employee_name: &str) -> StatRecord {
    StatRecord {
        employee_id: employee_id.to_string(),
        employee_name: employee_name.to_string(),
        department: None,
        job_title: None,
        is_online: false,
        total_worked: None,
        total_overtime: None,
        total_missing: None,
        monthly_net_balance: None,
        monthly_required: None,
        today_normal: None,
        today_overtime: None,
        today_break: None,
        total_late: None,
    }
}

/// Builds an employee hierarchy node.
pub fn employee(id: &str, name: &str, children: Vec<HierarchyNode>) -> HierarchyNode {
    HierarchyNode {
        id: id.to_string(),
        kind: NodeKind::Employee,
        name: name.to_string(),
        title: None,
        children,
    }
}

/// Builds an employee hierarchy node with a job title.
pub fn titled_employee(
    id: &str,
    name: &str,
    title: &str,
    children: Vec<HierarchyNode>,
) -> HierarchyNode {
    HierarchyNode {
        title: Some(title.to_string()),
        ..employee(id, name, children)
    }
}

/// Builds a group hierarchy node.
pub fn group(id: &str, name: &str, children: Vec<HierarchyNode>) -> HierarchyNode {
    HierarchyNode {
        id: id.to_string(),
        kind: NodeKind::Group,
        name: name.to_string(),
        title: None,
        children,
    }
}

/// The three-level scenario used across the suite: a Sales group over
/// manager Alice over subordinate Bob, where only Bob has overtime.
pub fn sales_hierarchy() -> Vec<HierarchyNode> {
    vec![group(
        "g-1",
        "Sales",
        vec![employee(
            "e-alice",
            "Alice",
            vec![employee("e-bob", "Bob", Vec::new())],
        )],
    )]
}

/// Statistics matching [`sales_hierarchy`]: Alice with zero overtime,
/// Bob with 120 minutes.
pub fn sales_stats() -> Vec<StatRecord> {
    vec![
        StatRecord {
            total_overtime: Some(0),
            ..stat("e-alice", "Alice")
        },
        StatRecord {
            total_overtime: Some(120),
            ..stat("e-bob", "Bob")
        },
    ]
}
