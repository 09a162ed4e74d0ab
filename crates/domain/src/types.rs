// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Per-employee attendance statistics for one reporting period.
///
/// One record per employee, fetched as a flat list from the statistics
/// endpoint. All minute counters are optional on the wire: an absent value
/// means "no data for the period" and reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Unique employee identifier. Matches a node id in the org hierarchy.
    pub employee_id: String,
    /// The employee's display name.
    #[serde(default)]
    pub employee_name: String,
    /// The employee's department, if assigned.
    #[serde(default)]
    pub department: Option<String>,
    /// The employee's job title, if assigned.
    #[serde(default)]
    pub job_title: Option<String>,
    /// Whether the employee is currently checked in.
    #[serde(default)]
    pub is_online: bool,
    /// Total minutes worked in the period.
    #[serde(default)]
    pub total_worked: Option<i64>,
    /// Total overtime minutes in the period.
    #[serde(default)]
    pub total_overtime: Option<i64>,
    /// Total missing (unaccounted) minutes in the period.
    #[serde(default)]
    pub total_missing: Option<i64>,
    /// Net balance of worked versus required minutes for the month.
    #[serde(default)]
    pub monthly_net_balance: Option<i64>,
    /// Required working minutes for the month.
    #[serde(default)]
    pub monthly_required: Option<i64>,
    /// Normal working minutes for the current day.
    #[serde(default)]
    pub today_normal: Option<i64>,
    /// Overtime minutes for the current day.
    #[serde(default)]
    pub today_overtime: Option<i64>,
    /// Break minutes for the current day.
    #[serde(default)]
    pub today_break: Option<i64>,
    /// Number of late arrivals in the period.
    #[serde(default)]
    pub total_late: Option<i64>,
}

impl StatRecord {
    /// Returns the total worked minutes, treating absent data as zero.
    #[must_use]
    pub fn worked_minutes(&self) -> i64 {
        self.total_worked.unwrap_or(0)
    }

    /// Returns the total overtime minutes, treating absent data as zero.
    #[must_use]
    pub fn overtime_minutes(&self) -> i64 {
        self.total_overtime.unwrap_or(0)
    }

    /// Returns the total missing minutes, treating absent data as zero.
    #[must_use]
    pub fn missing_minutes(&self) -> i64 {
        self.total_missing.unwrap_or(0)
    }

    /// Returns the monthly net balance, treating absent data as zero.
    #[must_use]
    pub fn net_balance_minutes(&self) -> i64 {
        self.monthly_net_balance.unwrap_or(0)
    }

    /// Returns today's normal minutes, treating absent data as zero.
    #[must_use]
    pub fn today_normal_minutes(&self) -> i64 {
        self.today_normal.unwrap_or(0)
    }

    /// Returns today's overtime minutes, treating absent data as zero.
    #[must_use]
    pub fn today_overtime_minutes(&self) -> i64 {
        self.today_overtime.unwrap_or(0)
    }

    /// Returns today's break minutes, treating absent data as zero.
    #[must_use]
    pub fn today_break_minutes(&self) -> i64 {
        self.today_break.unwrap_or(0)
    }

    /// Returns whether this record carries a usable employee identifier.
    ///
    /// Records with an empty id never contribute to aggregation or
    /// filtering. The backend should not produce them, but the wire
    /// contract does not forbid it.
    #[must_use]
    pub fn has_employee_id(&self) -> bool {
        !self.employee_id.is_empty()
    }
}

/// The kind of an org hierarchy node.
///
/// The hierarchy endpoint tags group nodes with `"type": "GROUP"` and
/// omits the tag entirely for employee nodes, so absence deserializes to
/// `Employee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NodeKind {
    /// A role or department header. Carries no personal statistics.
    #[serde(rename = "GROUP")]
    Group,
    /// An individual employee (or manager) node.
    #[default]
    #[serde(rename = "EMP")]
    Employee,
}

impl NodeKind {
    /// Returns whether this is a group node.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    /// Deserializes the wire `type` tag: `"GROUP"` is a group, anything
    /// else (including absence and unknown tags) is an employee.
    fn from_wire_tag<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag: Option<String> = Option::deserialize(deserializer)?;
        Ok(match tag.as_deref() {
            Some("GROUP") => Self::Group,
            _ => Self::Employee,
        })
    }
}

/// One node of the org chart, as returned by the hierarchy endpoint.
///
/// The endpoint returns a forest: an array of root nodes, each with
/// recursively nested subordinates or group members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Node identifier. For employee nodes this matches a
    /// [`StatRecord::employee_id`]; for group nodes it is an internal
    /// group id with no corresponding statistics record.
    pub id: String,
    /// The node kind (wire field `type`, absent for employees).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "NodeKind::from_wire_tag"
    )]
    pub kind: NodeKind,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Job title. Absent for groups.
    #[serde(default)]
    pub title: Option<String>,
    /// Subordinates or group members, in display order.
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

/// Status category filter applied to the attendance tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FilterStatus {
    /// No status filtering.
    #[default]
    #[serde(rename = "ALL")]
    All,
    /// Only employees currently checked in.
    #[serde(rename = "ONLINE")]
    Online,
    /// Only employees with overtime minutes in the period.
    #[serde(rename = "OVERTIME")]
    Overtime,
    /// Only employees with missing minutes in the period.
    #[serde(rename = "MISSING")]
    Missing,
}

impl FilterStatus {
    /// Parses a filter status from its wire string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not match a known status.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "ALL" => Ok(Self::All),
            "ONLINE" => Ok(Self::Online),
            "OVERTIME" => Ok(Self::Overtime),
            "MISSING" => Ok(Self::Missing),
            _ => Err(DomainError::InvalidFilterStatus(s.to_string())),
        }
    }

    /// Returns the wire string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Online => "ONLINE",
            Self::Overtime => "OVERTIME",
            Self::Missing => "MISSING",
        }
    }
}

impl FromStr for FilterStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The reporting period statistics are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// The calendar year (e.g., 2026).
    year: u16,
    /// The calendar month (1-12).
    month: u8,
}

impl ReportingPeriod {
    /// Creates a new `ReportingPeriod`.
    ///
    /// # Arguments
    ///
    /// * `year` - The calendar year (must be between 2000 and 2100)
    /// * `month` - The calendar month (must be between 1 and 12)
    ///
    /// # Errors
    ///
    /// Returns an error if the year or month is out of range.
    pub const fn new(year: u16, month: u8) -> Result<Self, DomainError> {
        if year < 2000 || year > 2100 {
            return Err(DomainError::InvalidYear { year });
        }
        if month < 1 || month > 12 {
            return Err(DomainError::InvalidMonth { month });
        }
        Ok(Self { year, month })
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the calendar month (1-12).
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }
}

impl std::fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
