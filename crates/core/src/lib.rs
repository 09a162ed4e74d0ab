// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod aggregate;
mod error;
mod merge;
mod rows;
mod snapshot;
mod visibility;

#[cfg(test)]
mod tests;

pub use aggregate::{AggregatedStats, aggregate, aggregate_forest};
pub use error::CoreError;
pub use merge::{MergedNode, merge_forest};
pub use rows::{ExpandedState, RowNode, VisibleRow, compute_visible_rows};
pub use snapshot::{RefreshToken, SnapshotStore};
pub use visibility::{ViewQuery, has_matching_descendant, is_rendered, self_matches};
