// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while updating or querying a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A fetched response belongs to a superseded refresh and was discarded.
    StaleGeneration {
        /// The newest refresh generation the store has handed out.
        latest: u64,
        /// The generation the response was fetched under.
        got: u64,
    },
    /// An expansion toggle referenced a node that is not in the current tree.
    UnknownNode {
        /// The node id that was not found.
        node_id: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleGeneration { latest, got } => {
                write!(
                    f,
                    "Discarded stale response from refresh generation {got}; latest is {latest}"
                )
            }
            Self::UnknownNode { node_id } => {
                write!(f, "Node '{node_id}' not found in the current org tree")
            }
        }
    }
}

impl std::error::Error for CoreError {}
