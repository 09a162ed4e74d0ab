// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Reporting month is outside the 1-12 range.
    InvalidMonth {
        /// The invalid month value.
        month: u8,
    },
    /// Reporting year is outside the supported range.
    InvalidYear {
        /// The invalid year value.
        year: u16,
    },
    /// Filter status string is not recognized.
    InvalidFilterStatus(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { month } => {
                write!(f, "Invalid reporting month: {month}. Must be between 1 and 12")
            }
            Self::InvalidYear { year } => {
                write!(f, "Invalid reporting year: {year}. Must be between 2000 and 2100")
            }
            Self::InvalidFilterStatus(value) => {
                write!(f, "Unknown filter status: '{value}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
