//! Why a row or feed line was left out.
//!
//! Extraction and feed parsing never fail on a bad row; they record a
//! [`SkipReason`] instead so callers can count what was dropped.

use serde::{Deserialize, Serialize};

/// Reason a document row or feed line produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Line was empty after trimming.
    Blank,
    /// Line is the feed's column header.
    Header,
    /// Tab-separated line had fewer fields than required.
    TooFewFields { found: usize, required: usize },
    /// A timestamp in the document was not followed by a full set of fixed fields.
    IncompleteRow,
}

impl SkipReason {
    /// Whether this skip is worth surfacing to an operator.
    ///
    /// Blank lines and headers are expected in every feed file.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::TooFewFields { .. } | Self::IncompleteRow)
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => f.write_str("blank line"),
            Self::Header => f.write_str("header line"),
            Self::TooFewFields { found, required } => {
                write!(f, "{found} fields, at least {required} required")
            }
            Self::IncompleteRow => f.write_str("timestamp without a complete row"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_skips() {
        assert!(!SkipReason::Blank.is_malformed());
        assert!(!SkipReason::Header.is_malformed());
        assert!(SkipReason::IncompleteRow.is_malformed());
        let reason = SkipReason::TooFewFields {
            found: 3,
            required: 6,
        };
        assert!(reason.is_malformed());
        assert_eq!(reason.to_string(), "3 fields, at least 6 required");
    }
}
