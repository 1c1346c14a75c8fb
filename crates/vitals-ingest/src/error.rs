//! Error types for document ingestion and feed reading.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::feed::FeedState;

/// Errors raised while reading an export or connecting to a feed.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source document could not be read.
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source document is not valid UTF-8 text.
    #[error("failed to decode {path} as text")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A feed file is missing or unreadable.
    #[error("feed not available at {path}")]
    FeedUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// None of the candidate feed locations could be opened.
    #[error("no feed available (tried {})", display_paths(tried))]
    NoFeedAvailable { tried: Vec<PathBuf> },

    /// A feed operation was requested in a state that does not allow it.
    #[error("cannot {operation} a feed that is {state}")]
    InvalidState {
        operation: &'static str,
        state: FeedState,
    },

    /// The monitor worker thread could not be started.
    #[error("failed to start feed monitor")]
    WorkerSpawn {
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no locations".to_string();
    }
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_feed_lists_every_location() {
        let err = IngestError::NoFeedAvailable {
            tried: vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")],
        };
        assert_eq!(err.to_string(), "no feed available (tried a.txt, b.txt)");

        let err = IngestError::NoFeedAvailable { tried: Vec::new() };
        assert_eq!(err.to_string(), "no feed available (tried no locations)");
    }

    #[test]
    fn invalid_state_names_operation() {
        let err = IngestError::InvalidState {
            operation: "start",
            state: FeedState::Disconnected,
        };
        assert_eq!(err.to_string(), "cannot start a feed that is disconnected");
    }
}
