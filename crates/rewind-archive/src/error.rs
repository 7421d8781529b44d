use rewind_core::{LocationError, SnapshotLevel};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to parse directory index at {url}: {reason}")]
    Parse { url: String, reason: String },
    #[error("no {level} entries available at {location}")]
    NoEntries {
        level: SnapshotLevel,
        location: String,
    },
    #[error("{level} selection cancelled")]
    SelectionCancelled { level: SnapshotLevel },
    #[error("archive unavailable for {repo} at {location} (status: {status})")]
    Availability {
        repo: String,
        status: u16,
        location: String,
    },
    #[error(
        "archive incomplete at {location}: missing required repositories: {}",
        .missing.join(", ")
    )]
    IncompleteArchive {
        location: String,
        missing: Vec<String>,
    },
    #[error(transparent)]
    Location(#[from] LocationError),
}

impl ArchiveError {
    /// Errors after which the operator can sensibly pick another date.
    /// Nothing has been mutated when any of these is returned.
    pub fn is_reselectable(&self) -> bool {
        matches!(
            self,
            Self::IncompleteArchive { .. }
                | Self::NoEntries { .. }
                | Self::Fetch { .. }
                | Self::Parse { .. }
                | Self::Availability { .. }
        )
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::SelectionCancelled { .. })
    }
}
