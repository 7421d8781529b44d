use std::fmt;

use thiserror::Error;

use crate::{SnapshotLevel, SnapshotSelection};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("archive endpoint must not be empty")]
    EmptyEndpoint,
    #[error("cannot compose a {level} path without a {parent}")]
    MissingParent {
        level: SnapshotLevel,
        parent: SnapshotLevel,
    },
    #[error("invalid {level} segment '{segment}': must be a single path component")]
    InvalidSegment {
        level: SnapshotLevel,
        segment: String,
    },
}

/// Base address of an archive directory. Always ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotLocation(String);

impl SnapshotLocation {
    pub fn compose(
        endpoint: &str,
        selection: &SnapshotSelection,
    ) -> Result<Self, LocationError> {
        let base = endpoint.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(LocationError::EmptyEndpoint);
        }

        let mut url = format!("{base}/");
        let mut previous_set = true;
        for level in SnapshotLevel::ALL {
            let segment = selection.get(level);
            if segment.is_empty() {
                previous_set = false;
                continue;
            }
            if !previous_set {
                return Err(LocationError::MissingParent {
                    level,
                    parent: level.parent().unwrap_or(SnapshotLevel::Year),
                });
            }
            validate_segment(level, segment)?;
            url.push_str(segment);
            url.push('/');
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn join(&self, relative: &str) -> String {
        format!("{}{}", self.0, relative.trim_start_matches('/'))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SnapshotLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SnapshotLocation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn build_location(
    endpoint: &str,
    year: &str,
    month: &str,
    day: &str,
) -> Result<SnapshotLocation, LocationError> {
    SnapshotLocation::compose(endpoint, &SnapshotSelection::from_parts(year, month, day))
}

fn validate_segment(level: SnapshotLevel, segment: &str) -> Result<(), LocationError> {
    let valid = segment != "."
        && segment != ".."
        && !segment.contains(['/', '?', '#'])
        && !segment.chars().any(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(LocationError::InvalidSegment {
            level,
            segment: segment.to_string(),
        })
    }
}
