use rewind_core::{RewindConfig, SnapshotLocation};

use crate::{ArchiveError, ArchiveTransport, ProbeMethod};

const STATUS_OK: u16 = 200;
const STATUS_NOT_FOUND: u16 = 404;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionalRepoStatus {
    Present,
    Absent,
    Unknown(String),
}

impl OptionalRepoStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Unknown(_) => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityReport {
    pub location: SnapshotLocation,
    pub required: Vec<String>,
    pub optional: Vec<(String, OptionalRepoStatus)>,
}

pub fn package_database_url(location: &SnapshotLocation, repo: &str, arch: &str) -> String {
    location.join(&format!("{repo}/os/{arch}/{repo}.db"))
}

#[derive(Debug, Clone)]
pub struct AvailabilityChecker<T> {
    transport: T,
    arch: String,
    required: Vec<String>,
    optional: Vec<String>,
}

impl<T: ArchiveTransport> AvailabilityChecker<T> {
    pub fn new(
        transport: T,
        arch: impl Into<String>,
        required: Vec<String>,
        optional: Vec<String>,
    ) -> Self {
        Self {
            transport,
            arch: arch.into(),
            required,
            optional,
        }
    }

    pub fn from_config(transport: T, config: &RewindConfig) -> Self {
        Self::new(
            transport,
            config.arch.clone(),
            config.required_repos.clone(),
            config.optional_repos.clone(),
        )
    }

    pub fn check(&self, location: &SnapshotLocation) -> Result<AvailabilityReport, ArchiveError> {
        let mut missing = Vec::new();
        for repo in &self.required {
            let url = package_database_url(location, repo, &self.arch);
            let status = self
                .transport
                .probe(&url, ProbeMethod::Get)
                .map_err(|err| ArchiveError::Fetch {
                    url: url.clone(),
                    reason: err.to_string(),
                })?;
            match status {
                STATUS_OK => tracing::debug!(repo = %repo, "required repository present"),
                STATUS_NOT_FOUND => {
                    tracing::info!(repo = %repo, url = %url, "required repository missing");
                    missing.push(repo.clone());
                }
                other => {
                    return Err(ArchiveError::Availability {
                        repo: repo.clone(),
                        status: other,
                        location: location.to_string(),
                    });
                }
            }
        }

        if !missing.is_empty() {
            return Err(ArchiveError::IncompleteArchive {
                location: location.to_string(),
                missing,
            });
        }

        let optional = self
            .optional
            .iter()
            .map(|repo| (repo.clone(), self.probe_optional(location, repo)))
            .collect();

        Ok(AvailabilityReport {
            location: location.clone(),
            required: self.required.clone(),
            optional,
        })
    }

    fn probe_optional(&self, location: &SnapshotLocation, repo: &str) -> OptionalRepoStatus {
        let url = package_database_url(location, repo, &self.arch);
        let status = match self.transport.probe(&url, ProbeMethod::Head) {
            Ok(STATUS_OK) => OptionalRepoStatus::Present,
            Ok(STATUS_NOT_FOUND) => OptionalRepoStatus::Absent,
            Ok(other) => OptionalRepoStatus::Unknown(format!("status {other}")),
            Err(err) => OptionalRepoStatus::Unknown(err.to_string()),
        };
        tracing::info!(repo, status = status.as_str(), "optional repository probe");
        status
    }
}
