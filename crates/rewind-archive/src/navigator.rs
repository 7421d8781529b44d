use rewind_core::{SnapshotLevel, SnapshotLocation, SnapshotSelection};

use crate::{ArchiveError, DirectoryLister};

/// Number of newest year-level entries that are staging directories rather
/// than dated snapshots (`last/`, `month/`, `week/` on the Arch archive).
pub const STAGING_ENTRY_COUNT: usize = 3;

/// Operator choice capability. Returns the index of the chosen option, or
/// `None` when the operator cancels.
pub trait Chooser {
    fn choose(&mut self, level: SnapshotLevel, options: &[String]) -> Option<usize>;
}

impl<C: Chooser + ?Sized> Chooser for &mut C {
    fn choose(&mut self, level: SnapshotLevel, options: &[String]) -> Option<usize> {
        (**self).choose(level, options)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub selection: SnapshotSelection,
    pub location: SnapshotLocation,
}

pub fn newest_first(mut entries: Vec<String>) -> Vec<String> {
    entries.reverse();
    entries
}

pub fn presentable_entries(level: SnapshotLevel, mut entries: Vec<String>) -> Vec<String> {
    if level == SnapshotLevel::Year && entries.len() >= STAGING_ENTRY_COUNT {
        entries.truncate(entries.len() - STAGING_ENTRY_COUNT);
    }
    newest_first(entries)
}

pub struct SnapshotNavigator<L> {
    endpoint: String,
    lister: L,
}

impl<L: DirectoryLister> SnapshotNavigator<L> {
    pub fn new(endpoint: impl Into<String>, lister: L) -> Self {
        Self {
            endpoint: endpoint.into(),
            lister,
        }
    }

    pub fn navigate<C: Chooser + ?Sized>(
        &self,
        chooser: &mut C,
    ) -> Result<NavigationOutcome, ArchiveError> {
        let mut selection = SnapshotSelection::new();

        for level in SnapshotLevel::ALL {
            let location = SnapshotLocation::compose(&self.endpoint, &selection)?;
            let entries = presentable_entries(level, self.lister.list(location.as_str())?);
            if entries.is_empty() {
                return Err(ArchiveError::NoEntries {
                    level,
                    location: location.into_string(),
                });
            }

            let choice = chooser
                .choose(level, &entries)
                .and_then(|index| entries.get(index))
                .ok_or(ArchiveError::SelectionCancelled { level })?;
            tracing::info!(level = level.as_str(), choice = %choice, "selected snapshot level");
            selection.set(level, choice.clone());
        }

        let location = SnapshotLocation::compose(&self.endpoint, &selection)?;
        Ok(NavigationOutcome {
            selection,
            location,
        })
    }
}
