use std::fs;
use std::path::{Path, PathBuf};

use rewind_core::RewindConfig;

use crate::fs_utils::{file_exists, remove_file_if_exists};
use crate::MirrorError;

pub const MIRROR_PATH_SUFFIX: &str = "$repo/os/$arch";

pub fn mirror_server_line(location: &str) -> String {
    format!(
        "Server = {}/{MIRROR_PATH_SUFFIX}",
        location.trim().trim_end_matches('/')
    )
}

/// Live pacman mirrorlist plus its single backup slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    live_path: PathBuf,
    backup_path: PathBuf,
}

impl MirrorConfig {
    pub fn new(live_path: impl Into<PathBuf>, backup_path: impl Into<PathBuf>) -> Self {
        Self {
            live_path: live_path.into(),
            backup_path: backup_path.into(),
        }
    }

    pub fn from_config(config: &RewindConfig) -> Self {
        Self::new(&config.mirrorlist_path, &config.backup_path)
    }

    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn has_backup(&self) -> Result<bool, MirrorError> {
        file_exists(&self.backup_path)
            .map_err(|err| MirrorError::io("inspect backup", &self.backup_path, err))
    }

    pub fn backup(&self) -> Result<u64, MirrorError> {
        let present = file_exists(&self.live_path)
            .map_err(|err| MirrorError::io("inspect mirrorlist", &self.live_path, err))?;
        if !present {
            return Err(MirrorError::SourceMissing {
                path: self.live_path.clone(),
            });
        }

        let copied = fs::copy(&self.live_path, &self.backup_path)
            .map_err(|err| MirrorError::io("write backup", &self.backup_path, err))?;
        tracing::info!(
            from = %self.live_path.display(),
            to = %self.backup_path.display(),
            bytes = copied,
            "backed up mirrorlist"
        );
        Ok(copied)
    }

    /// Replaces the live mirrorlist with a single `Server` directive for `location`.
    pub fn write(&self, location: &str) -> Result<String, MirrorError> {
        let line = mirror_server_line(location);
        fs::write(&self.live_path, format!("{line}\n"))
            .map_err(|err| MirrorError::io("write mirrorlist", &self.live_path, err))?;
        tracing::info!(path = %self.live_path.display(), server = %line, "wrote snapshot mirrorlist");
        Ok(line)
    }

    /// Puts the backup back in place. Safe to repeat: the backup itself is
    /// never modified, and nothing is touched when it is absent.
    pub fn restore(&self) -> Result<(), MirrorError> {
        if !self.has_backup()? {
            return Err(MirrorError::BackupMissing {
                path: self.backup_path.clone(),
            });
        }

        remove_file_if_exists(&self.live_path)
            .map_err(|err| MirrorError::io("remove mirrorlist", &self.live_path, err))?;
        fs::copy(&self.backup_path, &self.live_path)
            .map_err(|err| MirrorError::io("restore mirrorlist", &self.live_path, err))?;
        tracing::info!(path = %self.live_path.display(), "restored mirrorlist from backup");
        Ok(())
    }
}
