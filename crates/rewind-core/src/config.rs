use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://archive.archlinux.org/repos";
pub const DEFAULT_ARCH: &str = "x86_64";
pub const DEFAULT_MIRRORLIST_PATH: &str = "/etc/pacman.d/mirrorlist";
pub const DEFAULT_BACKUP_PATH: &str = "/etc/pacman.d/mirrorlist.bak";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/rewind.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewindConfig {
    pub endpoint: String,
    pub arch: String,
    pub required_repos: Vec<String>,
    pub optional_repos: Vec<String>,
    pub mirrorlist_path: PathBuf,
    pub backup_path: PathBuf,
    pub http_timeout_secs: u64,
    pub update_command: Vec<String>,
    pub elevation_command: String,
}

impl Default for RewindConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            arch: DEFAULT_ARCH.to_string(),
            required_repos: vec!["core".to_string(), "extra".to_string()],
            optional_repos: vec!["multilib".to_string()],
            mirrorlist_path: PathBuf::from(DEFAULT_MIRRORLIST_PATH),
            backup_path: PathBuf::from(DEFAULT_BACKUP_PATH),
            http_timeout_secs: 30,
            update_command: vec!["pacman".to_string(), "-Syyuu".to_string()],
            elevation_command: "sudo".to_string(),
        }
    }
}

impl RewindConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("failed to parse rewind config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config: {}", path.display()))
    }

    /// An explicit path must exist; the default path is optional.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            anyhow::bail!(
                "invalid endpoint '{}': must start with http:// or https://",
                self.endpoint
            );
        }
        if !is_path_token(&self.arch) {
            anyhow::bail!("invalid arch '{}': must be a single path component", self.arch);
        }
        if self.required_repos.is_empty() {
            anyhow::bail!("required_repos must name at least one repository");
        }
        for repo in self.required_repos.iter().chain(&self.optional_repos) {
            if !is_path_token(repo) {
                anyhow::bail!("invalid repository name '{repo}'");
            }
        }
        if self.mirrorlist_path.as_os_str().is_empty() || self.backup_path.as_os_str().is_empty()
        {
            anyhow::bail!("mirrorlist_path and backup_path must not be empty");
        }
        if self.mirrorlist_path == self.backup_path {
            anyhow::bail!(
                "backup_path must differ from mirrorlist_path: {}",
                self.backup_path.display()
            );
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be greater than zero");
        }
        if self.update_command.first().map_or(true, |program| program.trim().is_empty()) {
            anyhow::bail!("update_command must name a program");
        }
        Ok(())
    }
}

fn is_path_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"._+-".contains(&b))
        && value != "."
        && value != ".."
}
