mod config;
mod location;
mod selection;

pub use config::{
    RewindConfig, DEFAULT_ARCH, DEFAULT_BACKUP_PATH, DEFAULT_CONFIG_PATH, DEFAULT_ENDPOINT,
    DEFAULT_MIRRORLIST_PATH,
};
pub use location::{build_location, LocationError, SnapshotLocation};
pub use selection::{SnapshotLevel, SnapshotSelection};

#[cfg(test)]
mod tests;
