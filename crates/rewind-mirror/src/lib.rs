mod error;
mod fs_utils;
mod mirrorlist;

pub use error::MirrorError;
pub use mirrorlist::{mirror_server_line, MirrorConfig, MIRROR_PATH_SUFFIX};

#[cfg(test)]
mod tests;
