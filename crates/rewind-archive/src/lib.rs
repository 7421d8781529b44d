mod availability;
mod error;
mod index;
mod lister;
mod navigator;
mod transport;

pub use availability::{
    package_database_url, AvailabilityChecker, AvailabilityReport, OptionalRepoStatus,
};
pub use error::ArchiveError;
pub use index::{parse_directory_index, IndexError};
pub use lister::{DirectoryLister, HttpDirectoryLister};
pub use navigator::{
    newest_first, presentable_entries, Chooser, NavigationOutcome, SnapshotNavigator,
    STAGING_ENTRY_COUNT,
};
pub use transport::{
    ArchiveTransport, HttpResponse, HttpTransport, ProbeMethod, TransportError,
};
