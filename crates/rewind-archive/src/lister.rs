use crate::{parse_directory_index, ArchiveError, ArchiveTransport};

pub trait DirectoryLister {
    /// Child directory names at `url`, in the order the server lists them.
    fn list(&self, url: &str) -> Result<Vec<String>, ArchiveError>;
}

impl<L: DirectoryLister + ?Sized> DirectoryLister for &L {
    fn list(&self, url: &str) -> Result<Vec<String>, ArchiveError> {
        (**self).list(url)
    }
}

#[derive(Debug, Clone)]
pub struct HttpDirectoryLister<T> {
    transport: T,
}

impl<T: ArchiveTransport> HttpDirectoryLister<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: ArchiveTransport> DirectoryLister for HttpDirectoryLister<T> {
    fn list(&self, url: &str) -> Result<Vec<String>, ArchiveError> {
        let response = self
            .transport
            .fetch_text(url)
            .map_err(|err| ArchiveError::Fetch {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        if !response.is_success() {
            return Err(ArchiveError::Fetch {
                url: url.to_string(),
                reason: format!("unexpected status code: {}", response.status),
            });
        }

        let entries =
            parse_directory_index(&response.body).map_err(|err| ArchiveError::Parse {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        tracing::debug!(url, count = entries.len(), "listed directory index");
        Ok(entries)
    }
}
