use std::path::Path;
use std::time::Duration;

use vfs::VfsPath;

use crate::error::FetchError;

/// Reads a text document (an index or a values file) from a location.
pub trait TextSource {
    /// Fetch the document at `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be read or is not handled by
    /// this source.
    fn fetch_text(&self, location: &str) -> Result<String, FetchError>;
}

impl<T> TextSource for &T
where
    T: TextSource + ?Sized,
{
    fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        (**self).fetch_text(location)
    }
}

impl<T> TextSource for Box<T>
where
    T: TextSource + ?Sized,
{
    fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        (**self).fetch_text(location)
    }
}

pub(crate) fn is_http(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Blocking HTTP(S) source.
#[derive(Clone)]
pub struct HttpSource {
    agent: ureq::Agent,
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSource").finish_non_exhaustive()
    }
}

impl HttpSource {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl TextSource for HttpSource {
    fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        tracing::debug!(location, "GET");
        match self.agent.get(location).call() {
            Ok(resp) => resp.into_string().map_err(|source| FetchError::Io {
                location: location.to_string(),
                source,
            }),
            Err(ureq::Error::Status(status, resp)) => Err(FetchError::Status {
                location: location.to_string(),
                status,
                text: resp.status_text().to_string(),
            }),
            Err(ureq::Error::Transport(err)) => Err(FetchError::Transport {
                location: location.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// Reads paths and `file://` URLs below a virtual filesystem root.
///
/// Locations are resolved relative to the root, so `/index.yaml` and
/// `index.yaml` name the same file.
#[derive(Debug, Clone)]
pub struct VfsSource {
    root: VfsPath,
}

impl VfsSource {
    #[must_use]
    pub fn new(root: VfsPath) -> Self {
        Self { root }
    }

    /// A source backed by the physical filesystem below `dir`.
    #[must_use]
    pub fn physical(dir: impl AsRef<Path>) -> Self {
        Self::new(VfsPath::new(vfs::PhysicalFS::new(dir.as_ref())))
    }
}

impl TextSource for VfsSource {
    fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        if is_http(location) {
            return Err(FetchError::Unsupported {
                location: location.to_string(),
            });
        }
        let path = match url::Url::parse(location) {
            Ok(url) if url.scheme() == "file" => url.path().to_string(),
            _ => location.to_string(),
        };
        let vfs_err = |source| FetchError::Vfs {
            location: location.to_string(),
            source,
        };

        tracing::debug!(location, root = self.root.as_str(), "read");
        self.root
            .join(path.trim_start_matches('/'))
            .map_err(vfs_err)?
            .read_to_string()
            .map_err(vfs_err)
    }
}

/// Dispatches `http(s)://` locations to [`HttpSource`] and everything else to
/// the local filesystem.
#[derive(Debug, Clone)]
pub struct AutoSource {
    http: HttpSource,
    files: VfsSource,
}

impl Default for AutoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: HttpSource::new(),
            files: VfsSource::physical("/"),
        }
    }
}

impl TextSource for AutoSource {
    fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        if is_http(location) {
            return self.http.fetch_text(location);
        }
        if location.starts_with("file://") {
            return self.files.fetch_text(location);
        }
        let path = std::path::absolute(location).map_err(|source| FetchError::Io {
            location: location.to_string(),
            source,
        })?;
        self.files.fetch_text(&path.to_string_lossy())
    }
}
