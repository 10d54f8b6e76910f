use url::Url;

use crate::Result;
use crate::error::CatalogError;
use crate::fetch::is_http;

/// Source owner assumed when the repository is not served from GitHub Pages.
pub const FALLBACK_OWNER: &str = "your-username";
/// Source repository assumed when the site URL has no path.
pub const FALLBACK_REPO: &str = "helm_charts";

/// Base location of a chart repository, e.g.
/// `https://owner.github.io/helm_charts/`.
///
/// Always ends in a slash so relative names join below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoLocation {
    base: Url,
}

impl RepoLocation {
    /// Parse a repository URL or a local directory.
    ///
    /// A trailing `index.yaml` or `index.html` is dropped, so the address of
    /// the index or the landing page can be used as well.
    ///
    /// # Errors
    ///
    /// Returns an error if `location` is neither a valid URL nor a path that
    /// can be made absolute.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        let mut base = if location.contains("://") {
            Url::parse(location).map_err(|source| CatalogError::InvalidUrl {
                location: location.to_string(),
                source,
            })?
        } else {
            let path =
                std::path::absolute(location).map_err(|source| CatalogError::InvalidPath {
                    location: location.to_string(),
                    source: Some(source),
                })?;
            Url::from_directory_path(&path).map_err(|()| CatalogError::InvalidPath {
                location: location.to_string(),
                source: None,
            })?
        };

        let path = base.path().to_string();
        let path = ["/index.yaml", "/index.html"]
            .iter()
            .find_map(|file| path.strip_suffix(*file))
            .unwrap_or(&path);
        if path.ends_with('/') {
            base.set_path(path);
        } else {
            base.set_path(&format!("{path}/"));
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.base
    }

    /// The repository URL without the trailing slash, as passed to
    /// `helm repo add`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    #[must_use]
    pub fn index_url(&self) -> String {
        self.join("index.yaml")
    }

    /// Resolve `relative` below the repository. Absolute `http(s)` URLs, as
    /// found in chart `urls`, are returned unchanged.
    #[must_use]
    pub fn join(&self, relative: &str) -> String {
        if is_http(relative) {
            return relative.to_string();
        }
        let relative = relative.trim_start_matches('/');
        match self.base.join(relative) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}/{relative}", self.as_str()),
        }
    }

    fn is_github_pages(&self) -> bool {
        self.base
            .host_str()
            .is_some_and(|host| host.ends_with(".github.io"))
    }

    /// Owner of the chart sources: `<owner>` for `<owner>.github.io`.
    #[must_use]
    pub fn github_owner(&self) -> &str {
        if !self.is_github_pages() {
            return FALLBACK_OWNER;
        }
        self.base
            .host_str()
            .and_then(|host| host.split('.').next())
            .unwrap_or(FALLBACK_OWNER)
    }

    /// Repository of the chart sources: the first path segment of the site.
    #[must_use]
    pub fn github_repo(&self) -> &str {
        if !is_http(self.base.as_str()) {
            return FALLBACK_REPO;
        }
        self.base
            .path_segments()
            .and_then(|mut segments| segments.find(|segment| !segment.is_empty()))
            .unwrap_or(FALLBACK_REPO)
    }
}

impl std::fmt::Display for RepoLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RepoLocation {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
