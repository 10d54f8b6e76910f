use crate::Result;
use crate::error::CatalogError;
use crate::fetch::TextSource;
use crate::repo::{FALLBACK_REPO, RepoLocation};

const RAW_GITHUB: &str = "https://raw.githubusercontent.com";
const SOURCE_BRANCH: &str = "main";

/// A chart's default values and where they were found.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValuesFile {
    pub location: String,
    pub content: String,
}

/// Looks up a chart's `values.yaml` in the places a repository usually
/// publishes it.
#[derive(Debug, Clone)]
pub struct ValuesLocator<S> {
    source: S,
    repo: RepoLocation,
    owner: Option<String>,
    repo_name: Option<String>,
}

impl<S> ValuesLocator<S>
where
    S: TextSource,
{
    pub fn new(source: S, repo: RepoLocation) -> Self {
        Self {
            source,
            repo,
            owner: None,
            repo_name: None,
        }
    }

    /// Use an explicit GitHub source repository instead of the one derived
    /// from the site URL.
    #[must_use]
    pub fn with_github_source(
        mut self,
        owner: impl Into<String>,
        repo_name: impl Into<String>,
    ) -> Self {
        self.owner = Some(owner.into());
        self.repo_name = Some(repo_name.into());
        self
    }

    /// Locations tried for `chart`, in order.
    #[must_use]
    pub fn candidates(&self, chart: &str) -> Vec<String> {
        let owner = self
            .owner
            .as_deref()
            .unwrap_or_else(|| self.repo.github_owner());
        let repo_name = self
            .repo_name
            .as_deref()
            .unwrap_or_else(|| self.repo.github_repo());
        vec![
            self.repo.join(&format!("{chart}-values.yaml")),
            format!("{RAW_GITHUB}/{owner}/{repo_name}/{SOURCE_BRANCH}/{chart}/values.yaml"),
            format!("{RAW_GITHUB}/{owner}/{FALLBACK_REPO}/{SOURCE_BRANCH}/{chart}/values.yaml"),
        ]
    }

    /// Fetch the values of `chart` from the first candidate that answers.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ValuesNotFound`] with every failed attempt if
    /// no candidate can be read.
    pub fn fetch(&self, chart: &str) -> Result<ValuesFile> {
        let mut attempts = Vec::new();
        for location in self.candidates(chart) {
            match self.source.fetch_text(&location) {
                Ok(content) => {
                    tracing::info!(chart, %location, "found values");
                    return Ok(ValuesFile { location, content });
                }
                Err(err) => {
                    tracing::debug!(chart, error = %err, "values candidate failed");
                    attempts.push(err);
                }
            }
        }
        Err(CatalogError::ValuesNotFound {
            chart: chart.to_string(),
            attempts,
        })
    }
}
