use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] helm_catalog::CatalogError),

    #[error(transparent)]
    Fetch(#[from] helm_catalog::FetchError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no repository given, pass --repo-url or set HELM_CATALOG_REPO_URL")]
    MissingRepo,

    #[error("failed to write output {path}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CliResult<T> = std::result::Result<T, CliError>;
