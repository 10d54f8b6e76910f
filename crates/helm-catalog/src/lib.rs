//! Chart catalog built from a parsed repository index, plus fetching of
//! index and values files over HTTP or from a file system.

mod catalog;
mod error;
mod fetch;
mod repo;
mod values;

pub use catalog::{Catalog, ChartCard, DEFAULT_REPO_ALIAS, repo_commands};
pub use error::{CatalogError, FetchError};
pub use fetch::{AutoSource, HttpSource, TextSource, VfsSource};
pub use repo::{FALLBACK_OWNER, FALLBACK_REPO, RepoLocation};
pub use values::{ValuesFile, ValuesLocator};

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
