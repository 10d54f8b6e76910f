use std::cmp::Ordering;

use helm_catalog_index::{Document, VersionRecord};
use serde::Serialize;

/// Repository alias used in suggested `helm` commands.
pub const DEFAULT_REPO_ALIAS: &str = "my-repo";

const UNKNOWN_VERSION: &str = "unknown";
const UNKNOWN_APP_VERSION: &str = "N/A";
const NO_DESCRIPTION: &str = "No description available";

/// Display projection of a chart's latest version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartCard {
    pub name: String,
    pub version: String,
    pub app_version: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub created: String,
    pub home: Option<String>,
    pub urls: Vec<String>,
    pub maintainers: Vec<String>,
    /// Number of versions listed for the chart.
    pub versions: usize,
}

fn scalar_or(record: &VersionRecord, key: &str, default: &str) -> String {
    match record.scalar(key) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

fn sequence(record: &VersionRecord, key: &str) -> Vec<String> {
    record.sequence(key).map(<[String]>::to_vec).unwrap_or_default()
}

impl ChartCard {
    /// Project the newest record of `name`.
    #[must_use]
    pub fn new(name: &str, latest: &VersionRecord, versions: usize) -> Self {
        Self {
            name: name.to_string(),
            version: scalar_or(latest, "version", UNKNOWN_VERSION),
            app_version: scalar_or(latest, "appVersion", UNKNOWN_APP_VERSION),
            description: scalar_or(latest, "description", NO_DESCRIPTION),
            keywords: sequence(latest, "keywords"),
            created: scalar_or(latest, "created", ""),
            home: latest
                .scalar("home")
                .filter(|home| !home.is_empty())
                .map(str::to_string),
            urls: sequence(latest, "urls"),
            maintainers: sequence(latest, "maintainers"),
            versions,
        }
    }

    #[must_use]
    pub fn install_command(&self, alias: &str) -> String {
        format!("helm install my-{name} {alias}/{name}", name = self.name)
    }

    /// Case-insensitive match of an already lowercased `term` against name,
    /// description and keywords.
    fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self.description.to_lowercase().contains(term)
            || self
                .keywords
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(term))
    }
}

/// Orders names case-insensitively, lowercase first on ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// The charts of a repository, one card per chart, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    cards: Vec<ChartCard>,
}

impl Catalog {
    /// Build the catalog from a parsed index.
    ///
    /// Charts without any version record are left out.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let mut cards: Vec<ChartCard> = document
            .charts()
            .filter_map(|(name, versions)| {
                versions
                    .first()
                    .map(|latest| ChartCard::new(name, latest, versions.len()))
            })
            .collect();
        cards.sort_by(|a, b| compare_names(&a.name, &b.name));
        tracing::debug!(charts = cards.len(), "built catalog");
        Self { cards }
    }

    #[must_use]
    pub fn cards(&self) -> &[ChartCard] {
        &self.cards
    }

    #[must_use]
    pub fn chart(&self, name: &str) -> Option<&ChartCard> {
        self.cards.iter().find(|card| card.name == name)
    }

    /// Cards whose name, description or keywords contain `term`.
    ///
    /// The term is trimmed and compared case-insensitively. A blank term
    /// matches every card.
    #[must_use]
    pub fn filter(&self, term: &str) -> Vec<&ChartCard> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.cards.iter().collect();
        }
        self.cards.iter().filter(|card| card.matches(&term)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ChartCard;
    type IntoIter = std::slice::Iter<'a, ChartCard>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// The `helm` commands needed to use the repository at `repo_url`.
#[must_use]
pub fn repo_commands(repo_url: &str, alias: &str) -> String {
    format!(
        "# add the repository\n\
         helm repo add {alias} {repo_url}\n\
         \n\
         # update the repository\n\
         helm repo update\n\
         \n\
         # search charts\n\
         helm search repo {alias}\n\
         \n\
         # install a chart\n\
         helm install my-release {alias}/<chart-name>"
    )
}
