use std::fmt::Write as _;

/// Failure to read a text document from a location.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch {location}: HTTP {status} {text}")]
    Status {
        location: String,
        status: u16,
        text: String,
    },

    #[error("failed to fetch {location}: {message}")]
    Transport { location: String, message: String },

    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {location}: {source}")]
    Vfs {
        location: String,
        #[source]
        source: vfs::VfsError,
    },

    #[error("no source can read {location}")]
    Unsupported { location: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid repository location {location:?}: {source}")]
    InvalidUrl {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid repository path {location:?}")]
    InvalidPath {
        location: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("chart {0:?} not found in index")]
    ChartNotFound(String),

    #[error("{}", values_not_found(.chart, .attempts))]
    ValuesNotFound {
        chart: String,
        attempts: Vec<FetchError>,
    },
}

fn values_not_found(chart: &str, attempts: &[FetchError]) -> String {
    let mut out = format!("could not load values.yaml for {chart}\n");
    if !attempts.is_empty() {
        out.push_str("\ntried:\n");
        for attempt in attempts {
            let _ = writeln!(out, "  - {attempt}");
        }
    }
    let _ = write!(
        out,
        "\npossible solutions:\n\
         1. publish a {chart}-values.yaml file next to the repository index\n\
         2. make the chart sources available on GitHub (<owner>/<repo>/main/{chart}/values.yaml)\n\
         3. reading values.yaml from the packaged chart (.tgz) is not supported"
    );
    out
}
