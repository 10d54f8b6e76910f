mod error;
pub mod logging;
mod render;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use helm_catalog::{
    AutoSource, Catalog, CatalogError, ChartCard, DEFAULT_REPO_ALIAS, RepoLocation, TextSource,
    ValuesLocator, repo_commands,
};
use helm_catalog_index::{IndexParser, VersionRecord};

use crate::error::CliResult;
use crate::logging::LogFormat;
use crate::render::Style;

pub use error::CliError;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "helm-catalog",
    version,
    about = "Browse the charts of a Helm chart repository"
)]
pub struct Cli {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Chart repository URL or local directory
    #[arg(long, env = "HELM_CATALOG_REPO_URL", global = true)]
    pub repo_url: Option<String>,

    /// Index file path or URL [default: <repo-url>/index.yaml]
    #[arg(long, global = true)]
    pub index: Option<String>,

    /// Repository name used in suggested helm commands
    #[arg(long, default_value = DEFAULT_REPO_ALIAS, global = true)]
    pub repo_alias: String,
}

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    #[arg(long, global = true)]
    pub log_level: Option<tracing::metadata::Level>,

    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    #[arg(long, value_enum, default_value_t = Color::Auto, global = true)]
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Color {
    Auto,
    Always,
    Never,
}

impl From<Color> for termcolor::ColorChoice {
    fn from(color: Color) -> Self {
        match color {
            Color::Auto => Self::Auto,
            Color::Always => Self::Always,
            Color::Never => Self::Never,
        }
    }
}

impl Color {
    fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the charts of the repository
    List {
        /// Only charts whose name, description or keywords contain TERM
        #[arg(short, long, value_name = "TERM")]
        filter: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show the latest version of a chart and its version history
    Show {
        chart: String,

        #[arg(long)]
        json: bool,
    },

    /// Print the default values of a chart
    Values {
        chart: String,

        /// Write the values to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse the index and print the raw document as JSON
    Parse {
        /// Report lines the parser dropped on stderr
        #[arg(long)]
        diagnostics: bool,
    },

    /// Print the repository URL and the helm commands to use it
    Repo,
}

#[derive(serde::Serialize)]
struct ShowOutput<'a> {
    #[serde(flatten)]
    card: &'a ChartCard,
    install: String,
    history: &'a [VersionRecord],
}

/// Run the CLI against the local file system and the network.
///
/// # Errors
///
/// Returns an error if the index or values cannot be fetched, the chart does
/// not exist, or output cannot be written.
pub fn run(cli: Cli) -> CliResult<()> {
    let source = AutoSource::new();
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    match run_with(cli, &source, &mut stdout.lock(), &mut stderr.lock()) {
        // stdout closed early, e.g. piped into `head`
        Err(CliError::Io(err)) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Run the CLI, reading documents from `source` and writing to `out` and
/// `err`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(
    cli: Cli,
    source: &dyn TextSource,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> CliResult<()> {
    let style = Style {
        color: cli.log.color.enabled(),
    };
    let alias = cli.repo.repo_alias.as_str();

    match &cli.command {
        Command::List { filter, json } => {
            let catalog = load_catalog(&cli.repo, source)?.1;
            let cards = catalog.filter(filter.as_deref().unwrap_or_default());
            if *json {
                serde_json::to_writer_pretty(&mut *out, &cards)?;
                writeln!(out)?;
                return Ok(());
            }
            if cards.is_empty() {
                writeln!(err, "no charts found")?;
                return Ok(());
            }
            for (i, card) in cards.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                render::card(out, card, alias, style)?;
            }
            if cards.len() < catalog.len() {
                writeln!(err, "showing {} of {} charts", cards.len(), catalog.len())?;
            }
        }
        Command::Show { chart, json } => {
            let (document, catalog) = load_catalog(&cli.repo, source)?;
            let card = catalog
                .chart(chart)
                .ok_or_else(|| CatalogError::ChartNotFound(chart.clone()))?;
            let history = document.chart(chart).unwrap_or_default();
            if *json {
                let output = ShowOutput {
                    card,
                    install: card.install_command(alias),
                    history,
                };
                serde_json::to_writer_pretty(&mut *out, &output)?;
                writeln!(out)?;
            } else {
                render::details(out, card, history, alias, style)?;
            }
        }
        Command::Values { chart, output } => {
            let repo = repo_location(&cli.repo)?;
            let values = ValuesLocator::new(source, repo).fetch(chart)?;
            tracing::info!(%chart, location = %values.location, "loaded values");
            match output {
                Some(path) => {
                    std::fs::write(path, &values.content).map_err(|source| {
                        CliError::WriteOutput {
                            path: path.clone(),
                            source,
                        }
                    })?;
                    writeln!(err, "wrote {} to {}", values.location, path.display())?;
                }
                None => {
                    out.write_all(values.content.as_bytes())?;
                    if !values.content.ends_with('\n') {
                        writeln!(out)?;
                    }
                }
            }
        }
        Command::Parse { diagnostics } => {
            let text = source.fetch_text(&index_location(&cli.repo)?)?;
            let output = IndexParser::new().parse_with_diagnostics(&text);
            serde_json::to_writer_pretty(&mut *out, &output.document)?;
            writeln!(out)?;
            if *diagnostics {
                for diagnostic in &output.diagnostics {
                    writeln!(err, "line {}: {}", diagnostic.line, diagnostic.kind)?;
                }
                writeln!(err, "{} line(s) dropped", output.diagnostics.len())?;
            }
        }
        Command::Repo => {
            let repo = repo_location(&cli.repo)?;
            writeln!(out, "repository: {}\n", style.name(repo.as_str()))?;
            writeln!(out, "{}", repo_commands(repo.as_str(), alias))?;
        }
    }
    Ok(())
}

fn repo_location(args: &RepoArgs) -> CliResult<RepoLocation> {
    let url = args.repo_url.as_deref().ok_or(CliError::MissingRepo)?;
    Ok(RepoLocation::parse(url)?)
}

fn index_location(args: &RepoArgs) -> CliResult<String> {
    match &args.index {
        Some(index) => Ok(index.clone()),
        None => Ok(repo_location(args)?.index_url()),
    }
}

fn load_catalog(
    args: &RepoArgs,
    source: &dyn TextSource,
) -> CliResult<(helm_catalog_index::Document, Catalog)> {
    let location = index_location(args)?;
    tracing::debug!(%location, "loading index");
    let text = source.fetch_text(&location)?;
    let document = helm_catalog_index::parse(&text);
    let catalog = Catalog::from_document(&document);
    tracing::info!(%location, charts = catalog.len(), "loaded index");
    Ok((document, catalog))
}
