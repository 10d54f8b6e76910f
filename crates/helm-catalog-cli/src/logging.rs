use color_eyre::eyre;
use termcolor::ColorChoice;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum LogFormat {
    Json,
    #[value(name = "compact")]
    PrettyCompact,
    Pretty,
}

/// Install the global subscriber.
///
/// Events go to stderr so that command output on stdout stays parseable.
/// `RUST_LOG` takes precedence over `log_level`.
///
/// # Errors
///
/// Returns an error if the default filter is invalid or a global subscriber
/// is already installed.
pub fn setup_logging(
    log_level: Option<tracing::metadata::Level>,
    log_format: Option<LogFormat>,
    color_choice: ColorChoice,
) -> eyre::Result<(LogFormat, bool)> {
    let default_log_level = log_level.unwrap_or(tracing::metadata::Level::WARN);
    let default_log_directive = default_log_level.to_string().to_ascii_lowercase();
    let default_env_filter = tracing_subscriber::filter::EnvFilter::builder()
        .with_default_directive(default_log_level.into())
        .parse(default_log_directive)?;

    let env_filter = match std::env::var("RUST_LOG").ok() {
        Some(directive) => {
            match tracing_subscriber::filter::EnvFilter::builder().parse(&directive) {
                Ok(env_filter) => env_filter,
                Err(err) => {
                    eprintln!("invalid log filter {directive:?}: {err}");
                    eprintln!("falling back to default logging");
                    default_env_filter
                }
            }
        }
        None => default_env_filter,
    };

    let log_format = log_format.unwrap_or(LogFormat::PrettyCompact);
    let use_color = match color_choice {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
    };

    let fmt_layer_pretty = tracing_subscriber::fmt::Layer::new()
        .pretty()
        .without_time()
        .with_ansi(use_color)
        .fmt_fields(tracing_subscriber::fmt::format::PrettyFields::new().with_ansi(use_color))
        .with_writer(std::io::stderr);
    let fmt_layer_pretty_compact = tracing_subscriber::fmt::Layer::new()
        .compact()
        .without_time()
        .with_ansi(use_color)
        .with_writer(std::io::stderr);
    let fmt_layer_json = tracing_subscriber::fmt::Layer::new()
        .json()
        .without_time()
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with((log_format == LogFormat::Json).then_some(fmt_layer_json))
        .with((log_format == LogFormat::PrettyCompact).then_some(fmt_layer_pretty_compact))
        .with((log_format == LogFormat::Pretty).then_some(fmt_layer_pretty))
        .with(env_filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok((log_format, use_color))
}
