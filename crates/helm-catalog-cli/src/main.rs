use clap::Parser;
use color_eyre::eyre;
use helm_catalog_cli::{Cli, logging};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::setup_logging(cli.log.log_level, cli.log.log_format, cli.log.color.into())?;
    helm_catalog_cli::run(cli)?;
    Ok(())
}
