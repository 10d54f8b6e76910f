use std::io::Write;

use helm_catalog::ChartCard;
use helm_catalog_index::VersionRecord;
use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Style {
    pub color: bool,
}

impl Style {
    pub(crate) fn name(self, text: &str) -> String {
        if self.color {
            text.bold().green().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn version(self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn dim(self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn command(self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}

fn header(out: &mut dyn Write, card: &ChartCard, style: Style) -> std::io::Result<()> {
    writeln!(
        out,
        "{} {} {}",
        style.name(&card.name),
        style.version(&card.version),
        style.dim(&format!("(app {})", card.app_version)),
    )?;
    writeln!(out, "  {}", card.description)
}

pub(crate) fn card(
    out: &mut dyn Write,
    card: &ChartCard,
    alias: &str,
    style: Style,
) -> std::io::Result<()> {
    header(out, card, style)?;
    if !card.keywords.is_empty() {
        writeln!(out, "  keywords: {}", card.keywords.join(", "))?;
    }
    if !card.created.is_empty() {
        writeln!(out, "  created: {}", style.dim(&card.created))?;
    }
    writeln!(out, "  $ {}", style.command(&card.install_command(alias)))
}

pub(crate) fn details(
    out: &mut dyn Write,
    card: &ChartCard,
    versions: &[VersionRecord],
    alias: &str,
    style: Style,
) -> std::io::Result<()> {
    header(out, card, style)?;
    writeln!(out)?;
    if let Some(home) = &card.home {
        writeln!(out, "home:        {home}")?;
    }
    if !card.created.is_empty() {
        writeln!(out, "created:     {}", card.created)?;
    }
    if !card.keywords.is_empty() {
        writeln!(out, "keywords:    {}", card.keywords.join(", "))?;
    }
    if !card.maintainers.is_empty() {
        writeln!(out, "maintainers: {}", card.maintainers.join(", "))?;
    }
    for url in &card.urls {
        writeln!(out, "package:     {url}")?;
    }

    writeln!(out, "\ninstall:\n  $ {}", style.command(&card.install_command(alias)))?;

    writeln!(out, "\nversions ({}):", versions.len())?;
    for record in versions {
        let version = record.scalar("version").unwrap_or("unknown");
        let app_version = record.scalar("appVersion").unwrap_or("N/A");
        let created = record.scalar("created").unwrap_or_default();
        writeln!(
            out,
            "  {} app {:<10} {}",
            style.version(&format!("{version:<12}")),
            app_version,
            style.dim(created),
        )?;
    }
    Ok(())
}
