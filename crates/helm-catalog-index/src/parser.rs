use serde::Serialize;

use crate::document::{Document, Value, VersionRecord};
use crate::scalar::{self, BlockHeader};

/// Parse index text into a [`Document`], skipping lines that match no rule.
#[must_use]
pub fn parse(text: &str) -> Document {
    IndexParser::new().parse(text)
}

/// Why a line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A version marker appeared before any chart header.
    NoActiveChart,
    /// A field appeared outside of a version block.
    NoActiveVersion,
    /// The line sits at a known column but is neither a header, marker nor `key: value`.
    Unrecognized,
    /// The line sits at a column no rule expects.
    UnexpectedIndent,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NoActiveChart => "version marker outside of a chart",
            Self::NoActiveVersion => "field outside of a version",
            Self::Unrecognized => "unrecognized line",
            Self::UnexpectedIndent => "unexpected indentation",
        })
    }
}

/// A dropped line. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutput {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

/// Line oriented parser for Helm repository index files.
///
/// Parsing never fails. Each call runs its own state machine, so a parser may
/// be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexParser;

impl IndexParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn parse(&self, text: &str) -> Document {
        run(text, false).document
    }

    /// Parse and report every dropped line.
    #[must_use]
    pub fn parse_with_diagnostics(&self, text: &str) -> ParseOutput {
        run(text, true)
    }
}

fn run(text: &str, collect_diagnostics: bool) -> ParseOutput {
    let lines: Vec<Line<'_>> = text
        .lines()
        .enumerate()
        .map(|(idx, raw)| Line::new(idx + 1, raw))
        .collect();

    let mut next_significant = vec![None; lines.len()];
    let mut upcoming = None;
    for (idx, line) in lines.iter().enumerate().rev() {
        next_significant[idx] = upcoming;
        if line.is_significant() {
            upcoming = Some(idx);
        }
    }

    let mut machine = Machine::new(collect_diagnostics);
    for (line, next) in lines.iter().zip(next_significant) {
        machine.feed(line, next.map(|idx| &lines[idx]));
    }
    let output = machine.finish();
    tracing::debug!(
        charts = output.document.len(),
        dropped = output.diagnostics.len(),
        "parsed index"
    );
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub number: usize,
    pub indent: usize,
    pub content: &'a str,
    pub raw: &'a str,
}

impl<'a> Line<'a> {
    pub(crate) fn new(number: usize, raw: &'a str) -> Self {
        let rest = raw.trim_start();
        Self {
            number,
            indent: raw.len() - rest.len(),
            content: rest.trim_end(),
            raw,
        }
    }

    fn is_blank(&self) -> bool {
        self.content.is_empty()
    }

    fn is_significant(&self) -> bool {
        !self.is_blank() && !self.content.starts_with('#')
    }

    /// Text after a `- ` marker; a bare `-` has none.
    fn marker_rest(&self) -> Option<&'a str> {
        if self.content == "-" {
            return Some("");
        }
        self.content.strip_prefix("- ").map(str::trim)
    }

    /// Column of `rest`, a suffix of the content.
    fn column_of(&self, rest: &str) -> usize {
        self.indent + self.content.len() - rest.len()
    }
}

/// Indentation columns, learned from the first chart header, version marker
/// and field key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Layout {
    pub entries: usize,
    pub chart: Option<usize>,
    pub version: Option<usize>,
    pub field: Option<usize>,
}

/// An open block scalar (`key: |`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockScalar {
    pub key: String,
    pub key_indent: usize,
    pub header: BlockHeader,
    pub lines: Vec<(usize, String)>,
}

impl BlockScalar {
    fn accepts(&self, line: &Line<'_>) -> bool {
        line.is_blank() || line.indent > self.key_indent
    }

    fn render(&self) -> String {
        let content_indent = self
            .lines
            .iter()
            .find(|(_, text)| !text.trim().is_empty())
            .map_or(0, |(indent, _)| *indent);
        let stripped: Vec<&str> = self
            .lines
            .iter()
            .map(|(indent, text)| {
                if text.trim().is_empty() {
                    ""
                } else {
                    let cut = (*indent).min(content_indent);
                    text.get(cut..).unwrap_or_else(|| text.trim_start())
                }
            })
            .collect();
        self.header.render(&stripped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum State {
    /// Waiting for the `entries:` line.
    BeforeEntries,
    /// Inside `entries:` with no chart open yet.
    InEntries,
    /// A chart header was read; no version yet.
    AtChart { chart: String },
    /// Fields go to the last record of `chart`.
    AtVersion { chart: String },
    /// Collecting `- item` lines for `key`.
    InFieldSequence {
        chart: String,
        key: String,
        items: Vec<String>,
    },
    /// Collecting the lines of a block scalar.
    InBlockScalar { chart: String, block: BlockScalar },
}

impl State {
    fn chart(&self) -> Option<&str> {
        match self {
            Self::BeforeEntries | Self::InEntries => None,
            Self::AtChart { chart }
            | Self::AtVersion { chart }
            | Self::InFieldSequence { chart, .. }
            | Self::InBlockScalar { chart, .. } => Some(chart),
        }
    }

    fn has_version(&self) -> bool {
        matches!(
            self,
            Self::AtVersion { .. } | Self::InFieldSequence { .. } | Self::InBlockScalar { .. }
        )
    }
}

#[derive(Debug)]
pub(crate) struct Machine {
    pub state: State,
    pub layout: Layout,
    document: Document,
    diagnostics: Vec<Diagnostic>,
    collect_diagnostics: bool,
}

impl Machine {
    pub(crate) fn new(collect_diagnostics: bool) -> Self {
        Self {
            state: State::BeforeEntries,
            layout: Layout::default(),
            document: Document::default(),
            diagnostics: Vec::new(),
            collect_diagnostics,
        }
    }

    /// Consume one line. `next` is the following significant line, if any.
    pub(crate) fn feed(&mut self, line: &Line<'_>, next: Option<&Line<'_>>) {
        if let State::InBlockScalar { block, .. } = &mut self.state {
            if block.accepts(line) {
                block.lines.push((line.indent, line.raw.to_string()));
                return;
            }
            self.close_value();
        }

        if !line.is_significant() {
            return;
        }

        if self.state == State::BeforeEntries {
            if line.content == "entries:" {
                self.layout.entries = line.indent;
                self.state = State::InEntries;
            }
            return;
        }

        // top-level keys next to `entries:` (`apiVersion`, `generated`, ...)
        if line.indent <= self.layout.entries {
            return;
        }

        self.learn_field_column(line);

        if self.is_chart_header(line) {
            self.open_chart(line);
        } else if let Some(rest) = self.version_marker(line) {
            self.open_version(line, rest, next);
        } else if let (State::InFieldSequence { items, .. }, Some(rest)) =
            (&mut self.state, line.marker_rest())
            && self.layout.field.is_some_and(|field| line.indent >= field)
        {
            items.push(scalar::clean(rest).to_string());
        } else if self.layout.field == Some(line.indent) {
            self.field_line(line, next);
        } else if self.layout.field.is_none()
            && self.layout.chart.is_some_and(|chart| line.indent > chart)
        {
            self.skip(line, DiagnosticKind::NoActiveVersion);
        } else if self.layout.chart == Some(line.indent) {
            self.skip(line, DiagnosticKind::Unrecognized);
        } else {
            self.skip(line, DiagnosticKind::UnexpectedIndent);
        }
    }

    pub(crate) fn finish(mut self) -> ParseOutput {
        self.close_value();
        ParseOutput {
            document: self.document,
            diagnostics: self.diagnostics,
        }
    }

    fn is_chart_header(&self, line: &Line<'_>) -> bool {
        if !line.content.ends_with(':') || line.content.starts_with("- ") {
            return false;
        }
        match self.layout.chart {
            Some(column) => line.indent == column,
            None => line.indent > self.layout.entries,
        }
    }

    fn version_marker<'a>(&self, line: &Line<'a>) -> Option<&'a str> {
        let rest = line.marker_rest()?;
        let at_column = match (self.layout.version, self.layout.chart) {
            (Some(column), _) => line.indent == column,
            (None, Some(chart)) => line.indent >= chart,
            (None, None) => line.indent > self.layout.entries,
        };
        at_column.then_some(rest)
    }

    /// A marker without an inline key leaves the field column open until the
    /// first deeper line of its record.
    fn learn_field_column(&mut self, line: &Line<'_>) {
        if self.layout.field.is_none()
            && matches!(self.state, State::AtVersion { .. })
            && line.marker_rest().is_none()
            && self.layout.version.is_some_and(|version| line.indent > version)
        {
            self.layout.field = Some(line.indent);
        }
    }

    fn open_chart(&mut self, line: &Line<'_>) {
        let name = line.content.trim_end_matches(':').trim();
        if name.is_empty() {
            self.skip(line, DiagnosticKind::Unrecognized);
            return;
        }
        self.close_value();
        self.layout.chart.get_or_insert(line.indent);
        tracing::trace!(line = line.number, chart = name, "chart header");
        self.document.entries.entry(name.to_string()).or_default();
        self.state = State::AtChart {
            chart: name.to_string(),
        };
    }

    fn open_version(&mut self, line: &Line<'_>, rest: &str, next: Option<&Line<'_>>) {
        self.close_value();
        let Some(chart) = self.state.chart().map(str::to_string) else {
            self.skip(line, DiagnosticKind::NoActiveChart);
            return;
        };
        self.layout.version.get_or_insert(line.indent);
        self.document
            .entries
            .entry(chart.clone())
            .or_default()
            .push(VersionRecord::new());
        tracing::trace!(line = line.number, chart = %chart, "version marker");
        self.state = State::AtVersion { chart };

        if !rest.is_empty() {
            match scalar::split_key_value(rest) {
                Some((key, value)) => {
                    let key_column = line.column_of(rest);
                    self.layout.field.get_or_insert(key_column);
                    self.assign(key, value, key_column, next);
                }
                None => self.skip(line, DiagnosticKind::Unrecognized),
            }
        }
    }

    fn field_line(&mut self, line: &Line<'_>, next: Option<&Line<'_>>) {
        if !self.state.has_version() {
            self.skip(line, DiagnosticKind::NoActiveVersion);
            return;
        }
        match scalar::split_key_value(line.content) {
            Some((key, value)) => {
                self.close_value();
                self.assign(key, value, line.indent, next);
            }
            None => self.skip(line, DiagnosticKind::Unrecognized),
        }
    }

    /// Store `key: value` in the current record, or open a sequence or block
    /// scalar for it.
    fn assign(&mut self, key: &str, value: &str, key_indent: usize, next: Option<&Line<'_>>) {
        let State::AtVersion { chart } = &self.state else {
            return;
        };
        let chart = chart.clone();

        if value.is_empty() {
            let opens_sequence = next.is_some_and(|next| {
                next.marker_rest().is_some() && next.indent >= key_indent
            });
            if opens_sequence {
                self.state = State::InFieldSequence {
                    chart,
                    key: key.to_string(),
                    items: Vec::new(),
                };
            } else {
                self.insert(&chart, key, Value::Scalar(String::new()));
            }
            return;
        }

        if let Some(header) = BlockHeader::parse(value) {
            self.state = State::InBlockScalar {
                chart,
                block: BlockScalar {
                    key: key.to_string(),
                    key_indent,
                    header,
                    lines: Vec::new(),
                },
            };
            return;
        }

        let cleaned = scalar::clean(value);
        let value = match scalar::inline_sequence(cleaned) {
            Some(items) => Value::Sequence(items),
            None => Value::Scalar(cleaned.to_string()),
        };
        self.insert(&chart, key, value);
    }

    /// Flush an open field sequence or block scalar into its record.
    fn close_value(&mut self) {
        let state = std::mem::replace(&mut self.state, State::InEntries);
        self.state = match state {
            State::InFieldSequence { chart, key, items } => {
                self.insert(&chart, &key, Value::Sequence(items));
                State::AtVersion { chart }
            }
            State::InBlockScalar { chart, block } => {
                self.insert(&chart, &block.key, Value::Scalar(block.render()));
                State::AtVersion { chart }
            }
            other => other,
        };
    }

    fn insert(&mut self, chart: &str, key: &str, value: Value) {
        if let Some(record) = self
            .document
            .entries
            .get_mut(chart)
            .and_then(|versions| versions.last_mut())
        {
            record.insert(key, value);
        }
    }

    fn skip(&mut self, line: &Line<'_>, kind: DiagnosticKind) {
        tracing::trace!(line = line.number, ?kind, content = line.content, "skipping line");
        if self.collect_diagnostics {
            self.diagnostics.push(Diagnostic {
                line: line.number,
                kind,
            });
        }
    }
}
