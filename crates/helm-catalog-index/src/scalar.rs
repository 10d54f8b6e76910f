/// Strip one matching pair of surrounding double or single quotes.
///
/// No escape sequences are interpreted.
pub(crate) fn clean(value: &str) -> &str {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Split `key: value` at the first colon.
///
/// Returns `None` when there is no colon or the key is empty.
pub(crate) fn split_key_value(content: &str) -> Option<(&str, &str)> {
    let (key, value) = content.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Parse `[a, "b", 'c']` into its elements.
///
/// Returns `None` if `value` is not bracketed.
pub(crate) fn inline_sequence(value: &str) -> Option<Vec<String>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    Some(
        inner
            .split(',')
            .map(|item| clean(item).to_string())
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockStyle {
    /// `|`: line breaks are kept.
    Literal,
    /// `>`: lines are joined with spaces, blank lines become breaks.
    Folded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Chomping {
    /// No indicator: a single trailing newline.
    Clip,
    /// `-`: no trailing newline.
    Strip,
    /// `+`: every trailing newline.
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockHeader {
    pub style: BlockStyle,
    pub chomping: Chomping,
}

impl BlockHeader {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        let style = match chars.next()? {
            '|' => BlockStyle::Literal,
            '>' => BlockStyle::Folded,
            _ => return None,
        };
        let chomping = match chars.next() {
            None => Chomping::Clip,
            Some('-') => Chomping::Strip,
            Some('+') => Chomping::Keep,
            Some(_) => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Self { style, chomping })
    }

    /// Render collected lines, already stripped of their content indentation.
    pub(crate) fn render(self, lines: &[&str]) -> String {
        let body_len = lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |idx| idx + 1);
        let (body, trailing) = lines.split_at(body_len);

        let mut out = match self.style {
            BlockStyle::Literal => body.join("\n"),
            BlockStyle::Folded => fold(body),
        };
        if body.is_empty() {
            return match self.chomping {
                Chomping::Keep => "\n".repeat(trailing.len()),
                Chomping::Clip | Chomping::Strip => String::new(),
            };
        }
        match self.chomping {
            Chomping::Strip => {}
            Chomping::Clip => out.push('\n'),
            Chomping::Keep => out.push_str(&"\n".repeat(trailing.len() + 1)),
        }
        out
    }
}

fn fold(lines: &[&str]) -> String {
    let mut out = String::new();
    let mut after_text = false;
    for line in lines {
        if line.is_empty() {
            out.push('\n');
            after_text = false;
        } else {
            if after_text {
                out.push(' ');
            }
            out.push_str(line);
            after_text = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{BlockHeader, BlockStyle, Chomping, clean, inline_sequence, split_key_value};

    #[test]
    fn clean_strips_one_matching_pair() {
        assert_eq!(clean(r#""2.0""#), "2.0");
        assert_eq!(clean("'web'"), "web");
        assert_eq!(clean(r#""'nested'""#), "'nested'");
        assert_eq!(clean(r#""unbalanced'"#), r#""unbalanced'"#);
        assert_eq!(clean("\""), "\"");
        assert_eq!(clean("  plain  "), "plain");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn key_value_splits_at_first_colon() {
        assert_eq!(
            split_key_value("home: https://example.com"),
            Some(("home", "https://example.com"))
        );
        assert_eq!(split_key_value("keywords:"), Some(("keywords", "")));
        assert_eq!(split_key_value(": orphan"), None);
        assert_eq!(split_key_value("no colon"), None);
    }

    #[test]
    fn inline_sequences() {
        assert_eq!(
            inline_sequence(r#"[a, "b", 'c']"#),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(inline_sequence("[]"), Some(vec![]));
        assert_eq!(inline_sequence("[  ]"), Some(vec![]));
        assert_eq!(inline_sequence("a, b"), None);
    }

    #[test]
    fn block_headers() {
        assert_eq!(
            BlockHeader::parse("|-"),
            Some(BlockHeader {
                style: BlockStyle::Literal,
                chomping: Chomping::Strip
            })
        );
        assert_eq!(
            BlockHeader::parse(">"),
            Some(BlockHeader {
                style: BlockStyle::Folded,
                chomping: Chomping::Clip
            })
        );
        assert_eq!(BlockHeader::parse("|2"), None);
        assert_eq!(BlockHeader::parse("|-+"), None);
        assert_eq!(BlockHeader::parse("plain"), None);
    }

    #[test]
    fn block_rendering() {
        let literal = BlockHeader::parse("|").unwrap();
        assert_eq!(literal.render(&["a", "", "b", "", ""]), "a\n\nb\n");

        let strip = BlockHeader::parse("|-").unwrap();
        assert_eq!(strip.render(&["a", "b", ""]), "a\nb");

        let keep = BlockHeader::parse("|+").unwrap();
        assert_eq!(keep.render(&["a", "", ""]), "a\n\n\n");

        let folded = BlockHeader::parse(">").unwrap();
        assert_eq!(folded.render(&["one", "two", "", "three"]), "one two\nthree\n");

        assert_eq!(literal.render(&[]), "");
    }
}
