use color_eyre::eyre;
use helm_catalog_index::{
    Diagnostic, DiagnosticKind, Document, IndexParser, Value, VersionRecord, parse,
};
use indoc::indoc;
use test_util::prelude::*;

fn record<const N: usize>(fields: [(&str, Value); N]) -> VersionRecord {
    fields.into_iter().collect()
}

fn document<const N: usize>(charts: [(&str, Vec<VersionRecord>); N]) -> Document {
    let mut doc = Document::default();
    for (name, versions) in charts {
        doc.entries.insert(name.to_string(), versions);
    }
    doc
}

/// Read `text` with a general purpose YAML reader, keeping string and
/// string-sequence fields only.
fn reference_document(text: &str) -> eyre::Result<Document> {
    let root: serde_yaml::Value = serde_yaml::from_str(text)?;
    let mut doc = Document::default();
    let Some(entries) = root.get("entries").and_then(serde_yaml::Value::as_mapping) else {
        return Ok(doc);
    };
    for (name, versions) in entries {
        let name = name.as_str().unwrap_or_default().to_string();
        let mut records = Vec::new();
        for version in versions.as_sequence().into_iter().flatten() {
            let mut record = VersionRecord::new();
            for (key, value) in version.as_mapping().into_iter().flatten() {
                let key = key.as_str().unwrap_or_default();
                match value {
                    serde_yaml::Value::String(s) => {
                        record.insert(key, s.as_str());
                    }
                    serde_yaml::Value::Sequence(items) => {
                        let items: Vec<String> = items
                            .iter()
                            .filter_map(|item| item.as_str().map(str::to_string))
                            .collect();
                        record.insert(key, items);
                    }
                    _ => {}
                }
            }
            records.push(record);
        }
        doc.entries.insert(name, records);
    }
    Ok(doc)
}

#[test]
fn parses_single_chart_with_keyword_sequence() {
    test_util::Builder::default().build();
    let doc = parse(indoc! {r#"
        entries:
          mychart:
            - version: 1.2.0
              appVersion: "2.0"
              description: Example chart
              keywords:
                - web
                - api
    "#});

    let expected = document([(
        "mychart",
        vec![record([
            ("version", "1.2.0".into()),
            ("appVersion", "2.0".into()),
            ("description", "Example chart".into()),
            ("keywords", vec!["web", "api"].into()),
        ])],
    )]);
    sim_assert_eq!(doc, expected);
}

#[test]
fn canonical_fixture_matches_reference_yaml_reader() -> eyre::Result<()> {
    test_util::Builder::default().build();
    let text = test_util::read_testdata("index/canonical.yaml");

    let output = IndexParser::new().parse_with_diagnostics(&text);
    sim_assert_eq!(output.document, reference_document(&text)?);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    Ok(())
}

#[test]
fn versions_keep_source_order() {
    let doc = parse(indoc! {"
        entries:
          demo:
            - version: 2.0.0
            - version: 1.5.0
            - version: 1.0.0
    "});

    let versions: Vec<_> = doc
        .chart("demo")
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r.scalar("version"))
        .collect();
    sim_assert_eq!(versions, vec!["2.0.0", "1.5.0", "1.0.0"]);
    assert_eq!(
        doc.latest("demo").and_then(|r| r.scalar("version")),
        Some("2.0.0")
    );
}

#[test]
fn ignores_everything_before_entries() {
    let doc = parse(indoc! {"
        apiVersion: v1
        decoy:
          - version: 9.9.9
          notachart:
            - version: 0.0.1
        entries:
          real:
            - version: 1.0.0
    "});

    sim_assert_eq!(
        doc,
        document([("real", vec![record([("version", "1.0.0".into())])])])
    );
}

#[test]
fn comments_and_blank_lines_are_inert() {
    let plain = parse(indoc! {"
        entries:
          demo:
            - version: 1.0.0
              keywords:
                - a
                - b
              home: https://example.com
    "});
    let noisy = parse(indoc! {"
        # header comment
        entries:

          # chart comment
          demo:
            - version: 1.0.0

              keywords:
              # between key and items
                - a

                - b
            # shallow comment
              home: https://example.com

    "});

    sim_assert_eq!(noisy, plain);
}

#[test]
fn scalar_fields_round_trip_without_quotes() {
    let doc = parse(indoc! {r#"
        entries:
          demo:
            - version:    1.0.0
              appVersion: "v1.2"
              home: 'https://example.com/a:b'
              created: 2024-01-01T00:00:00Z
              digest: "unterminated
              quoted: '"inner"'
    "#});

    let expected = record([
        ("version", "1.0.0".into()),
        ("appVersion", "v1.2".into()),
        ("home", "https://example.com/a:b".into()),
        ("created", "2024-01-01T00:00:00Z".into()),
        ("digest", "\"unterminated".into()),
        ("quoted", "\"inner\"".into()),
    ]);
    sim_assert_eq!(doc.latest("demo"), Some(&expected));
}

#[test]
fn inline_sequences_are_split_and_cleaned() {
    let doc = parse(indoc! {r#"
        entries:
          demo:
            - version: 1.0.0
              keywords: [a, "b", 'c']
              urls: []
              sources: "[quoted, list]"
    "#});

    let latest = doc.latest("demo").cloned().unwrap_or_default();
    assert_eq!(
        latest.sequence("keywords"),
        Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
    );
    assert_eq!(latest.sequence("urls"), Some(&[][..]));
    assert_eq!(
        latest.sequence("sources"),
        Some(&["quoted".to_string(), "list".to_string()][..])
    );
}

#[test]
fn missing_fields_are_absent_and_bare_keys_are_empty() {
    let doc = parse(indoc! {"
        entries:
          demo:
            - version: 1.0.0
              icon:
              name: demo
    "});

    let latest = doc.latest("demo").cloned().unwrap_or_default();
    assert!(!latest.contains_key("created"));
    assert!(!latest.contains_key("appVersion"));
    assert_eq!(latest.get("icon"), Some(&Value::Scalar(String::new())));
    assert_eq!(latest.scalar("name"), Some("demo"));
}

#[test]
fn trailing_sequence_survives_next_chart_and_end_of_input() {
    let doc = parse(indoc! {"
        entries:
          first:
            - version: 1.0.0
              urls:
                - first-1.0.0.tgz
          second:
            - version: 2.0.0
              urls:
                - second-2.0.0.tgz
    "});

    let urls = |chart: &str| {
        doc.latest(chart)
            .and_then(|r| r.sequence("urls"))
            .map(<[String]>::to_vec)
    };
    assert_eq!(urls("first"), Some(vec!["first-1.0.0.tgz".to_string()]));
    assert_eq!(urls("second"), Some(vec!["second-2.0.0.tgz".to_string()]));
}

#[test]
fn helm_compact_layout_is_understood() {
    test_util::Builder::default().build();
    let text = test_util::read_testdata("index/compact.yaml");
    let output = IndexParser::new().parse_with_diagnostics(&text);

    let versions = output.document.chart("nginx").unwrap_or_default();
    assert_eq!(versions.len(), 2);

    let latest = &versions[0];
    assert_eq!(latest.scalar("version"), Some("2.0.0"));
    assert_eq!(latest.scalar("apiVersion"), Some("v2"));
    assert_eq!(latest.scalar("created"), Some("2024-03-01T10:00:00Z"));
    assert_eq!(
        latest.sequence("keywords"),
        Some(&["web".to_string(), "proxy".to_string()][..])
    );
    assert_eq!(
        latest.sequence("maintainers"),
        Some(&["email: platform@example.com".to_string()][..])
    );
    assert_eq!(latest.scalar("name"), Some("nginx"));
    assert_eq!(versions[1].scalar("version"), Some("1.0.0"));

    // the nested `name:` under the maintainer item
    sim_assert_eq!(
        output.diagnostics,
        vec![Diagnostic {
            line: 14,
            kind: DiagnosticKind::UnexpectedIndent,
        }]
    );
}

#[test]
fn wider_indentation_is_learned() {
    let output = IndexParser::new().parse_with_diagnostics(indoc! {"
        entries:
            demo:
                -   version: 1.0.0
                    appVersion: \"2.0\"
                    keywords:
                        - wide
                -   version: 0.9.0
    "});
    // keys aligned after `-   `
    sim_assert_eq!(
        output.document,
        document([(
            "demo",
            vec![
                record([
                    ("version", "1.0.0".into()),
                    ("appVersion", "2.0".into()),
                    ("keywords", vec!["wide"].into()),
                ]),
                record([("version", "0.9.0".into())]),
            ]
        )])
    );
    assert!(output.diagnostics.is_empty());

    // bare markers: the first key below the marker sets the column
    let doc = parse(indoc! {"
        entries:
            demo:
                -
                    version: 1.0.0
                    home: https://example.com
    "});
    let latest = doc.latest("demo");
    assert_eq!(latest.and_then(|r| r.scalar("version")), Some("1.0.0"));
    assert_eq!(
        latest.and_then(|r| r.scalar("home")),
        Some("https://example.com")
    );

    let doc = parse(indoc! {"
        entries:
            demo:
                - version: 1.0.0
                  keywords:
                      - wide
    "});
    sim_assert_eq!(
        doc,
        document([(
            "demo",
            vec![record([
                ("version", "1.0.0".into()),
                ("keywords", vec!["wide"].into()),
            ])]
        )])
    );
}

#[test]
fn block_scalars() {
    let doc = parse(indoc! {"
        entries:
          demo:
            - version: 1.0.0
              description: |
                First line.

                Third line.
              notes: >-
                folded
                together
              name: demo
    "});

    let latest = doc.latest("demo").cloned().unwrap_or_default();
    assert_eq!(
        latest.scalar("description"),
        Some("First line.\n\nThird line.\n")
    );
    assert_eq!(latest.scalar("notes"), Some("folded together"));
    assert_eq!(latest.scalar("name"), Some("demo"));
}

#[test]
fn malformed_lines_do_not_lose_parsed_data() {
    let output = IndexParser::new().parse_with_diagnostics(indoc! {"
        entries:
          demo:
            - version: 1.0.0
              keywords:
                - a
              just some words
                  deeply: nested
              home: https://example.com
           odd: indent
          other:
            - version: 0.1.0
    "});

    let demo = output.document.latest("demo").cloned().unwrap_or_default();
    assert_eq!(demo.scalar("version"), Some("1.0.0"));
    assert_eq!(demo.sequence("keywords"), Some(&["a".to_string()][..]));
    assert_eq!(demo.scalar("home"), Some("https://example.com"));
    assert_eq!(
        output
            .document
            .latest("other")
            .and_then(|r| r.scalar("version")),
        Some("0.1.0")
    );

    let kinds: Vec<_> = output.diagnostics.iter().map(|d| (d.line, d.kind)).collect();
    sim_assert_eq!(
        kinds,
        vec![
            (6, DiagnosticKind::Unrecognized),
            (7, DiagnosticKind::UnexpectedIndent),
            (9, DiagnosticKind::UnexpectedIndent),
        ]
    );
}

#[test]
fn repeated_chart_header_appends_versions() {
    let doc = parse(indoc! {"
        entries:
          demo:
            - version: 2.0.0
          demo:
            - version: 1.0.0
    "});
    let versions: Vec<_> = doc
        .chart("demo")
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r.scalar("version"))
        .collect();
    sim_assert_eq!(versions, vec!["2.0.0", "1.0.0"]);
}

#[test]
fn inputs_without_entries_are_empty() {
    assert!(parse("").is_empty());
    assert!(parse("apiVersion: v1\nfoo:\n  bar: baz\n").is_empty());

    let doc = parse("entries:\n  empty:\n");
    assert_eq!(doc.chart("empty").map(<[VersionRecord]>::len), Some(0));
}

#[test]
fn parsing_is_deterministic() {
    let text = test_util::read_testdata("index/canonical.yaml");
    sim_assert_eq!(parse(&text), parse(&text));
    sim_assert_eq!(
        serde_json::to_string(&parse(&text)).ok(),
        serde_json::to_string(&parse(&text)).ok()
    );
}
