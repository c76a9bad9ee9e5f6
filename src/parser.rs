use crate::error::FlowError;
use crate::ir::{Cell, CellKind, Column, ColumnKind, ColumnRegistry, Flow, ParsedCell};
use crate::loader::FlowSource;
use once_cell::sync::Lazy;
use regex::Regex;

static DETAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^()]+\)\s*$").unwrap());

/// Header syntaxes accepted for the lane line of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderDialect {
    /// `[Browser] submit [Server]`: bracketed names are work lanes, the text
    /// between them (optionally parenthesized) names connector lanes.
    Bracket,
    /// `Browser [submit] Server`: bracketed names are connector lanes.
    InvertedBracket,
    /// `Browser, submit, Server`: lanes alternate work/connector by position.
    Delimited(char),
}

impl HeaderDialect {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "bracket" | "brackets" => Some(Self::Bracket),
            "inverted" | "inverted-bracket" => Some(Self::InvertedBracket),
            "comma" | "csv" => Some(Self::Delimited(',')),
            "pipe" => Some(Self::Delimited('|')),
            "tab" | "tsv" => Some(Self::Delimited('\t')),
            _ => None,
        }
    }

    /// Guess the dialect from the header line itself.
    pub fn detect(header: &str) -> Self {
        let header = header.trim();
        if header.starts_with('[') {
            return Self::Bracket;
        }
        for delimiter in [',', '|', '\t'] {
            if header.contains(delimiter) {
                return Self::Delimited(delimiter);
            }
        }
        if header.contains('[') {
            return Self::InvertedBracket;
        }
        Self::Bracket
    }
}

/// Parse a header line into the lane registry of one flow.
pub fn parse_header(header: &str, dialect: HeaderDialect) -> Result<ColumnRegistry, FlowError> {
    let lanes: Vec<(ColumnKind, String)> = match dialect {
        HeaderDialect::Bracket => split_bracketed(header)
            .into_iter()
            .map(|(bracketed, text)| {
                if bracketed {
                    (ColumnKind::Work, text)
                } else {
                    (ColumnKind::Connector, strip_parens(&text))
                }
            })
            .collect(),
        HeaderDialect::InvertedBracket => split_bracketed(header)
            .into_iter()
            .map(|(bracketed, text)| {
                if bracketed {
                    (ColumnKind::Connector, text)
                } else {
                    (ColumnKind::Work, text)
                }
            })
            .collect(),
        HeaderDialect::Delimited(delimiter) => header
            .trim()
            .split(delimiter)
            .enumerate()
            .map(|(idx, text)| {
                let kind = if idx % 2 == 0 {
                    ColumnKind::Work
                } else {
                    ColumnKind::Connector
                };
                (kind, text.trim().to_string())
            })
            .collect(),
    };

    let columns: Vec<Column> = lanes
        .into_iter()
        .enumerate()
        .map(|(index, (kind, title))| Column { index, kind, title })
        .collect();

    if !columns.iter().any(|column| column.kind == ColumnKind::Work) {
        return Err(FlowError::MalformedHeader {
            header: header.to_string(),
        });
    }
    tracing::trace!(?dialect, lanes = columns.len(), "parsed header");
    Ok(ColumnRegistry::new(columns))
}

/// Split a header into `(bracketed, text)` segments. An unterminated or empty
/// `[` is kept as plain text; whitespace-only runs between brackets still
/// count as (untitled) segments.
fn split_bracketed(header: &str) -> Vec<(bool, String)> {
    let header = header.trim();
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut rest = header;

    while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(close) = rest[1..].find(']') {
                if close > 0 {
                    if !pending.is_empty() {
                        segments.push((false, pending.trim().to_string()));
                        pending.clear();
                    }
                    segments.push((true, rest[1..1 + close].trim().to_string()));
                    rest = &rest[close + 2..];
                    continue;
                }
            }
        }
        pending.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    if !pending.is_empty() {
        segments.push((false, pending.trim().to_string()));
    }
    segments
}

fn strip_parens(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(text)
        .trim()
        .to_string()
}

/// Split a leading `[tag]` off a body line. Returns the trimmed tag and the
/// remaining text, or `None` when the line carries no usable tag.
fn split_tag(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_prefix('[')?;
    let close = inner.find(']')?;
    let tag = inner[..close].trim();
    if tag.is_empty() {
        return None;
    }
    Some((tag, &inner[close + 1..]))
}

/// Classify one non-empty body line into a work or arrow cell.
pub fn parse_cell(line: &str) -> Cell {
    let (kind, dest_tag, mut text) = match split_tag(line) {
        Some((tag, rest)) => (CellKind::Arrow, Some(tag.to_string()), rest),
        None => (CellKind::Work, None, line),
    };

    let mut detail = None;
    if let Some(found) = DETAIL_RE.find(text) {
        let trimmed = found
            .as_str()
            .trim_matches(|c: char| c.is_whitespace() || c == '(' || c == ')');
        if !trimmed.is_empty() {
            detail = Some(trimmed.to_string());
        }
        text = &text[..found.start()];
    }

    let mut highlighted = false;
    if let Some(rest) = text.strip_prefix('#') {
        text = rest;
        highlighted = true;
    }

    let cell = Cell {
        kind,
        sequence: None,
        origin: line.to_string(),
        dest_tag,
        label: text.trim().to_string(),
        detail,
        highlighted,
        prefix: String::new(),
        suffix: String::new(),
        direction: None,
    };
    tracing::trace!(kind = ?cell.kind, label = %cell.label, "classified line");
    cell
}

/// Parse the header and every body line of one flow.
pub fn parse_flow(source: &FlowSource) -> Result<Flow, FlowError> {
    let registry = parse_header(&source.header, source.dialect)?;
    let cells = source
        .body
        .iter()
        .map(|line| ParsedCell {
            cell: parse_cell(&line.text),
            line: line.number,
            raw: line.raw.clone(),
        })
        .collect();
    Ok(Flow { registry, cells })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(registry: &ColumnRegistry) -> Vec<(ColumnKind, &str)> {
        registry
            .columns()
            .iter()
            .map(|column| (column.kind, column.title.as_str()))
            .collect()
    }

    #[test]
    fn parse_bracket_header() {
        let registry =
            parse_header("[ブラウザ] 表示・入力 [JS] (通信) [PHP]", HeaderDialect::Bracket).unwrap();
        assert_eq!(
            titles(&registry),
            vec![
                (ColumnKind::Work, "ブラウザ"),
                (ColumnKind::Connector, "表示・入力"),
                (ColumnKind::Work, "JS"),
                (ColumnKind::Connector, "通信"),
                (ColumnKind::Work, "PHP"),
            ]
        );
        assert_eq!(registry.resolve("JS"), Some(2));
    }

    #[test]
    fn parse_bracket_header_with_blank_connectors() {
        let registry = parse_header("[A]   [B]\u{3000}[C]", HeaderDialect::Bracket).unwrap();
        assert_eq!(
            titles(&registry),
            vec![
                (ColumnKind::Work, "A"),
                (ColumnKind::Connector, ""),
                (ColumnKind::Work, "B"),
                (ColumnKind::Connector, ""),
                (ColumnKind::Work, "C"),
            ]
        );
    }

    #[test]
    fn parse_inverted_header() {
        let registry = parse_header("Client [request] Server", HeaderDialect::InvertedBracket).unwrap();
        assert_eq!(
            titles(&registry),
            vec![
                (ColumnKind::Work, "Client"),
                (ColumnKind::Connector, "request"),
                (ColumnKind::Work, "Server"),
            ]
        );
    }

    #[test]
    fn parse_delimited_header() {
        let registry = parse_header("A, •, B, •, C", HeaderDialect::Delimited(',')).unwrap();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get(1).unwrap().kind, ColumnKind::Connector);
        assert_eq!(registry.get(4).unwrap().kind, ColumnKind::Work);
        assert_eq!(registry.resolve("C"), Some(4));
    }

    #[test]
    fn header_without_work_lanes_is_malformed() {
        let err = parse_header("   ", HeaderDialect::Bracket).unwrap_err();
        assert!(matches!(err, FlowError::MalformedHeader { .. }));
        let err = parse_header("only connectors", HeaderDialect::Bracket).unwrap_err();
        assert!(matches!(err, FlowError::MalformedHeader { .. }));
    }

    #[test]
    fn unterminated_bracket_is_text() {
        let registry = parse_header("[A] x [B", HeaderDialect::Bracket).unwrap();
        assert_eq!(
            titles(&registry),
            vec![(ColumnKind::Work, "A"), (ColumnKind::Connector, "x [B")]
        );
    }

    #[test]
    fn detect_dialects() {
        assert_eq!(HeaderDialect::detect("[A] x [B]"), HeaderDialect::Bracket);
        assert_eq!(HeaderDialect::detect("A, x, B"), HeaderDialect::Delimited(','));
        assert_eq!(HeaderDialect::detect("A | x | B"), HeaderDialect::Delimited('|'));
        assert_eq!(HeaderDialect::detect("A\tx\tB"), HeaderDialect::Delimited('\t'));
        assert_eq!(HeaderDialect::detect("A [x] B"), HeaderDialect::InvertedBracket);
        assert_eq!(HeaderDialect::from_token("CSV"), Some(HeaderDialect::Delimited(',')));
        assert_eq!(HeaderDialect::from_token("hex"), None);
    }

    #[test]
    fn parse_work_cell() {
        let cell = parse_cell("ページ訪問");
        assert_eq!(cell.kind, CellKind::Work);
        assert_eq!(cell.label, "ページ訪問");
        assert_eq!(cell.dest_tag, None);
        assert_eq!(cell.detail, None);
        assert!(!cell.highlighted);
    }

    #[test]
    fn parse_arrow_cell_with_detail() {
        let cell = parse_cell("[JS]POST (http://example.com/Api/?[form])");
        assert_eq!(cell.kind, CellKind::Arrow);
        assert_eq!(cell.dest_tag.as_deref(), Some("JS"));
        assert_eq!(cell.label, "POST");
        assert_eq!(cell.detail.as_deref(), Some("http://example.com/Api/?[form]"));
    }

    #[test]
    fn parse_highlighted_work_cell() {
        let cell = parse_cell("#submit (clicks the button)\u{3000}");
        assert!(cell.highlighted);
        assert_eq!(cell.label, "submit");
        assert_eq!(cell.detail.as_deref(), Some("clicks the button"));
    }

    #[test]
    fn nested_parentheses_are_not_detail() {
        let cell = parse_cell("call f(g(x))");
        assert_eq!(cell.detail, None);
        assert_eq!(cell.label, "call f(g(x))");
    }

    #[test]
    fn empty_tag_is_not_an_arrow() {
        let cell = parse_cell("[ ] nothing");
        assert_eq!(cell.kind, CellKind::Work);
        assert_eq!(cell.label, "[ ] nothing");
    }

    #[test]
    fn bare_tag_has_empty_label() {
        let cell = parse_cell("[ PHP ]");
        assert_eq!(cell.kind, CellKind::Arrow);
        assert_eq!(cell.dest_tag.as_deref(), Some("PHP"));
        assert_eq!(cell.label, "");
        assert_eq!(cell.origin, "[ PHP ]");
    }
}
