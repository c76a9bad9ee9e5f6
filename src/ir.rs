use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Work,
    Connector,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub index: usize,
    pub kind: ColumnKind,
    pub title: String,
}

/// Ordered lanes of one flow plus a title lookup.
///
/// When two lanes share a title the later one wins the lookup, matching how
/// arrow tags were always resolved.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
    by_title: HashMap<String, usize>,
}

impl ColumnRegistry {
    pub fn new(columns: Vec<Column>) -> Self {
        let by_title = columns
            .iter()
            .map(|column| (column.title.clone(), column.index))
            .collect();
        Self { columns, by_title }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn resolve(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    pub fn first_work(&self) -> Option<usize> {
        self.columns
            .iter()
            .find(|column| column.kind == ColumnKind::Work)
            .map(|column| column.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Work,
    Arrow,
    DummyWork,
    DummyArrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn between(from: usize, to: usize) -> Self {
        if from > to {
            Self::RightToLeft
        } else {
            Self::LeftToRight
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    /// Assigned by the grid builder; work cells only.
    pub sequence: Option<usize>,
    pub origin: String,
    /// Destination lane title; arrow cells only.
    pub dest_tag: Option<String>,
    pub label: String,
    pub detail: Option<String>,
    pub highlighted: bool,
    pub prefix: String,
    pub suffix: String,
    pub direction: Option<Direction>,
}

impl Cell {
    pub fn work(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            kind: CellKind::Work,
            sequence: None,
            origin: label.clone(),
            dest_tag: None,
            label,
            detail: None,
            highlighted: false,
            prefix: String::new(),
            suffix: String::new(),
            direction: None,
        }
    }

    #[cfg(test)]
    fn arrow(dest_tag: impl Into<String>, label: impl Into<String>) -> Self {
        let dest_tag = dest_tag.into();
        let label = label.into();
        let origin = format!("[{dest_tag}]{label}");
        Self {
            kind: CellKind::Arrow,
            origin,
            dest_tag: Some(dest_tag),
            ..Self::work(label)
        }
    }

    pub(crate) fn filler(kind: CellKind, glyph: &str, direction: Option<Direction>) -> Self {
        Self {
            kind,
            origin: String::new(),
            direction,
            ..Self::work(glyph)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, CellKind::DummyWork | CellKind::DummyArrow)
    }

    pub fn display_text(&self) -> String {
        format!("{}{}{}", self.prefix, self.label, self.suffix)
    }
}

/// One trimmed, non-empty body line and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the source document.
    pub number: usize,
    pub text: String,
    pub raw: String,
}

impl SourceLine {
    pub fn new(number: usize, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let text = raw.trim().to_string();
        Self { number, text, raw }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedCell {
    pub cell: Cell,
    pub line: usize,
    pub raw: String,
}

/// A parsed flow: lanes plus classified cells in feed order.
#[derive(Debug, Clone, Default)]
pub struct Flow {
    pub registry: ColumnRegistry,
    pub cells: Vec<ParsedCell>,
}
