use crate::error::FlowError;
use crate::ir::SourceLine;
use crate::parser::HeaderDialect;
use anyhow::Result;
use std::path::Path;

/// Line that ends the body of a flow; anything after it is free text.
pub const BODY_END: &str = "---";

const FENCE_INFO: &str = "mflow";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// A `.mfw` file holding exactly one flow.
    Plain,
    /// A Markdown file with one flow per fenced `mflow` block.
    Markdown,
}

impl DocumentFormat {
    pub const EXTENSIONS: [&'static str; 3] = ["mfw", "md", "markdown"];

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str())? {
            "mfw" => Some(Self::Plain),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// Header, body and trailing text of one flow, before any parsing.
#[derive(Debug, Clone)]
pub struct FlowSource {
    pub header: String,
    pub header_line: usize,
    pub dialect: HeaderDialect,
    pub body: Vec<SourceLine>,
    pub trailing: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub flows: Vec<FlowSource>,
}

pub fn load_document(
    input: &str,
    format: DocumentFormat,
    dialect: Option<HeaderDialect>,
) -> Result<Document> {
    let numbered: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .collect();

    let flows = match format {
        DocumentFormat::Plain => vec![segment_flow(&numbered, dialect)?],
        DocumentFormat::Markdown => {
            let blocks = extract_flow_blocks(&numbered);
            if blocks.is_empty() {
                return Err(anyhow::anyhow!("No mflow blocks found in input"));
            }
            blocks
                .iter()
                .map(|block| segment_flow(block, dialect))
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    tracing::debug!(flows = flows.len(), "loaded document");
    Ok(Document { flows })
}

/// Split numbered lines into header, body and trailing text.
pub fn segment_flow(
    lines: &[(usize, &str)],
    dialect: Option<HeaderDialect>,
) -> Result<FlowSource, FlowError> {
    let mut iter = lines.iter().skip_while(|(_, line)| line.trim().is_empty());
    let Some(&(header_line, header)) = iter.next() else {
        return Err(FlowError::MalformedHeader {
            header: String::new(),
        });
    };
    let header = header.trim().to_string();

    let mut body = Vec::new();
    let mut trailing = None;
    while let Some(&(number, line)) = iter.next() {
        if line.trim_end() == BODY_END {
            let rest: Vec<&str> = iter.by_ref().map(|(_, line)| *line).collect();
            trailing = Some(rest.join("\n"));
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        body.push(SourceLine::new(number, line));
    }

    Ok(FlowSource {
        dialect: dialect.unwrap_or_else(|| HeaderDialect::detect(&header)),
        header,
        header_line,
        body,
        trailing,
    })
}

fn extract_flow_blocks<'a>(lines: &[(usize, &'a str)]) -> Vec<Vec<(usize, &'a str)>> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = Vec::new();
    let mut fence = "";

    for &(number, line) in lines {
        let trimmed = line.trim();
        if !in_block {
            if let Some(start_fence) = detect_flow_fence(trimmed) {
                in_block = true;
                fence = start_fence;
            }
            continue;
        }
        if is_fence_end(trimmed, fence) {
            in_block = false;
            blocks.push(std::mem::take(&mut current));
            continue;
        }
        current.push((number, line));
    }

    blocks
}

fn detect_flow_fence(line: &str) -> Option<&'static str> {
    for (fence, marker) in [("```", '`'), ("~~~", '~'), (":::", ':')] {
        if line.starts_with(fence) {
            let rest = line.trim_start_matches(marker).trim();
            if rest.split_whitespace().next() == Some(FENCE_INFO) {
                return Some(fence);
            }
        }
    }
    None
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    if !line.starts_with(fence) {
        return false;
    }
    line[fence.len()..].trim().is_empty()
}
