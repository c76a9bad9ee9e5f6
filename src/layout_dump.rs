use crate::ir::{CellKind, Column, Direction};
use crate::layout::Layout;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub title: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Option<CellDump>>>,
    pub trailing: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CellDump {
    pub kind: CellKind,
    pub text: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub highlighted: bool,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, title: Option<&str>, trailing: Option<&str>) -> Self {
        let rows = layout
            .grid
            .rows()
            .iter()
            .map(|row| {
                row.slots()
                    .iter()
                    .map(|slot| {
                        slot.as_ref().map(|cell| CellDump {
                            kind: cell.kind,
                            text: cell.display_text(),
                            label: cell.label.clone(),
                            sequence: cell.sequence,
                            dest: cell.dest_tag.clone(),
                            direction: cell.direction,
                            detail: cell.detail.clone(),
                            highlighted: cell.highlighted,
                        })
                    })
                    .collect()
            })
            .collect();

        LayoutDump {
            title: title.map(str::to_string),
            columns: layout.columns.clone(),
            rows,
            trailing: trailing.map(str::to_string),
        }
    }
}

pub fn render_json(
    layout: &Layout,
    title: Option<&str>,
    trailing: Option<&str>,
) -> anyhow::Result<String> {
    let dump = LayoutDump::from_layout(layout, title, trailing);
    let mut json = serde_json::to_string_pretty(&dump)?;
    json.push('\n');
    Ok(json)
}
