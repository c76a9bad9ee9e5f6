use crate::config::RenderConfig;
use crate::ir::{Cell, CellKind, ColumnKind};
use crate::layout::Layout;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const DEFAULT_TITLE: &str = "mflow";

const TOOLTIP_SCRIPT: &str = r#"<script>
function showTip(e, text){
	tip.textContent = text
	tip.style.left = (e.clientX+1) + 'px'
	tip.style.top = (e.clientY+1) + 'px'
	tip.style.display = 'block'
}
function hideTip(){
	tip.style.display = 'none'
}
</script>
"#;

/// Render a flow as an HTML table, optionally wrapped in a full page.
///
/// `trailing` is the free text that followed the body; it is emitted as-is so
/// authors can keep markup in it.
pub fn render_html(
    layout: &Layout,
    theme: &Theme,
    config: &RenderConfig,
    trailing: Option<&str>,
) -> String {
    let table = render_html_table(layout, theme);
    if !config.standalone {
        let mut out = table;
        if let Some(text) = trailing {
            out.push_str(text);
        }
        return out;
    }

    let title = escape_html(config.title.as_deref().unwrap_or(DEFAULT_TITLE));
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(&stylesheet(theme));
    html.push_str(TOOLTIP_SCRIPT);
    html.push_str("</head>\n<body>\n<div id=\"tip\"></div>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str(&table);
    if let Some(text) = trailing {
        html.push_str(text);
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");
    html
}

pub fn render_html_table(layout: &Layout, theme: &Theme) -> String {
    let mut ht = String::from("<table>\n<tr>\n");
    for column in &layout.columns {
        ht.push_str(&format!(
            "\t<th class=\"col-{}\">{}</th>\n",
            column.index,
            escape_html(&column.title)
        ));
    }
    ht.push_str("</tr>\n");

    for (row_idx, row) in layout.grid.rows().iter().enumerate() {
        ht.push_str("<tr>\n");
        let first_filled = row.first_filled().unwrap_or(row.width());
        for (lane, slot) in row.slots().iter().enumerate() {
            let lane_kind = layout
                .columns
                .get(lane)
                .map(|column| column.kind)
                .unwrap_or(ColumnKind::Connector);
            match slot {
                Some(cell) => ht.push_str(&html_cell(cell, lane, row_idx, lane_kind, theme)),
                None => {
                    let class = match lane_kind {
                        ColumnKind::Work => "work",
                        ColumnKind::Connector => "arrow",
                    };
                    let left = if lane < first_filled { " left" } else { "" };
                    ht.push_str(&format!(
                        "\t<td class=\"empty {class}{left} col-{lane} row-{row_idx}\"></td>\n"
                    ));
                }
            }
        }
        ht.push_str("</tr>\n");
    }
    ht.push_str("</table>\n");
    ht
}

fn html_cell(
    cell: &Cell,
    lane: usize,
    row: usize,
    lane_kind: ColumnKind,
    theme: &Theme,
) -> String {
    let (class, style) = match cell.kind {
        CellKind::Work | CellKind::DummyWork => {
            let style = if cell.highlighted {
                format!("background-color:{};", theme.highlight_background)
            } else {
                String::new()
            };
            ("work", style)
        }
        CellKind::Arrow | CellKind::DummyArrow => {
            let style = if lane_kind == ColumnKind::Work {
                format!(
                    "border-top:1px solid {0}; border-bottom:1px solid {0};",
                    theme.border_color
                )
            } else {
                String::new()
            };
            ("arrow", style)
        }
    };

    let events = match cell.detail.as_deref() {
        Some(detail) => format!(
            " onmouseover=\"showTip(event, '{}')\" onmouseout=\"hideTip()\"",
            escape_html(&escape_js(detail))
        ),
        None => String::new(),
    };
    let text = escape_html(&cell.display_text());
    let content = if cell.detail.is_some() {
        format!("<a href=\"#\"{events}>{text}</a>")
    } else {
        text
    };
    format!(
        "\t<td class=\"{class} col-{lane} row-{row}\" style=\"{style}\"{events}>{content}</td>\n"
    )
}

fn stylesheet(theme: &Theme) -> String {
    format!(
        r#"<style>
body {{
	background-color: {background};
	color: {text};
	font-family: {font};
	font-size: {size}px;
}}
table {{
	border-spacing: 0;
	margin: 16px;
	border-collapse: collapse;
}}
th {{
	background-color: {header} !important;
	padding: 8px;
	border: 1px solid {border};
}}
th, td {{
	margin: 0;
	vertical-align: top;
}}
.work {{
	border-right: 1px solid {border};
	border-left: 1px solid {border};
	background-color: {work};
}}
.arrow {{
	background-color: {arrow};
	text-align: center;
	font-size: 80%;
}}
.left.work {{
	background-color: {leading_work};
}}
.left.arrow {{
	background-color: {leading_arrow};
}}
#tip {{
	display: none;
	position: absolute;
	background-color: {tooltip};
	border: 1px solid {border};
	padding: 8px;
	pointer-events: none;
}}
</style>
"#,
        background = theme.background,
        text = theme.text_color,
        font = theme.font_family,
        size = theme.font_size,
        header = theme.header_background,
        border = theme.border_color,
        work = theme.work_background,
        arrow = theme.arrow_background,
        leading_work = theme.leading_work_background,
        leading_arrow = theme.leading_arrow_background,
        tooltip = theme.tooltip_background,
    )
}

/// Render a flow as a GitHub-flavoured Markdown pipe table.
pub fn render_markdown(layout: &Layout) -> String {
    let mut md = String::from("|");
    for column in &layout.columns {
        md.push_str(&format!(" {} |", markdown_text(&column.title)));
    }
    md.push_str("\n|");
    for _ in &layout.columns {
        md.push_str(" --- |");
    }
    md.push('\n');

    for row in layout.grid.rows() {
        md.push('|');
        for slot in row.slots() {
            let text = slot.as_ref().map(markdown_cell).unwrap_or_default();
            md.push_str(&format!(" {text} |"));
        }
        md.push('\n');
    }
    md
}

fn markdown_cell(cell: &Cell) -> String {
    let mut text = markdown_text(&cell.display_text());
    if cell.highlighted {
        text = format!("**{text}**");
    }
    if let Some(detail) = cell.detail.as_deref() {
        text = format!("<span title=\"{}\">{text}</span>", escape_html(detail));
    }
    text
}

fn markdown_text(input: &str) -> String {
    input.replace('\\', "\\\\").replace('|', "\\|")
}

pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn escape_js(input: &str) -> String {
    input.replace('\\', "\\\\").replace('\'', "\\'")
}
