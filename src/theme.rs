use serde::{Deserialize, Serialize};

/// Colours and type for the HTML table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub border_color: String,
    pub header_background: String,
    pub work_background: String,
    pub arrow_background: String,
    pub leading_work_background: String,
    pub leading_arrow_background: String,
    pub highlight_background: String,
    pub tooltip_background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 18.0,
            background: "#EEEEEE".to_string(),
            text_color: "#000000".to_string(),
            border_color: "black".to_string(),
            header_background: "white".to_string(),
            work_background: "white".to_string(),
            arrow_background: "rgba(0,0,0,0)".to_string(),
            leading_work_background: "#CCC".to_string(),
            leading_arrow_background: "#AAA".to_string(),
            highlight_background: "yellow".to_string(),
            tooltip_background: "#DEF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#F7FAFF".to_string(),
            text_color: "#1C2430".to_string(),
            border_color: "#7A8AA6".to_string(),
            header_background: "#FFFFFF".to_string(),
            work_background: "#FFFFFF".to_string(),
            arrow_background: "rgba(0,0,0,0)".to_string(),
            leading_work_background: "#E4EAF4".to_string(),
            leading_arrow_background: "#D7E0F0".to_string(),
            highlight_background: "#FFF3B0".to_string(),
            tooltip_background: "#EEF2F8".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
