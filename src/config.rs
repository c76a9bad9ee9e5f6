use crate::layout::GlyphStyle;
use crate::parser::HeaderDialect;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub glyphs: GlyphStyle,
    /// Reject arrows that point at the lane they start from instead of
    /// treating them as no-ops.
    pub strict_self_transitions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub title: Option<String>,
    /// Wrap the table in a full page with stylesheet and tooltip script.
    pub standalone: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: None,
            standalone: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    /// Forced header dialect; detected per flow when unset.
    pub dialect: Option<HeaderDialect>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    border_color: Option<String>,
    header_background: Option<String>,
    work_background: Option<String>,
    arrow_background: Option<String>,
    leading_work_background: Option<String>,
    leading_arrow_background: Option<String>,
    highlight_background: Option<String>,
    tooltip_background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    glyphs: Option<GlyphStyle>,
    strict_self_transitions: Option<bool>,
    dialect: Option<String>,
    title: Option<String>,
    standalone: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse a config document. Plain JSON is tried first, then JSON5 so that
/// hand-written files may carry comments and trailing commas.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|err| anyhow::anyhow!("invalid config: {json_err}; as JSON5: {err}"))?,
    };

    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            theme.font_size = v;
        }
        if let Some(v) = vars.background {
            theme.background = v;
        }
        if let Some(v) = vars.text_color {
            theme.text_color = v;
        }
        if let Some(v) = vars.border_color {
            theme.border_color = v;
        }
        if let Some(v) = vars.header_background {
            theme.header_background = v;
        }
        if let Some(v) = vars.work_background {
            theme.work_background = v;
        }
        if let Some(v) = vars.arrow_background {
            theme.arrow_background = v;
        }
        if let Some(v) = vars.leading_work_background {
            theme.leading_work_background = v;
        }
        if let Some(v) = vars.leading_arrow_background {
            theme.leading_arrow_background = v;
        }
        if let Some(v) = vars.highlight_background {
            theme.highlight_background = v;
        }
        if let Some(v) = vars.tooltip_background {
            theme.tooltip_background = v;
        }
    }

    if let Some(glyphs) = parsed.glyphs {
        config.layout.glyphs = glyphs;
    }
    if let Some(strict) = parsed.strict_self_transitions {
        config.layout.strict_self_transitions = strict;
    }
    if let Some(token) = parsed.dialect.as_deref() {
        if token != "auto" {
            let dialect = HeaderDialect::from_token(token)
                .ok_or_else(|| anyhow::anyhow!("unknown header dialect `{token}`"))?;
            config.dialect = Some(dialect);
        }
    }
    if let Some(title) = parsed.title {
        config.render.title = Some(title);
    }
    if let Some(standalone) = parsed.standalone {
        config.render.standalone = standalone;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.glyphs, GlyphStyle::Unicode);
        assert!(!config.layout.strict_self_transitions);
        assert!(config.render.standalone);
        assert_eq!(config.dialect, None);
        assert_eq!(config.theme.highlight_background, "yellow");
    }

    #[test]
    fn parses_json_config() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "highlightBackground": "#FF0", "fontSize": 12 },
                "glyphs": "ascii",
                "strictSelfTransitions": true,
                "dialect": "pipe",
                "title": "Checkout"
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.highlight_background, "#FF0");
        assert_eq!(config.theme.font_size, 12.0);
        assert_eq!(config.theme.border_color, Theme::modern().border_color);
        assert_eq!(config.layout.glyphs, GlyphStyle::Ascii);
        assert!(config.layout.strict_self_transitions);
        assert_eq!(config.dialect, Some(HeaderDialect::Delimited('|')));
        assert_eq!(config.render.title.as_deref(), Some("Checkout"));
    }

    #[test]
    fn accepts_json5_comments_and_trailing_commas() {
        let config = parse_config(
            r#"{
                // render fragments only
                standalone: false,
                dialect: "auto",
            }"#,
        )
        .unwrap();
        assert!(!config.render.standalone);
        assert_eq!(config.dialect, None);
    }

    #[test]
    fn rejects_unknown_dialect() {
        assert!(parse_config(r#"{"dialect": "yaml"}"#).is_err());
        assert!(parse_config("not a config").is_err());
    }
}
