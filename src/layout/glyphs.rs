use crate::ir::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphStyle {
    #[default]
    Unicode,
    Ascii,
}

/// Decorations for one arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowGlyphs {
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub filler: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSet {
    pub right: ArrowGlyphs,
    pub left: ArrowGlyphs,
    pub continuation: &'static str,
}

impl GlyphSet {
    pub fn for_style(style: GlyphStyle) -> Self {
        match style {
            GlyphStyle::Unicode => Self {
                right: ArrowGlyphs {
                    prefix: "⇒[",
                    suffix: "]⇒",
                    filler: "⇒",
                },
                left: ArrowGlyphs {
                    prefix: "⇐[",
                    suffix: "]⇐",
                    filler: "⇐",
                },
                continuation: "↓",
            },
            GlyphStyle::Ascii => Self {
                right: ArrowGlyphs {
                    prefix: "==[",
                    suffix: "]=>",
                    filler: "==>",
                },
                left: ArrowGlyphs {
                    prefix: "<=[",
                    suffix: "]==",
                    filler: "<==",
                },
                continuation: "↓",
            },
        }
    }

    pub fn arrow(&self, direction: Direction) -> ArrowGlyphs {
        match direction {
            Direction::LeftToRight => self.right,
            Direction::RightToLeft => self.left,
        }
    }
}
