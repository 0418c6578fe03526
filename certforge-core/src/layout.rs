//! Text Layouts
//!
//! Pixel anchors and point sizes are fixed per template family; the
//! templates are designed around them.

use serde::{Deserialize, Serialize};

pub const NAME_SIZE_PRIMARY: f32 = 125.0;
pub const NAME_SIZE_SECONDARY: f32 = 105.0;
pub const NUMBER_SIZE_PRIMARY: f32 = 70.0;
pub const NUMBER_SIZE_SECONDARY: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Weifang and Xuzhou participating-teacher templates
    ParticipatingTeacher,
    /// Other personnel templates
    Other,
}

/// Which font of the set a placement draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    Name,
    Number,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPlacement {
    /// Top-left corner of the text box
    pub x: i32,
    pub y: i32,
    pub size: f32,
    pub font: FontRole,
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub name: TextPlacement,
    pub number: TextPlacement,
}

impl Layout {
    pub fn spec(self) -> LayoutSpec {
        match self {
            Layout::ParticipatingTeacher => LayoutSpec {
                name: placement(680, 1035, NAME_SIZE_PRIMARY, FontRole::Name),
                number: placement(780, 1665, NUMBER_SIZE_PRIMARY, FontRole::Number),
            },
            Layout::Other => LayoutSpec {
                name: placement(690, 1292, NAME_SIZE_SECONDARY, FontRole::Name),
                number: placement(570, 1695, NUMBER_SIZE_SECONDARY, FontRole::Number),
            },
        }
    }
}

fn placement(x: i32, y: i32, size: f32, font: FontRole) -> TextPlacement {
    TextPlacement {
        x,
        y,
        size,
        font,
        align: TextAlign::Center,
    }
}
