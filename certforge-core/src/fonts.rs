//! Font Set - name and number faces loaded from the resource directory

use rusttype::Font;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::FontRole;
use crate::pipeline::RenderError;

/// CJK-capable face for recipient names
pub const DEFAULT_NAME_FONT: &str = "SIMLI.TTF";
/// Latin bold face for certificate numbers
pub const DEFAULT_NUMBER_FONT: &str = "timesbd.ttf";

/// Font file names, relative to the resource directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    pub name_font: String,
    pub number_font: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            name_font: DEFAULT_NAME_FONT.to_string(),
            number_font: DEFAULT_NUMBER_FONT.to_string(),
        }
    }
}

impl FontConfig {
    pub fn paths(&self, resource_dir: &Path) -> [PathBuf; 2] {
        [
            resource_dir.join(&self.name_font),
            resource_dir.join(&self.number_font),
        ]
    }
}

pub struct FontSet {
    name: Font<'static>,
    number: Font<'static>,
}

impl FontSet {
    /// Load both faces. Both must parse before anything is drawn.
    pub fn load(resource_dir: &Path, config: &FontConfig) -> Result<Self, RenderError> {
        let [name_path, number_path] = config.paths(resource_dir);
        Ok(Self {
            name: load_font(&name_path)?,
            number: load_font(&number_path)?,
        })
    }

    pub fn get(&self, role: FontRole) -> &Font<'static> {
        match role {
            FontRole::Name => &self.name,
            FontRole::Number => &self.number,
        }
    }
}

pub fn load_font(path: &Path) -> Result<Font<'static>, RenderError> {
    let data = fs::read(path).map_err(|e| RenderError::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "loading font");
    Font::try_from_vec(data).ok_or_else(|| RenderError::FontLoad {
        path: path.to_path_buf(),
        reason: "not a TrueType/OpenType font".to_string(),
    })
}
