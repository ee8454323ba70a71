// Inbound editor configuration. Every field has a default so a host may pass
// only what it cares about, e.g. `{"maskColor": "#bdff05"}`.

use crate::blend::BlendMode;
use crate::color::{hex_to_rgb, Rgb};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CURSOR_SIZE: f32 = 10.0;
pub const DEFAULT_MASK_COLOR: &str = "#23272d";
pub const DEFAULT_MASK_OPACITY: f32 = 0.75;
/// Size used before any image has been fitted.
pub const DEFAULT_CONTAINER: (u32, u32) = (256, 256);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub cursor_size: f32,
    pub mask_color: String,
    pub mask_opacity: f32,
    pub mask_blend_mode: BlendMode,
    pub container_width: u32,
    pub container_height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cursor_size: DEFAULT_CURSOR_SIZE,
            mask_color: DEFAULT_MASK_COLOR.to_string(),
            mask_opacity: DEFAULT_MASK_OPACITY,
            mask_blend_mode: BlendMode::Normal,
            container_width: DEFAULT_CONTAINER.0,
            container_height: DEFAULT_CONTAINER.1,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn mask_rgb(&self) -> Result<Rgb> {
        hex_to_rgb(&self.mask_color)
    }
}
