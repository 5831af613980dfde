use crate::render::diagnostics::DEFAULT_DISPLAY_LIMIT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f32; 4],
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "The window of doom".to_string(),
            width: 800,
            height: 600,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Bytes of a compile/link log printed before it is cut off.
    pub diagnostic_display_limit: usize,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            diagnostic_display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }
}
