pub mod core;
pub mod rendering;

pub use core::{load_from_path, load_or_create_config, AppConfig, SceneKind};
pub use rendering::{ShaderConfig, WindowConfig};
