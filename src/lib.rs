pub mod config;
pub mod render;
pub mod utils;
pub mod window;

// Re-export commonly used types
pub use config::{AppConfig, SceneKind, ShaderConfig, WindowConfig};
pub use render::scene::{EmptyScene, Scene, TriangleScene};
pub use render::shaders::{
    BuildError, CompileError, CompiledShader, LinkError, ShaderProgram, ShaderProgramBuilder,
    ShaderSource, ShaderStage,
};
pub use utils::error::AppError;
pub use window::AppWindow;
