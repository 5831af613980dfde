pub mod diagnostics;
pub mod driver;
#[cfg(test)]
pub(crate) mod fake_driver;
pub mod mesh;
pub mod scene;
pub mod shaders;

pub use diagnostics::InfoLog;
pub use driver::{GlDriver, ShaderDriver};
pub use scene::{EmptyScene, Scene, TriangleScene};
pub use shaders::{
    BuildError, CompileError, CompiledShader, LinkError, ShaderProgram, ShaderProgramBuilder,
    ShaderSource, ShaderStage,
};
