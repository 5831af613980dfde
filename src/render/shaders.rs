// shaders.rs - Shader compilation, program linking and their diagnostics

use crate::render::diagnostics::{InfoLog, DEFAULT_DISPLAY_LIMIT};
use crate::render::driver::{GlDriver, ShaderDriver};
use gl::types::GLuint;
use log::{debug, error};
use std::ffi::{CString, NulError};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader text together with the stage it targets and a label used in
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    label: String,
    stage: ShaderStage,
    text: String,
}

impl ShaderSource {
    pub fn new(label: impl Into<String>, stage: ShaderStage, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stage,
            text: text.into(),
        }
    }

    pub fn vertex(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(label, ShaderStage::Vertex, text)
    }

    pub fn fragment(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(label, ShaderStage::Fragment, text)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{stage} shader '{label}' has no source")]
    EmptySource { label: String, stage: ShaderStage },
    #[error("{stage} shader '{label}' contains a null byte: {source}")]
    Nul {
        label: String,
        stage: ShaderStage,
        #[source]
        source: NulError,
    },
    #[error("driver could not allocate a {stage} shader object for '{label}'")]
    Allocation { label: String, stage: ShaderStage },
    #[error("{stage} shader '{label}' failed to compile:\n{log}")]
    Failed {
        label: String,
        stage: ShaderStage,
        log: InfoLog,
    },
}

impl CompileError {
    pub fn label(&self) -> &str {
        match self {
            CompileError::EmptySource { label, .. }
            | CompileError::Nul { label, .. }
            | CompileError::Allocation { label, .. }
            | CompileError::Failed { label, .. } => label,
        }
    }

    pub fn stage(&self) -> ShaderStage {
        match self {
            CompileError::EmptySource { stage, .. }
            | CompileError::Nul { stage, .. }
            | CompileError::Allocation { stage, .. }
            | CompileError::Failed { stage, .. } => *stage,
        }
    }

    /// Driver diagnostic, present only when the driver rejected the source.
    pub fn log(&self) -> Option<&InfoLog> {
        match self {
            CompileError::Failed { log, .. } => Some(log),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("expected a {expected} shader but '{label}' is a {found} shader")]
    StageMismatch {
        label: String,
        expected: ShaderStage,
        found: ShaderStage,
    },
    #[error("driver could not allocate a program object for '{vertex}' + '{fragment}'")]
    Allocation { vertex: String, fragment: String },
    #[error("program '{vertex}' + '{fragment}' failed to link:\n{log}")]
    Failed {
        vertex: String,
        fragment: String,
        log: InfoLog,
    },
}

impl LinkError {
    pub fn log(&self) -> Option<&InfoLog> {
        match self {
            LinkError::Failed { log, .. } => Some(log),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Link(#[from] LinkError),
}

/// A successfully compiled shader object. Released when dropped.
///
/// The same shader can be linked into any number of programs while it is
/// alive; linked programs keep working after it is dropped.
pub struct CompiledShader<D: ShaderDriver = GlDriver> {
    driver: Rc<D>,
    id: GLuint,
    stage: ShaderStage,
    label: String,
}

impl<D: ShaderDriver> CompiledShader<D> {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<D: ShaderDriver> fmt::Debug for CompiledShader<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledShader")
            .field("id", &self.id)
            .field("stage", &self.stage)
            .field("label", &self.label)
            .finish()
    }
}

impl<D: ShaderDriver> Drop for CompiledShader<D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.id);
    }
}

/// A linked vertex + fragment program, ready for draw calls.
pub struct ShaderProgram<D: ShaderDriver = GlDriver> {
    driver: Rc<D>,
    id: GLuint,
    name: String,
}

impl<D: ShaderDriver> ShaderProgram<D> {
    pub fn id(&self) -> GLuint {
        self.id
    }

    /// `"<vertex label>+<fragment label>"`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_used(&self) {
        self.driver.use_program(self.id);
    }
}

impl<D: ShaderDriver> fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl<D: ShaderDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.driver.delete_program(self.id);
    }
}

/// Turns shader sources into linked programs.
pub struct ShaderProgramBuilder<D: ShaderDriver = GlDriver> {
    driver: Rc<D>,
    display_limit: usize,
}

impl<D: ShaderDriver> ShaderProgramBuilder<D> {
    pub fn new(driver: Rc<D>) -> Self {
        Self {
            driver,
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }

    /// Caps how many bytes of a driver log end up in the log output.
    /// Returned errors always carry the full text.
    pub fn with_display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit;
        self
    }

    pub fn compile_shader(&self, source: &ShaderSource) -> Result<CompiledShader<D>, CompileError> {
        let label = source.label().to_owned();
        let stage = source.stage();

        if source.text().trim().is_empty() {
            return Err(CompileError::EmptySource { label, stage });
        }

        let c_source = match CString::new(source.text()) {
            Ok(c_source) => c_source,
            Err(err) => {
                return Err(CompileError::Nul {
                    label,
                    stage,
                    source: err,
                })
            }
        };

        let id = match self.driver.create_shader(stage) {
            Some(id) => id,
            None => return Err(CompileError::Allocation { label, stage }),
        };

        // owned from here on so every early return releases it
        let shader = CompiledShader {
            driver: Rc::clone(&self.driver),
            id,
            stage,
            label,
        };

        self.driver.compile_shader(id, &c_source);

        if !self.driver.shader_compile_status(id) {
            let log = InfoLog::from_driver(self.driver.shader_info_log(id));
            error!(
                "{} shader '{}' failed to compile:\n{}",
                stage,
                shader.label,
                log.capped(self.display_limit)
            );
            return Err(CompileError::Failed {
                label: shader.label.clone(),
                stage,
                log,
            });
        }

        debug!("Compiled {} shader '{}' (id {})", stage, shader.label, id);
        Ok(shader)
    }

    pub fn link_program(
        &self,
        vertex: &CompiledShader<D>,
        fragment: &CompiledShader<D>,
    ) -> Result<ShaderProgram<D>, LinkError> {
        Self::expect_stage(vertex, ShaderStage::Vertex)?;
        Self::expect_stage(fragment, ShaderStage::Fragment)?;

        let id = self
            .driver
            .create_program()
            .ok_or_else(|| LinkError::Allocation {
                vertex: vertex.label.clone(),
                fragment: fragment.label.clone(),
            })?;

        let program = ShaderProgram {
            driver: Rc::clone(&self.driver),
            id,
            name: format!("{}+{}", vertex.label, fragment.label),
        };

        self.driver.attach_shader(id, vertex.id);
        self.driver.attach_shader(id, fragment.id);
        self.driver.link_program(id);
        let linked = self.driver.program_link_status(id);

        // the linked binary stays with the program; detaching lets the
        // shader objects go away as soon as their owners drop them
        self.driver.detach_shader(id, vertex.id);
        self.driver.detach_shader(id, fragment.id);

        if !linked {
            let log = InfoLog::from_driver(self.driver.program_info_log(id));
            error!(
                "Program '{}' failed to link:\n{}",
                program.name,
                log.capped(self.display_limit)
            );
            return Err(LinkError::Failed {
                vertex: vertex.label.clone(),
                fragment: fragment.label.clone(),
                log,
            });
        }

        debug!("Linked program '{}' (id {})", program.name, id);
        Ok(program)
    }

    /// Compiles both sources and links them, releasing the intermediate
    /// shaders before returning.
    pub fn build_program(
        &self,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<ShaderProgram<D>, BuildError> {
        let vertex = self.compile_shader(vertex)?;
        let fragment = self.compile_shader(fragment)?;
        Ok(self.link_program(&vertex, &fragment)?)
    }

    fn expect_stage(shader: &CompiledShader<D>, expected: ShaderStage) -> Result<(), LinkError> {
        if shader.stage == expected {
            Ok(())
        } else {
            Err(LinkError::StageMismatch {
                label: shader.label.clone(),
                expected,
                found: shader.stage,
            })
        }
    }
}

/// GLSL used by the bundled scenes
pub mod sources {
    pub const POSITION_VERTEX_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
void main()
{
   gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
"#;

    pub const ORANGE_FRAGMENT_SRC: &str = r#"#version 330 core
out vec4 FragColor;
void main()
{
   FragColor = vec4(1.0f, 0.5f, 0.2f, 1.0f);
}
"#;

    pub const YELLOW_FRAGMENT_SRC: &str = r#"#version 330 core
out vec4 FragColor;
void main()
{
   FragColor = vec4(1.0f, 1.0f, 0.0f, 1.0f);
}
"#;
}
