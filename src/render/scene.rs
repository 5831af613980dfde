use crate::config::{SceneKind, ShaderConfig};
use crate::render::driver::{GlDriver, ShaderDriver};
use crate::render::mesh::Mesh;
use crate::render::shaders::{
    sources, BuildError, ShaderProgram, ShaderProgramBuilder, ShaderSource,
};
use log::info;
use std::rc::Rc;

/// Per-frame draw callback run by the window after the colour buffer is
/// cleared and before the buffers are swapped.
pub trait Scene {
    fn draw(&mut self);
}

impl<F: FnMut()> Scene for F {
    fn draw(&mut self) {
        self()
    }
}

/// Window with nothing but the clear colour.
#[derive(Debug, Default)]
pub struct EmptyScene;

impl Scene for EmptyScene {
    fn draw(&mut self) {}
}

pub const LEFT_TRIANGLE: [[f32; 3]; 3] = [
    [-1.0, -1.0, 0.0],
    [0.0, -1.0, 0.0],
    [-0.5, 0.0, 0.0],
];

pub const RIGHT_TRIANGLE: [[f32; 3]; 3] = [
    [0.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [0.5, 0.0, 0.0],
];

/// Two triangles side by side, orange on the left and yellow on the right.
pub struct TriangleScene {
    orange: ShaderProgram,
    yellow: ShaderProgram,
    left: Mesh,
    right: Mesh,
}

impl TriangleScene {
    pub fn new(builder: &ShaderProgramBuilder<GlDriver>) -> Result<Self, BuildError> {
        let [orange, yellow] = build_triangle_programs(builder)?;

        Ok(Self {
            orange,
            yellow,
            left: Mesh::from_positions(&LEFT_TRIANGLE),
            right: Mesh::from_positions(&RIGHT_TRIANGLE),
        })
    }
}

impl Scene for TriangleScene {
    fn draw(&mut self) {
        self.orange.set_used();
        self.left.draw();

        self.yellow.set_used();
        self.right.draw();
    }
}

/// Builds the orange and yellow programs from one shared vertex shader. All
/// three shader objects are released before this returns.
pub fn build_triangle_programs<D: ShaderDriver>(
    builder: &ShaderProgramBuilder<D>,
) -> Result<[ShaderProgram<D>; 2], BuildError> {
    let vertex =
        builder.compile_shader(&ShaderSource::vertex("position", sources::POSITION_VERTEX_SRC))?;
    let orange =
        builder.compile_shader(&ShaderSource::fragment("orange", sources::ORANGE_FRAGMENT_SRC))?;
    let yellow =
        builder.compile_shader(&ShaderSource::fragment("yellow", sources::YELLOW_FRAGMENT_SRC))?;

    let orange = builder.link_program(&vertex, &orange)?;
    let yellow = builder.link_program(&vertex, &yellow)?;
    Ok([orange, yellow])
}

/// Creates the configured scene. Must run with the GL context current.
pub fn create(
    kind: SceneKind,
    driver: Rc<GlDriver>,
    shaders: &ShaderConfig,
) -> Result<Box<dyn Scene>, BuildError> {
    info!("Creating {:?} scene", kind);
    match kind {
        SceneKind::Empty => Ok(Box::new(EmptyScene)),
        SceneKind::Triangles => {
            let builder = ShaderProgramBuilder::new(driver)
                .with_display_limit(shaders.diagnostic_display_limit);
            Ok(Box::new(TriangleScene::new(&builder)?))
        }
    }
}
