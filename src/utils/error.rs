use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("OpenGL context error: {0}")]
    Context(#[from] glutin::error::Error),

    #[error("Window creation failed: {0}")]
    Window(String),

    #[error("Invalid window size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, AppError>;
