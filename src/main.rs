use anyhow::{anyhow, Context, Result};
use gl_playground::{config, render::scene, AppWindow};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

fn main() -> Result<()> {
    let config = config::load_or_create_config().context("Failed to load configuration")?;

    let level: LevelFilter = config
        .log_level
        .parse()
        .map_err(|_| anyhow!("Invalid log level '{}'", config.log_level))?;
    SimpleLogger::new().with_level(level).init()?;
    info!("Initializing application...");

    let (window, event_loop) = AppWindow::new(&config.window)?;

    let scene = scene::create(config.scene, window.driver(), &config.shaders)
        .context("Refusing to draw with an unusable shader program")?;

    window.run(event_loop, scene)?;

    Ok(())
}
