// window.rs - Window, GL context and the render loop shared by every scene

use crate::config::WindowConfig;
use crate::render::driver::GlDriver;
use crate::render::scene::Scene;
use crate::utils::error::{AppError, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::{ffi::CString, num::NonZeroU32, ptr, rc::Rc};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

pub struct AppWindow {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    driver: Rc<GlDriver>,
    clear_color: [f32; 4],
}

impl AppWindow {
    /// Opens the window, creates an OpenGL 3.3 core context and makes it
    /// current on this thread.
    pub fn new(config: &WindowConfig) -> Result<(Self, EventLoop<()>)> {
        if config.width == 0 || config.height == 0 {
            return Err(AppError::InvalidSize {
                width: config.width,
                height: config.height,
            });
        }

        info!("Initializing window...");

        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("no GL config to pick from")
            })
            .map_err(|e| AppError::Window(e.to_string()))?;

        let window =
            window.ok_or_else(|| AppError::Window("display builder returned no window".into()))?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes)? };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs)? };

        let gl_context = not_current.make_current(&gl_surface)?;

        if config.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("Failed to enable vsync: {}", e);
            }
        }

        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => ptr::null(),
        });

        let size = window.inner_size();
        unsafe {
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
        }

        info!(
            "Window '{}' ready at {}x{}",
            config.title, size.width, size.height
        );

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                driver: Rc::new(GlDriver),
                clear_color: config.clear_color,
            },
            event_loop,
        ))
    }

    /// Driver for the context owned by this window.
    pub fn driver(&self) -> Rc<GlDriver> {
        Rc::clone(&self.driver)
    }

    fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            // minimized
            return;
        };
        self.gl_surface.resize(&self.gl_context, width, height);
        unsafe {
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    fn render_frame(&self, scene: &mut dyn Scene) {
        let [r, g, b, a] = self.clear_color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        scene.draw();

        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            error!("Failed to swap buffers: {}", e);
        }
    }

    /// Runs the render loop until the window is closed or Escape is pressed.
    /// The scene is dropped while the context is still current.
    pub fn run(self, event_loop: EventLoop<()>, scene: Box<dyn Scene>) -> Result<()> {
        let mut scene = Some(scene);

        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => elwt.exit(),
                WindowEvent::Resized(size) => self.resize(size),
                WindowEvent::RedrawRequested => {
                    if let Some(scene) = scene.as_deref_mut() {
                        self.render_frame(scene);
                    }
                }
                _ => (),
            },
            Event::AboutToWait => self.window.request_redraw(),
            Event::LoopExiting => {
                info!("Shutting down...");
                scene.take();
            }
            _ => (),
        })?;

        Ok(())
    }
}
