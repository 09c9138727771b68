use std::any::Any;
use std::env;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use log::{info, warn};
use pollster::block_on;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey as WinitNamedKey};
use winit::window::Window;

use shading_viewer::app::{frame_summary, load_catalog, load_mesh, state_summary};
use shading_viewer::{
    KeyBindings, KeyCode, Mesh, Modifiers, MouseButton, NamedKey, Renderer, Viewer,
};

const WINDOW_WIDTH: f64 = 640.0;
const WINDOW_HEIGHT: f64 = 480.0;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Some(options) = CliOptions::parse()? else {
        eprintln!("Please specify the resource directory.\n{USAGE}");
        return Ok(());
    };
    let catalog = load_catalog(options.catalog.as_deref())?;
    println!(
        "Loaded catalog with {} materials and {} lights",
        catalog.materials.len(),
        catalog.lights.len()
    );
    let scene = catalog
        .into_scene()
        .context("catalog cannot drive the viewer")?;

    let mesh = load_mesh(&options.resource_dir.join(&options.mesh));
    println!(
        "Mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    let mut viewer = Viewer::new(scene, KeyBindings::default());
    if let Some(keys) = options.keys.as_deref() {
        let bound = viewer.replay_keys(keys);
        println!("Replayed {bound} bound key(s)");
    }

    if options.summary_only {
        print_final_state(viewer);
        return Ok(());
    }

    match run_interactive(viewer.clone(), &mesh) {
        Ok(viewer) => {
            print_final_state(viewer);
            Ok(())
        }
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!(
                "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
            );
            print_final_state(viewer);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn print_final_state(mut viewer: Viewer) {
    print!("{}", state_summary(viewer.scene()));
    let frame = viewer.frame((WINDOW_WIDTH / WINDOW_HEIGHT) as f32);
    println!("{}", frame_summary(&frame));
}

fn run_interactive(viewer: Viewer, mesh: &Mesh) -> Result<Viewer> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;

    #[allow(deprecated)]
    let window = Arc::new(
        event_loop
            .create_window(
                Window::default_attributes()
                    .with_title("Shading Viewer")
                    .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT)),
            )
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let renderer = block_on(Renderer::new(Arc::clone(&window), mesh))?;
    let mut app = AppState {
        renderer,
        viewer,
        last_error: None,
    };

    #[allow(deprecated)]
    let result = event_loop.run(|event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        if let Err(err) = app.process_event(&event, elwt) {
            app.last_error = Some(err);
            elwt.exit();
        }
    });
    result.context("event loop terminated abnormally")?;

    match app.last_error {
        Some(err) => Err(err),
        None => Ok(app.viewer),
    }
}

struct AppState {
    renderer: Renderer,
    viewer: Viewer,
    last_error: Option<anyhow::Error>,
}

impl AppState {
    fn process_event(&mut self, event: &Event<()>, elwt: &ActiveEventLoop) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => self.renderer.resize(*size),
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = self.renderer.window().inner_size();
                        self.renderer.resize(size);
                    }
                    WindowEvent::KeyboardInput { event, .. } => self.handle_keyboard(event, elwt),
                    WindowEvent::ModifiersChanged(modifiers) => {
                        let state = modifiers.state();
                        self.viewer.set_modifiers(Modifiers {
                            shift: state.shift_key(),
                            ctrl: state.control_key(),
                            alt: state.alt_key(),
                        });
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        self.viewer
                            .mouse_button(map_mouse_button(*button), *state == ElementState::Pressed);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        let pos = Vec2::new(position.x as f32, position.y as f32);
                        self.viewer.cursor_moved(pos);
                    }
                    WindowEvent::RedrawRequested => self.redraw()?,
                    _ => {}
                }
            }
            Event::AboutToWait => {
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let frame = self.viewer.frame(self.renderer.aspect());
        if let Err(err) = self.renderer.render(&frame) {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = self.renderer.window().inner_size();
                    self.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    info!("Surface timeout; retrying next frame");
                }
                wgpu::SurfaceError::Other => {
                    warn!("Surface reported an unknown error; retrying next frame");
                }
            }
        }
        Ok(())
    }

    // Key repeats are delivered too, so holding a nudge key keeps moving
    // the light.
    fn handle_keyboard(&mut self, event: &KeyEvent, elwt: &ActiveEventLoop) {
        if event.state != ElementState::Pressed {
            return;
        }
        match map_key(&event.logical_key) {
            Some(KeyCode::Named(NamedKey::Escape)) => elwt.exit(),
            Some(key) => {
                self.viewer.key_pressed(key);
            }
            None => {}
        }
    }
}

fn map_key(key: &Key) -> Option<KeyCode> {
    match key {
        Key::Named(WinitNamedKey::Escape) => Some(KeyCode::Named(NamedKey::Escape)),
        Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(KeyCode::Character(ch)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    let index = match button {
        WinitMouseButton::Left => 0,
        WinitMouseButton::Right => 1,
        WinitMouseButton::Middle => 2,
        WinitMouseButton::Back => 3,
        WinitMouseButton::Forward => 4,
        WinitMouseButton::Other(value) => value.min(u8::MAX as u16) as u8,
    };
    MouseButton::new(index)
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

const USAGE: &str = "Usage: shading-viewer <RESOURCE_DIR> [--mesh FILE] [--catalog FILE] [--keys KEYS] [--summary-only]";

struct CliOptions {
    resource_dir: PathBuf,
    mesh: String,
    catalog: Option<PathBuf>,
    keys: Option<String>,
    summary_only: bool,
}

impl CliOptions {
    /// Returns `None` when no resource directory was given.
    fn parse() -> Result<Option<Self>> {
        let mut args = env::args().skip(1);
        let Some(resource_dir) = args.next() else {
            return Ok(None);
        };
        let mut options = Self {
            resource_dir: PathBuf::from(resource_dir),
            mesh: "bunny.obj".to_string(),
            catalog: None,
            keys: None,
            summary_only: false,
        };
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("{flag} expects a value\n{USAGE}"))
            };
            match arg.as_str() {
                "--mesh" => options.mesh = value("--mesh")?,
                "--catalog" => options.catalog = Some(PathBuf::from(value("--catalog")?)),
                "--keys" => options.keys = Some(value("--keys")?),
                "--summary-only" => options.summary_only = true,
                other => {
                    return Err(anyhow!("Unknown argument: {other}\n{USAGE}"));
                }
            }
        }
        Ok(Some(options))
    }
}
