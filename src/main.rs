#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod app;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

use app::{App, AppPhase, ViewMode};
use distview_rs::render::RenderState;
use distview_rs::ui::{config_dialog, input};

const APP_TITLE: &str = "Distview-rs";

/// Main application handler for winit's event loop.
struct DistviewApp {
    app: App,
    render_state: Option<RenderState>,
    window: Option<Arc<Window>>,
}

impl DistviewApp {
    fn new(result_path: Option<PathBuf>, view: ViewMode) -> Self {
        Self {
            app: App::new(result_path, view),
            render_state: None,
            window: None,
        }
    }

    fn update_window_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        match &self.app.result_path {
            Some(path) => window.set_title(&format!("{APP_TITLE} - {}", path.display())),
            None => window.set_title(&format!("{APP_TITLE} - Distribution Viewer")),
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Match the window to the configured canvas size.
    fn fit_window_to_canvas(&self) {
        if let Some(window) = &self.window {
            let size = winit::dpi::PhysicalSize::new(
                self.app.layout_config.canvas_width.round() as u32,
                self.app.layout_config.canvas_height.round() as u32,
            );
            let _ = window.request_inner_size(size);
        }
    }

    fn open_settings(&mut self) {
        let settings = config_dialog::run_config_dialog(
            &format!("{APP_TITLE} - Settings"),
            self.app.dialog_settings(),
        );
        if let Some(settings) = settings {
            self.app.apply_settings(settings);
            self.fit_window_to_canvas();
            self.update_window_title();
            self.request_redraw();
        }
    }

    fn pick_result_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Optimization result", &["json"])
            .pick_file()
        {
            self.app.open_file(path);
            self.update_window_title();
            self.request_redraw();
        }
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: input::InputAction) {
        match action {
            input::InputAction::Reload => self.app.reload(),
            input::InputAction::OpenFile => {
                self.pick_result_file();
                return;
            }
            input::InputAction::OpenSettings => {
                self.open_settings();
                return;
            }
            input::InputAction::ToggleLabels => self.app.toggle_labels(),
            input::InputAction::ToggleChart => self.app.toggle_view(ViewMode::Chart),
            input::InputAction::ToggleStats => self.app.toggle_view(ViewMode::Stats),
            input::InputAction::Quit => {
                event_loop.exit();
                return;
            }
            input::InputAction::None => return,
        }
        self.request_redraw();
    }
}

impl ApplicationHandler for DistviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = &self.app.layout_config;
        let attrs = WindowAttributes::default()
            .with_title(format!("{APP_TITLE} - Distribution Viewer"))
            .with_inner_size(winit::dpi::PhysicalSize::new(
                config.canvas_width.round() as u32,
                config.canvas_height.round() as u32,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());
        self.update_window_title();

        match pollster::block_on(RenderState::new(window.clone())) {
            Ok(state) => {
                let size = window.inner_size();
                tracing::info!(
                    "Window initialized: scale_factor={:.3}, physical_size={}x{}",
                    window.scale_factor(),
                    size.width,
                    size.height
                );
                self.app.resize(size.width, size.height);
                self.render_state = Some(state);
                self.app.start_load();
                window.request_redraw();
            }
            Err(e) => {
                tracing::error!("Failed to initialize GPU: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render_state {
                    render.resize(size.width, size.height);
                    self.app.resize(size.width, size.height);
                    self.request_redraw();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.app.mouse.x = position.x as f32;
                self.app.mouse.y = position.y as f32;
                // The tooltip follows the cursor, so any movement over a square redraws.
                if self.app.update_hover() || self.app.hover.is_some() {
                    self.request_redraw();
                }
            }

            WindowEvent::CursorLeft { .. } => {
                if self.app.hover.take().is_some() {
                    self.request_redraw();
                }
            }

            WindowEvent::DroppedFile(path) => {
                self.app.open_file(path);
                self.update_window_title();
                self.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let action = input::process_key(event.logical_key.clone(), event.state);
                self.handle_action(event_loop, action);
            }

            WindowEvent::RedrawRequested => {
                if let Some(window) = &self.window {
                    window.set_cursor(if self.app.is_loading() {
                        CursorIcon::Progress
                    } else {
                        CursorIcon::Default
                    });
                }

                if self.app.is_loading() {
                    self.app.poll_load();
                }

                if self.app.needs_relayout && self.app.phase == AppPhase::Ready {
                    self.app.relayout();
                    self.app.update_hover();
                }

                self.app.rebuild_scene();

                if let Some(render) = &mut self.render_state {
                    if let Err(e) = render.render(&self.app.scene) {
                        tracing::error!("Render error: {}", e);
                    }
                }

                // Keep redrawing while the loader runs so the spinner animates.
                if self.app.is_loading() {
                    self.request_redraw();
                }
            }

            WindowEvent::MouseInput { state, .. } if state == ElementState::Pressed => {
                if self.app.phase == AppPhase::WaitingForFile {
                    self.pick_result_file();
                }
            }

            _ => {}
        }
    }
}

/// Command line: `Distview-rs [result.json] [--chart | --stats]`
fn parse_args() -> (Option<PathBuf>, ViewMode) {
    let mut path = None;
    let mut view = ViewMode::Canvas;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--chart" => view = ViewMode::Chart,
            "--stats" => view = ViewMode::Stats,
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => tracing::warn!("Ignoring extra argument {:?}", arg),
        }
    }
    (path, view)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("distview_rs=info".parse()?)
                .add_directive("Distview_rs=info".parse()?),
        )
        .init();

    let (result_path, view) = parse_args();
    tracing::info!(
        "{} starting, result file: {:?}, view: {:?}",
        APP_TITLE,
        result_path,
        view
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = DistviewApp::new(result_path, view);
    event_loop.run_app(&mut app)?;

    Ok(())
}
