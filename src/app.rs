use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

use vello::Scene;

use distview_rs::distribution::stats::ResultStats;
use distview_rs::distribution::validate::{self, Severity, ValidationIssue};
use distview_rs::distribution::{self, OptimizationResult};
use distview_rs::layout::{self, LayoutConfig, LayoutResult};
use distview_rs::render::chart::build_chart_scene;
use distview_rs::render::scene::{build_scene, SceneSettings};
use distview_rs::render::stats::build_stats_scene;
use distview_rs::render::text::{TextRenderer, DEFAULT_FONT};
use distview_rs::ui::config_dialog::DialogResult;
use distview_rs::ui::input::{self, MouseState};
use distview_rs::ui::{overlay, tooltip};

/// Application state machine phases.
#[derive(Debug, PartialEq, Eq)]
pub enum AppPhase {
    /// No result file chosen yet
    WaitingForFile,
    /// Reading and parsing the result file in the background
    Loading,
    /// A result is loaded (its layout may still have been rejected)
    Ready,
    /// The last load failed
    Failed,
}

/// What the window shows for a loaded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Canvas,
    /// Best fitness per generation
    Chart,
    /// Stat cards, item table and run parameters
    Stats,
}

/// Message sent by the background loader.
enum LoadEvent {
    Loaded(OptimizationResult),
    Failed(String),
}

/// Top-level application state.
pub struct App {
    pub phase: AppPhase,
    pub result_path: Option<PathBuf>,
    load_rx: Option<mpsc::Receiver<LoadEvent>>,
    loading_started: Instant,

    // Data
    pub result: Option<OptimizationResult>,
    pub layout: Option<LayoutResult>,
    pub issues: Vec<ValidationIssue>,
    /// Lines shown instead of the canvas when there is nothing to draw.
    pub status: Vec<String>,

    // Settings
    pub layout_config: LayoutConfig,
    pub scene_settings: SceneSettings,
    pub label_font_path: String,
    pub text_renderer: TextRenderer,

    // UI state
    pub mouse: MouseState,
    pub hover: Option<usize>,
    pub view: ViewMode,

    // Rendering
    pub scene: Scene,
    pub needs_relayout: bool,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl App {
    pub fn new(result_path: Option<PathBuf>, view: ViewMode) -> Self {
        let mut text_renderer = TextRenderer::new();
        if let Err(e) = text_renderer.load_system_font(DEFAULT_FONT) {
            tracing::warn!("Failed to load system font, falling back to estimated text: {}", e);
        } else {
            tracing::info!("Loaded default system font for labels");
        }

        let layout_config = LayoutConfig::default();
        Self {
            phase: AppPhase::WaitingForFile,
            result_path,
            load_rx: None,
            loading_started: Instant::now(),
            result: None,
            layout: None,
            issues: Vec::new(),
            status: vec![
                "No optimization result loaded".to_string(),
                "Press O to open a result file, F2 for settings".to_string(),
            ],
            viewport_width: layout_config.canvas_width as f32,
            viewport_height: layout_config.canvas_height as f32,
            layout_config,
            scene_settings: SceneSettings::default(),
            label_font_path: String::new(),
            text_renderer,
            mouse: MouseState::default(),
            hover: None,
            view,
            scene: Scene::new(),
            needs_relayout: false,
        }
    }

    /// Start loading the current result file in a background thread.
    pub fn start_load(&mut self) {
        let Some(path) = self.result_path.clone() else {
            return;
        };
        tracing::info!("Loading result file {:?}", path);

        self.phase = AppPhase::Loading;
        self.loading_started = Instant::now();
        let (tx, rx) = mpsc::channel();
        self.load_rx = Some(rx);

        std::thread::spawn(move || {
            let event = match distribution::load_result(&path) {
                Ok(result) => LoadEvent::Loaded(result),
                Err(e) => {
                    tracing::error!("Load failed: {}", e);
                    LoadEvent::Failed(e.to_string())
                }
            };
            let _ = tx.send(event);
        });
    }

    /// Open a different result file.
    pub fn open_file(&mut self, path: PathBuf) {
        self.result_path = Some(path);
        self.start_load();
    }

    /// Re-read the current result file.
    pub fn reload(&mut self) {
        if self.phase != AppPhase::Loading {
            self.start_load();
        }
    }

    /// Poll for load completion. Call this from the event loop.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = &self.load_rx else {
            return false;
        };
        let event = match rx.try_recv() {
            Ok(event) => event,
            Err(mpsc::TryRecvError::Empty) => return false,
            Err(mpsc::TryRecvError::Disconnected) => {
                LoadEvent::Failed("loader thread exited unexpectedly".to_string())
            }
        };
        self.load_rx = None;

        match event {
            LoadEvent::Loaded(result) => {
                tracing::info!(
                    "Result loaded: {} items, {} instances requested, {} generations",
                    result.distribution.len(),
                    result.requested_instances(),
                    result.fitness_history.len()
                );
                self.result = Some(result);
                self.phase = AppPhase::Ready;
                self.needs_relayout = true;
            }
            LoadEvent::Failed(message) => {
                self.result = None;
                self.layout = None;
                self.hover = None;
                self.status = vec!["Could not load the result file".to_string(), message];
                self.phase = AppPhase::Failed;
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.phase == AppPhase::Loading
    }

    /// Validate the loaded items and recompute the layout.
    pub fn relayout(&mut self) {
        self.needs_relayout = false;
        self.hover = None;
        let Some(result) = &self.result else {
            self.layout = None;
            return;
        };

        self.issues = validate::validate(&result.distribution);
        for issue in &self.issues {
            match issue.severity() {
                Severity::Warning => tracing::warn!("{}", issue),
                Severity::Error => tracing::error!("{}", issue),
            }
        }
        if validate::has_errors(&self.issues) {
            self.layout = None;
            self.status = std::iter::once("The distribution cannot be drawn".to_string())
                .chain(
                    self.issues
                        .iter()
                        .filter(|i| i.severity() == Severity::Error)
                        .take(6)
                        .map(|i| i.to_string()),
                )
                .collect();
            return;
        }

        let computed =
            layout::compute_layout(&result.distribution, &self.layout_config, &self.text_renderer);
        match computed {
            Ok(computed) => self.layout = Some(computed),
            Err(e) => {
                tracing::error!("Layout skipped: {}", e);
                self.layout = None;
                self.status = vec!["Layout skipped".to_string(), e.to_string()];
            }
        }
    }

    /// Rebuild the Vello scene from the current state.
    pub fn rebuild_scene(&mut self) {
        let vw = self.viewport_width as f64;
        let vh = self.viewport_height as f64;

        match (&self.phase, &self.result, &self.layout) {
            (AppPhase::Loading, _, _) => {
                self.scene.reset();
                let elapsed = self.loading_started.elapsed().as_secs_f32();
                overlay::render_loading_overlay(
                    &mut self.scene,
                    &mut self.text_renderer,
                    vw,
                    vh,
                    elapsed,
                );
            }
            (AppPhase::Ready, Some(result), _) if self.view == ViewMode::Chart => {
                if result.fitness_history.is_empty() {
                    self.scene.reset();
                    overlay::render_message(
                        &mut self.scene,
                        &mut self.text_renderer,
                        &["This result has no fitness history".to_string()],
                        vw,
                        vh,
                    );
                } else {
                    build_chart_scene(
                        &mut self.scene,
                        &result.fitness_history,
                        vw,
                        vh,
                        &mut self.text_renderer,
                    );
                }
            }
            (AppPhase::Ready, Some(result), _) if self.view == ViewMode::Stats => {
                let stats = ResultStats::from_result(result, self.layout_config.max_area);
                build_stats_scene(
                    &mut self.scene,
                    &stats,
                    &self.layout_config.unit_suffix,
                    vw,
                    vh,
                    &mut self.text_renderer,
                );
            }
            (AppPhase::Ready, Some(result), Some(layout)) => {
                build_scene(
                    &mut self.scene,
                    layout,
                    &self.layout_config,
                    &mut self.text_renderer,
                    &self.scene_settings,
                );

                if let Some(square) = self.hover.and_then(|i| layout.squares.get(i)) {
                    overlay::render_hover_highlight(&mut self.scene, square);
                    if let Some(info) = tooltip::build_tooltip(
                        &result.distribution,
                        square,
                        &self.layout_config.unit_suffix,
                    ) {
                        overlay::render_tooltip(
                            &mut self.scene,
                            &mut self.text_renderer,
                            &info,
                            self.mouse.x,
                            self.mouse.y,
                            vw,
                            vh,
                        );
                    }
                }
                overlay::render_truncation_badge(
                    &mut self.scene,
                    &mut self.text_renderer,
                    &layout.truncation,
                    vw,
                );
            }
            _ => {
                self.scene.reset();
                overlay::render_message(
                    &mut self.scene,
                    &mut self.text_renderer,
                    &self.status,
                    vw,
                    vh,
                );
            }
        }
    }

    /// Update hover state from the mouse position. Returns true if it changed.
    pub fn update_hover(&mut self) -> bool {
        let hover = match (&self.layout, self.view) {
            (Some(layout), ViewMode::Canvas) => {
                input::hit_test(&layout.squares, self.mouse.x, self.mouse.y)
            }
            _ => None,
        };
        let changed = hover != self.hover;
        self.hover = hover;
        changed
    }

    pub fn toggle_labels(&mut self) {
        self.scene_settings.show_labels = !self.scene_settings.show_labels;
    }

    /// Switch to `view`, or back to the canvas if it is already showing.
    pub fn toggle_view(&mut self, view: ViewMode) {
        self.view = if self.view == view {
            ViewMode::Canvas
        } else {
            view
        };
        self.hover = None;
    }

    /// Current settings, as handed to the settings dialog.
    pub fn dialog_settings(&self) -> DialogResult {
        DialogResult {
            result_path: self.result_path.clone(),
            layout: self.layout_config.clone(),
            scene: self.scene_settings,
            label_font_path: self.label_font_path.clone(),
        }
    }

    /// Apply settings returned by the dialog.
    pub fn apply_settings(&mut self, settings: DialogResult) {
        let font_path = settings.label_font_path.trim();
        if !font_path.is_empty() && font_path != self.label_font_path.trim() {
            if let Err(e) = self
                .text_renderer
                .load_font_from_path(DEFAULT_FONT, Path::new(font_path))
            {
                tracing::warn!("Failed to load custom font '{}': {}", font_path, e);
            }
        }
        self.label_font_path = settings.label_font_path;
        self.scene_settings = settings.scene;
        self.layout_config = settings.layout;
        self.needs_relayout = true;

        if settings.result_path.is_some() && settings.result_path != self.result_path {
            self.result_path = settings.result_path;
            self.start_load();
        }
    }

    /// Handle viewport resize. The canvas keeps its configured size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport_width = width as f32;
        self.viewport_height = height as f32;
    }
}
