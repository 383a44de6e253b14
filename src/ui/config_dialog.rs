use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use iced::widget::{button, checkbox, column, container, row, slider, text, text_input};
use iced::{application, window, Element, Length, Task, Theme};

use crate::layout::{LayoutConfig, OverflowPolicy};
use crate::render::scene::SceneSettings;

#[derive(Clone)]
pub struct DialogResult {
    pub result_path: Option<PathBuf>,
    pub layout: LayoutConfig,
    pub scene: SceneSettings,
    pub label_font_path: String,
}

pub fn run_config_dialog(title: &str, initial: DialogResult) -> Option<DialogResult> {
    let output = Arc::new(Mutex::new(None));
    let output_for_app = output.clone();
    let title_owned = title.to_string();

    let run = application(
        move |_state: &ConfigDialog| title_owned.clone(),
        move |state: &mut ConfigDialog, message: Message| state.update(message),
        view,
    )
    .theme(|_| Theme::Light)
    .window_size((760.0, 640.0))
    .run_with(move || (ConfigDialog::new(initial, output_for_app), Task::none()));

    if run.is_err() {
        return None;
    }
    output.lock().ok().and_then(|g| g.clone())
}

#[derive(Debug, Clone)]
enum Message {
    PathChanged(String),
    BrowsePath,
    CanvasWidthChanged(f32),
    CanvasHeightChanged(f32),
    MaxAreaChanged(f32),
    ShrinkChanged(f32),
    MarginChanged(f32),
    GutterChanged(f32),
    SkipOverflowChanged(bool),
    ShowLabelsChanged(bool),
    LabelFontScaleChanged(f32),
    LabelFontPathChanged(String),
    Apply,
    Cancel,
}

struct ConfigDialog {
    path_text: String,
    canvas_width: f32,
    canvas_height: f32,
    max_area: f32,
    shrink: f32,
    margin: f32,
    gutter: f32,
    skip_overflow: bool,
    show_labels: bool,
    label_font_scale: f32,
    label_font_path: String,
    /// Fields the dialog does not edit.
    base_layout: LayoutConfig,
    output: Arc<Mutex<Option<DialogResult>>>,
}

impl ConfigDialog {
    fn new(initial: DialogResult, output: Arc<Mutex<Option<DialogResult>>>) -> Self {
        let layout = &initial.layout;
        Self {
            path_text: initial
                .result_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            canvas_width: layout.canvas_width as f32,
            canvas_height: layout.canvas_height as f32,
            max_area: layout.max_area as f32,
            shrink: layout.shrink as f32,
            margin: layout.margin as f32,
            gutter: layout.gutter as f32,
            skip_overflow: layout.overflow == OverflowPolicy::SkipItem,
            show_labels: initial.scene.show_labels,
            label_font_scale: initial.scene.label_font_scale,
            label_font_path: initial.label_font_path,
            base_layout: initial.layout,
            output,
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PathChanged(value) => self.path_text = value,
            Message::BrowsePath => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Optimization result", &["json"])
                    .pick_file()
                {
                    self.path_text = path.to_string_lossy().to_string();
                }
            }
            Message::CanvasWidthChanged(v) => self.canvas_width = v,
            Message::CanvasHeightChanged(v) => self.canvas_height = v,
            Message::MaxAreaChanged(v) => self.max_area = v,
            Message::ShrinkChanged(v) => self.shrink = v,
            Message::MarginChanged(v) => self.margin = v,
            Message::GutterChanged(v) => self.gutter = v,
            Message::SkipOverflowChanged(v) => self.skip_overflow = v,
            Message::ShowLabelsChanged(v) => self.show_labels = v,
            Message::LabelFontScaleChanged(v) => self.label_font_scale = v,
            Message::LabelFontPathChanged(v) => self.label_font_path = v,
            Message::Apply => {
                let trimmed = self.path_text.trim();
                let result_path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));

                let layout = LayoutConfig {
                    canvas_width: self.canvas_width as f64,
                    canvas_height: self.canvas_height as f64,
                    max_area: self.max_area as f64,
                    shrink: self.shrink as f64,
                    margin: self.margin as f64,
                    gutter: self.gutter as f64,
                    overflow: if self.skip_overflow {
                        OverflowPolicy::SkipItem
                    } else {
                        OverflowPolicy::StopPass
                    },
                    ..self.base_layout.clone()
                };

                if let Ok(mut guard) = self.output.lock() {
                    *guard = Some(DialogResult {
                        result_path,
                        layout,
                        scene: SceneSettings {
                            show_labels: self.show_labels,
                            label_font_scale: self.label_font_scale,
                        },
                        label_font_path: self.label_font_path.clone(),
                    });
                }

                return close_window();
            }
            Message::Cancel => return close_window(),
        }
        Task::none()
    }
}

fn close_window() -> Task<Message> {
    window::get_latest().then(|id| match id {
        Some(id) => window::close::<Message>(id),
        None => Task::none(),
    })
}

fn setting_slider<'a>(
    label: &'a str,
    value: f32,
    range: std::ops::RangeInclusive<f32>,
    step: f32,
    on_change: impl Fn(f32) -> Message + 'a,
) -> Element<'a, Message> {
    column![
        text(format!("{label}: {value:.2}")).size(16),
        slider(range, value, on_change).step(step)
    ]
    .spacing(6)
    .into()
}

fn view(state: &ConfigDialog) -> Element<'_, Message> {
    let mut body = column![text("Distribution Canvas Settings").size(26)].spacing(14);

    body = body.push(
        column![
            text("Result file").size(18),
            row![
                text_input("result.json", &state.path_text)
                    .on_input(Message::PathChanged)
                    .padding(8)
                    .width(Length::Fill),
                button("Browse").on_press(Message::BrowsePath)
            ]
            .spacing(8)
        ]
        .spacing(8),
    );

    let settings = column![
        text("Canvas").size(18),
        setting_slider(
            "Width (px)",
            state.canvas_width,
            300.0..=1920.0,
            10.0,
            Message::CanvasWidthChanged,
        ),
        setting_slider(
            "Height (px)",
            state.canvas_height,
            200.0..=1200.0,
            10.0,
            Message::CanvasHeightChanged,
        ),
        setting_slider(
            "Maximum area (m²)",
            state.max_area,
            1.0..=500.0,
            1.0,
            Message::MaxAreaChanged,
        ),
        setting_slider("Scale shrink", state.shrink, 0.3..=1.0, 0.01, Message::ShrinkChanged),
        setting_slider("Margin (px)", state.margin, 0.0..=80.0, 1.0, Message::MarginChanged),
        setting_slider("Gutter (px)", state.gutter, 0.0..=40.0, 1.0, Message::GutterChanged),
        checkbox("Keep placing later items after an overflow", state.skip_overflow)
            .on_toggle(Message::SkipOverflowChanged),
        text("Labels").size(18),
        checkbox("Show square labels", state.show_labels).on_toggle(Message::ShowLabelsChanged),
        setting_slider(
            "Label Font Scale",
            state.label_font_scale,
            0.6..=2.5,
            0.1,
            Message::LabelFontScaleChanged
        ),
        text_input("Custom font path (optional, .ttf)", &state.label_font_path)
            .on_input(Message::LabelFontPathChanged)
            .padding(8)
    ]
    .spacing(10);

    body = body.push(container(settings).padding(12));

    body = body.push(
        row![
            button("Cancel").on_press(Message::Cancel),
            button("Apply Settings").on_press(Message::Apply)
        ]
        .spacing(10),
    );

    container(body)
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
