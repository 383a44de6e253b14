use std::sync::Arc;

use vello::kurbo::{Affine, Line, Rect, RoundedRect, Stroke};
use vello::peniko::{Blob, Color, Fill, Gradient, Image, ImageFormat};
use vello::Scene;

use super::colors::{self, AppColor, ColorPair};
use super::text::{TextRenderResult, TextRenderer, DEFAULT_FONT};
use crate::layout::{
    Label, LayoutConfig, LayoutRect, LayoutResult, Legend, PlacedSquare, SummaryBanner,
};

const GRID_STEP: f64 = 50.0;
const SQUARE_BORDER: f64 = 4.0;

/// Presentation switches that never affect geometry.
#[derive(Debug, Clone, Copy)]
pub struct SceneSettings {
    pub show_labels: bool,
    pub label_font_scale: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            show_labels: true,
            label_font_scale: 1.0,
        }
    }
}

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Build a Vello scene for one layout pass. The scene is reset first.
pub fn build_scene(
    scene: &mut Scene,
    layout: &LayoutResult,
    config: &LayoutConfig,
    text_renderer: &mut TextRenderer,
    settings: &SceneSettings,
) {
    scene.reset();

    draw_background(scene, config.canvas_width, config.canvas_height);

    for square in &layout.squares {
        draw_square(scene, square);
        if settings.show_labels {
            draw_square_label(scene, square, text_renderer, settings.label_font_scale);
        }
    }

    draw_legend(scene, &layout.legend, text_renderer);
    draw_summary(scene, &layout.summary, text_renderer);
}

pub fn to_kurbo(rect: &LayoutRect) -> Rect {
    Rect::new(rect.x, rect.y, rect.x + rect.w, rect.y + rect.h)
}

pub fn linear_gradient(
    from: (f64, f64),
    to: (f64, f64),
    start: AppColor,
    end: AppColor,
) -> Gradient {
    Gradient::new_linear(from, to).with_stops([start.to_dynamic(), end.to_dynamic()])
}

fn draw_background(scene: &mut Scene, width: f64, height: f64) {
    let canvas = Rect::new(0.0, 0.0, width, height);
    let gradient = linear_gradient(
        (0.0, 0.0),
        (width, height),
        colors::BACKGROUND_TOP,
        colors::BACKGROUND_BOTTOM,
    );
    scene.fill(Fill::NonZero, Affine::IDENTITY, &gradient, None, &canvas);

    let dashed = Stroke::new(1.0).with_dashes(0.0, [5.0, 5.0]);
    let grid = colors::GRID.to_peniko();
    let mut x = 0.0;
    while x <= width {
        scene.stroke(&dashed, Affine::IDENTITY, grid, None, &Line::new((x, 0.0), (x, height)));
        x += GRID_STEP;
    }
    let mut y = 0.0;
    while y <= height {
        scene.stroke(&dashed, Affine::IDENTITY, grid, None, &Line::new((0.0, y), (width, y)));
        y += GRID_STEP;
    }

    scene.stroke(
        &Stroke::new(4.0),
        Affine::IDENTITY,
        colors::FRAME.to_peniko(),
        None,
        &canvas,
    );
}

fn draw_square(scene: &mut Scene, square: &PlacedSquare) {
    let rect = to_kurbo(&square.bounds());
    let radius = square.corner_radius();
    let shape = RoundedRect::from_rect(rect, radius);

    scene.draw_blurred_rounded_rect(
        Affine::translate((4.0, 4.0)),
        rect,
        Color::new([0.0, 0.0, 0.0, 0.25]),
        radius,
        7.5,
    );

    let ColorPair { fill, shadow } = square.colors;
    let gradient = linear_gradient(
        (square.x, square.y),
        (square.x + square.side, square.y + square.side),
        fill,
        shadow,
    );
    scene.fill(Fill::NonZero, Affine::IDENTITY, &gradient, None, &shape);
    scene.stroke(
        &Stroke::new(SQUARE_BORDER),
        Affine::IDENTITY,
        colors::WHITE.to_peniko(),
        None,
        &shape,
    );
}

fn draw_square_label(
    scene: &mut Scene,
    square: &PlacedSquare,
    text_renderer: &mut TextRenderer,
    font_scale: f32,
) {
    let cx = square.x + square.side / 2.0;
    let cy = square.y + square.side / 2.0;
    match &square.label {
        Label::TwoLine { title, subtitle } => {
            draw_text(
                scene,
                text_renderer,
                title,
                14.0 * font_scale,
                colors::WHITE,
                (cx, cy - 8.0),
                Align::Center,
            );
            draw_text(
                scene,
                text_renderer,
                subtitle,
                11.0 * font_scale,
                colors::WHITE,
                (cx, cy + 10.0),
                Align::Center,
            );
        }
        Label::Initial(ch) => {
            let mut buf = [0u8; 4];
            let initial: &str = ch.encode_utf8(&mut buf);
            draw_text(
                scene,
                text_renderer,
                initial,
                16.0 * font_scale,
                colors::WHITE,
                (cx, cy),
                Align::Center,
            );
        }
        Label::None => {}
    }
}

fn draw_legend(scene: &mut Scene, legend: &Legend, text_renderer: &mut TextRenderer) {
    let panel = to_kurbo(&legend.panel);
    let shape = RoundedRect::from_rect(panel, 12.0);

    scene.draw_blurred_rounded_rect(
        Affine::translate((0.0, 4.0)),
        panel,
        Color::new([0.0, 0.0, 0.0, 0.15]),
        12.0,
        10.0,
    );
    let background = linear_gradient(
        (panel.x0, panel.y0),
        (panel.x0, panel.y1),
        colors::WHITE.with_alpha(0.98),
        colors::BACKGROUND_TOP.with_alpha(0.98),
    );
    scene.fill(Fill::NonZero, Affine::IDENTITY, &background, None, &shape);
    scene.stroke(&Stroke::new(2.0), Affine::IDENTITY, colors::GRID.to_peniko(), None, &shape);

    for entry in &legend.entries {
        let swatch = to_kurbo(&entry.swatch);
        let swatch_shape = RoundedRect::from_rect(swatch, 4.0);
        let gradient = linear_gradient(
            (swatch.x0, swatch.y0),
            (swatch.x1, swatch.y1),
            entry.colors.fill,
            entry.colors.shadow,
        );
        scene.fill(Fill::NonZero, Affine::IDENTITY, &gradient, None, &swatch_shape);
        scene.stroke(
            &Stroke::new(2.0),
            Affine::IDENTITY,
            colors::WHITE.to_peniko(),
            None,
            &swatch_shape,
        );

        draw_text(
            scene,
            text_renderer,
            &entry.name,
            13.0,
            colors::TEXT_DARK,
            entry.name_pos,
            Align::Left,
        );
        draw_text(
            scene,
            text_renderer,
            &entry.quantity_text,
            11.0,
            colors::TEXT_MUTED,
            entry.quantity_pos,
            Align::Left,
        );
    }
}

fn draw_summary(scene: &mut Scene, summary: &SummaryBanner, text_renderer: &mut TextRenderer) {
    let bounds = to_kurbo(&summary.bounds);
    let shape = RoundedRect::from_rect(bounds, 8.0);

    scene.draw_blurred_rounded_rect(
        Affine::IDENTITY,
        bounds,
        Color::new([0.0, 0.0, 0.0, 0.1]),
        8.0,
        7.5,
    );
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        colors::WHITE.with_alpha(0.95).to_peniko(),
        None,
        &shape,
    );
    scene.stroke(&Stroke::new(2.0), Affine::IDENTITY, colors::GRID.to_peniko(), None, &shape);

    let cx = bounds.center().x;
    draw_text(
        scene,
        text_renderer,
        &summary.title,
        16.0,
        colors::TEXT_DARK,
        (cx, 32.0),
        Align::Center,
    );
    draw_text(
        scene,
        text_renderer,
        &summary.subtitle,
        12.0,
        colors::TEXT_MUTED,
        (cx, 48.0),
        Align::Center,
    );
}

/// Draw one line of text whose vertical center sits at `anchor.1`.
///
/// Returns the drawn bounds, or `None` when no font is loaded.
pub fn draw_text(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    text: &str,
    font_size: f32,
    color: AppColor,
    anchor: (f64, f64),
    align: Align,
) -> Option<Rect> {
    let result = text_renderer.render_text(text, DEFAULT_FONT, font_size, None, color)?;
    let w = result.width as f64;
    let h = result.height as f64;
    let x = match align {
        Align::Left => anchor.0,
        Align::Center => anchor.0 - w / 2.0,
    };
    let y = anchor.1 - h / 2.0;
    draw_text_to_scene(scene, result, x, y);
    Some(Rect::new(x, y, x + w, y + h))
}

/// Draw rendered text to a Vello scene.
fn draw_text_to_scene(scene: &mut Scene, text_result: TextRenderResult, x: f64, y: f64) {
    for glyph in text_result.glyphs {
        if glyph.bitmap.is_empty() {
            continue;
        }

        let glyph_image = Image::new(
            Blob::new(Arc::new(glyph.bitmap)),
            ImageFormat::Rgba8,
            glyph.width as u32,
            glyph.height as u32,
        );

        let transform = Affine::translate((x + glyph.x as f64, y + glyph.y as f64));
        scene.draw_image(&glyph_image, transform);
    }
}
