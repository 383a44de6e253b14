use vello::kurbo::{Affine, Circle, Rect, RoundedRect, Stroke};
use vello::peniko::{Color, Fill};
use vello::Scene;

use crate::layout::{PlacedSquare, Truncation};
use crate::render::colors::{self, AppColor};
use crate::render::scene::{draw_text, to_kurbo, Align};
use crate::render::text::TextRenderer;
use crate::ui::tooltip::TooltipInfo;

const TOOLTIP_W: f64 = 240.0;
const TOOLTIP_LINE_H: f64 = 18.0;

/// Wash the hovered square with a lighter shade of its own fill.
pub fn hover_tint(square: &PlacedSquare) -> AppColor {
    square.colors.fill.lighten(0.25).with_alpha(0.45)
}

/// Highlight and outline the hovered square.
pub fn render_hover_highlight(scene: &mut Scene, square: &PlacedSquare) {
    let shape = RoundedRect::from_rect(to_kurbo(&square.bounds()), square.corner_radius());
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        hover_tint(square).to_peniko(),
        None,
        &shape,
    );
    scene.stroke(
        &Stroke::new(2.0),
        Affine::IDENTITY,
        colors::FRAME.to_peniko(),
        None,
        &shape,
    );
}

/// Render hover tooltip next to the cursor, flipped to stay on the canvas.
pub fn render_tooltip(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    info: &TooltipInfo,
    mouse_x: f32,
    mouse_y: f32,
    viewport_width: f64,
    viewport_height: f64,
) {
    let tooltip_h = 16.0 + TOOLTIP_LINE_H * (info.lines.len() + 1) as f64;
    let mut x = mouse_x as f64 + 15.0;
    let mut y = mouse_y as f64 + 15.0;
    if x + TOOLTIP_W > viewport_width {
        x = mouse_x as f64 - TOOLTIP_W - 15.0;
    }
    if y + tooltip_h > viewport_height {
        y = mouse_y as f64 - tooltip_h - 15.0;
    }

    let panel = Rect::new(x, y, x + TOOLTIP_W, y + tooltip_h);
    let shape = RoundedRect::from_rect(panel, 12.0);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        colors::WHITE.to_peniko(),
        None,
        &shape,
    );
    scene.stroke(
        &Stroke::new(2.0),
        Affine::IDENTITY,
        colors::CHART_START.to_peniko(),
        None,
        &shape,
    );

    let text_x = x + 12.0;
    let mut line_y = y + 8.0 + TOOLTIP_LINE_H / 2.0;
    draw_text(
        scene,
        text_renderer,
        &info.name,
        14.0,
        colors::TEXT_DARK,
        (text_x, line_y),
        Align::Left,
    );
    for line in &info.lines {
        line_y += TOOLTIP_LINE_H;
        draw_text(
            scene,
            text_renderer,
            line,
            12.0,
            colors::TEXT_MUTED,
            (text_x, line_y),
            Align::Left,
        );
    }
}

/// Badge in the top-right corner when requested instances did not fit.
pub fn render_truncation_badge(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    truncation: &Truncation,
    viewport_width: f64,
) {
    if !truncation.is_truncated() {
        return;
    }
    let message = format!(
        "Showing {} of {} instances",
        truncation.placed, truncation.requested
    );
    let panel = Rect::new(viewport_width - 250.0, 70.0, viewport_width - 20.0, 98.0);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        colors::WARNING.with_alpha(0.92).to_peniko(),
        None,
        &RoundedRect::from_rect(panel, 6.0),
    );
    draw_text(
        scene,
        text_renderer,
        &message,
        12.0,
        colors::WHITE,
        (panel.center().x, panel.center().y),
        Align::Center,
    );
}

/// Centered message panel for the empty, failed and invalid states.
pub fn render_message(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    lines: &[String],
    viewport_width: f64,
    viewport_height: f64,
) {
    let panel_w = (viewport_width * 0.6).clamp(320.0, 720.0);
    let panel_h = 24.0 + 20.0 * lines.len() as f64;
    let x = (viewport_width - panel_w) * 0.5;
    let y = (viewport_height - panel_h) * 0.5;
    let panel = Rect::new(x, y, x + panel_w, y + panel_h);

    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        colors::WHITE.with_alpha(0.95).to_peniko(),
        None,
        &RoundedRect::from_rect(panel, 8.0),
    );
    for (i, line) in lines.iter().enumerate() {
        draw_text(
            scene,
            text_renderer,
            line,
            13.0,
            colors::TEXT_DARK,
            (x + panel_w * 0.5, y + 22.0 + 20.0 * i as f64),
            Align::Center,
        );
    }
}

pub fn render_loading_overlay(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    viewport_width: f64,
    viewport_height: f64,
    elapsed_seconds: f32,
) {
    let panel_w = (viewport_width * 0.4).clamp(300.0, 520.0);
    let panel_h = 92.0;
    let x = (viewport_width - panel_w) * 0.5;
    let y = (viewport_height - panel_h) * 0.5;
    let panel = Rect::new(x, y, x + panel_w, y + panel_h);

    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        Color::new([0.07, 0.08, 0.10, 0.84]),
        None,
        &panel,
    );

    let text_y = y + 58.0;
    draw_text(
        scene,
        text_renderer,
        "Loading optimization result...",
        14.0,
        colors::WHITE,
        (x + panel_w * 0.5, text_y),
        Align::Center,
    );

    // Spinner directly above the text.
    let spinner_cx = x + panel_w * 0.5;
    let spinner_cy = text_y - 24.0;
    let spinner_r = 7.0;
    let step = ((elapsed_seconds * 10.0) as i32).rem_euclid(12) as usize;
    for i in 0..12usize {
        let angle = (i as f64 / 12.0) * std::f64::consts::TAU;
        let px = spinner_cx + angle.cos() * spinner_r;
        let py = spinner_cy + angle.sin() * spinner_r;
        let dist = ((12 + i as i32 - step as i32) % 12) as f32;
        let alpha = (1.0 - dist / 12.0) * 0.9 + 0.08;
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            Color::new([0.88, 0.90, 0.95, alpha]),
            None,
            &Circle::new((px, py), 1.7),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{DistributionItem, ItemId};
    use crate::layout::{compute_layout, ApproxMeasure, LayoutConfig};

    #[test]
    fn hover_tint_is_a_translucent_lighter_fill() {
        let items = vec![DistributionItem::new(ItemId::Num(1), "Lavadora", 0.36, 1)];
        let layout =
            compute_layout(&items, &LayoutConfig::default(), &ApproxMeasure::default()).unwrap();
        let square = &layout.squares[0];
        let tint = hover_tint(square);
        let fill = square.colors.fill;

        assert!(tint.r >= fill.r && tint.g >= fill.g && tint.b >= fill.b);
        assert!(tint.r + tint.g + tint.b > fill.r + fill.g + fill.b);
        assert_eq!(tint.a, 0.45);
    }

    #[test]
    fn highlight_adds_to_the_scene() {
        let items = vec![DistributionItem::new(ItemId::Num(1), "a", 1.0, 1)];
        let layout =
            compute_layout(&items, &LayoutConfig::default(), &ApproxMeasure::default()).unwrap();
        let mut scene = Scene::new();
        render_hover_highlight(&mut scene, &layout.squares[0]);
        assert!(!scene.encoding().is_empty());
    }
}
