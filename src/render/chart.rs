use compact_str::format_compact;
use vello::kurbo::{Affine, BezPath, Line, Stroke};
use vello::peniko::Fill;
use vello::Scene;

use super::colors;
use super::scene::{draw_text, linear_gradient, to_kurbo, Align};
use super::text::TextRenderer;
use crate::layout::convergence::{convergence_points, ChartGeometry};
use crate::layout::LayoutRect;

const PLOT_INSET_LEFT: f64 = 80.0;
const PLOT_INSET_RIGHT: f64 = 30.0;
const PLOT_INSET_TOP: f64 = 40.0;
const PLOT_INSET_BOTTOM: f64 = 60.0;
const GRID_LINES: usize = 5;

/// Plot area inside a canvas of the given size.
pub fn plot_rect(width: f64, height: f64) -> LayoutRect {
    LayoutRect {
        x: PLOT_INSET_LEFT,
        y: PLOT_INSET_TOP,
        w: (width - PLOT_INSET_LEFT - PLOT_INSET_RIGHT).max(1.0),
        h: (height - PLOT_INSET_TOP - PLOT_INSET_BOTTOM).max(1.0),
    }
}

/// Build the best-fitness-per-generation line chart. The scene is reset first.
pub fn build_chart_scene(
    scene: &mut Scene,
    history: &[f64],
    width: f64,
    height: f64,
    text_renderer: &mut TextRenderer,
) -> ChartGeometry {
    scene.reset();

    let chart = ChartGeometry::fit(&convergence_points(history), plot_rect(width, height));
    let plot = to_kurbo(&chart.plot);

    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        colors::WHITE.to_peniko(),
        None,
        &vello::kurbo::Rect::new(0.0, 0.0, width, height),
    );

    let dashed = Stroke::new(1.0).with_dashes(0.0, [3.0, 3.0]);
    let (lo, hi) = chart.fitness_range;
    for i in 0..=GRID_LINES {
        let t = i as f64 / GRID_LINES as f64;
        let y = plot.y1 - t * plot.height();
        scene.stroke(
            &dashed,
            Affine::IDENTITY,
            colors::BACKGROUND_BOTTOM.to_peniko(),
            None,
            &Line::new((plot.x0, y), (plot.x1, y)),
        );
        let value = lo + t * (hi - lo);
        draw_text(
            scene,
            text_renderer,
            &format_compact!("{value:.0}"),
            11.0,
            colors::TEXT_MUTED,
            (8.0, y),
            Align::Left,
        );
    }

    let axis = Stroke::new(1.5);
    let axis_color = colors::AXIS.to_peniko();
    scene.stroke(
        &axis,
        Affine::IDENTITY,
        axis_color,
        None,
        &Line::new((plot.x0, plot.y0), (plot.x0, plot.y1)),
    );
    scene.stroke(
        &axis,
        Affine::IDENTITY,
        axis_color,
        None,
        &Line::new((plot.x0, plot.y1), (plot.x1, plot.y1)),
    );

    let (first, last) = chart.generations;
    draw_text(
        scene,
        text_renderer,
        &format_compact!("{first}"),
        11.0,
        colors::TEXT_MUTED,
        (plot.x0, plot.y1 + 14.0),
        Align::Center,
    );
    draw_text(
        scene,
        text_renderer,
        &format_compact!("{last}"),
        11.0,
        colors::TEXT_MUTED,
        (plot.x1, plot.y1 + 14.0),
        Align::Center,
    );
    draw_text(
        scene,
        text_renderer,
        "Generation",
        12.0,
        colors::TEXT_MUTED,
        (plot.center().x, plot.y1 + 36.0),
        Align::Center,
    );
    draw_text(
        scene,
        text_renderer,
        "Best fitness (profit)",
        12.0,
        colors::TEXT_MUTED,
        (PLOT_INSET_LEFT, 20.0),
        Align::Left,
    );

    if let Some((&start, rest)) = chart.polyline.split_first() {
        let mut path = BezPath::new();
        path.move_to(start);
        for &point in rest {
            path.line_to(point);
        }
        let stroke_paint = linear_gradient(
            (plot.x0, plot.y0),
            (plot.x0, plot.y1),
            colors::CHART_START,
            colors::CHART_END,
        );
        scene.stroke(&Stroke::new(4.0), Affine::IDENTITY, &stroke_paint, None, &path);
    }

    tracing::debug!(
        "Convergence chart: {} generations, fitness {:.2}..{:.2}",
        chart.polyline.len(),
        lo,
        hi
    );

    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_fits_inside_canvas() {
        let plot = plot_rect(900.0, 650.0);
        assert_eq!(plot.x, 80.0);
        assert_eq!(plot.w, 790.0);
        assert_eq!(plot.h, 550.0);
    }

    #[test]
    fn chart_scene_maps_every_generation() {
        let mut scene = Scene::new();
        let mut text = TextRenderer::new();
        let chart = build_chart_scene(&mut scene, &[10.0, 20.0, 15.0], 900.0, 650.0, &mut text);
        assert_eq!(chart.polyline.len(), 3);
        assert_eq!(chart.generations, (1, 3));
        assert!(!scene.encoding().is_empty());
    }
}
