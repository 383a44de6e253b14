use compact_str::format_compact;
use vello::kurbo::{Affine, Line, Rect, RoundedRect, Stroke};
use vello::peniko::Fill;
use vello::Scene;

use super::colors::{self, item_colors, AppColor};
use super::scene::{draw_text, linear_gradient, Align};
use super::text::TextRenderer;
use crate::distribution::stats::ResultStats;

const PAD: f64 = 30.0;
const CARD_TOP: f64 = 60.0;
const CARD_H: f64 = 96.0;
const CARD_GAP: f64 = 16.0;
const TABLE_TOP: f64 = CARD_TOP + CARD_H + 30.0;
const ROW_H: f64 = 26.0;
/// Space kept under the table for the run details.
const FOOTER_H: f64 = 70.0;

/// Table rows that fit between the header and the footer.
pub fn visible_rows(height: f64, total: usize) -> usize {
    let room = height - TABLE_TOP - ROW_H - FOOTER_H;
    if room <= 0.0 {
        return 0;
    }
    ((room / ROW_H).floor() as usize).min(total)
}

/// Build the results view: stat cards, per-item table and run details. The scene is reset first.
pub fn build_stats_scene(
    scene: &mut Scene,
    stats: &ResultStats,
    unit_suffix: &str,
    width: f64,
    height: f64,
    text_renderer: &mut TextRenderer,
) {
    scene.reset();
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        colors::BACKGROUND_TOP.to_peniko(),
        None,
        &Rect::new(0.0, 0.0, width, height),
    );
    draw_text(
        scene,
        text_renderer,
        "Optimization Results",
        20.0,
        colors::TEXT_DARK,
        (PAD, 30.0),
        Align::Left,
    );

    let card_w = ((width - 2.0 * PAD - 2.0 * CARD_GAP) / 3.0).max(60.0);
    let card = |i: usize| {
        let x = PAD + i as f64 * (card_w + CARD_GAP);
        Rect::new(x, CARD_TOP, x + card_w, CARD_TOP + CARD_H)
    };

    draw_card(
        scene,
        text_renderer,
        card(0),
        colors::CHART_START,
        "Total profit",
        &format_compact!("${:.2}", stats.profit_total),
        "Optimized",
    );
    draw_card(
        scene,
        text_renderer,
        card(1),
        colors::SUCCESS,
        "Area used",
        &format_compact!("{:.2} {unit_suffix}", stats.area_total),
        &format_compact!("of {:.0} {unit_suffix}", stats.max_area),
    );
    let utilization = card(2);
    draw_card(
        scene,
        text_renderer,
        utilization,
        colors::WARNING,
        "Utilization",
        &format_compact!("{:.1}%", stats.utilization),
        "",
    );
    draw_progress_bar(scene, utilization, stats.utilization_fraction());

    draw_table(scene, text_renderer, stats, unit_suffix, width, height);
    draw_footer(scene, text_renderer, stats, height);
}

fn draw_card(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    bounds: Rect,
    accent: AppColor,
    label: &str,
    value: &str,
    trend: &str,
) {
    let shape = RoundedRect::from_rect(bounds, 10.0);
    scene.fill(Fill::NonZero, Affine::IDENTITY, colors::WHITE.to_peniko(), None, &shape);
    scene.stroke(&Stroke::new(1.5), Affine::IDENTITY, colors::GRID.to_peniko(), None, &shape);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        accent.to_peniko(),
        None,
        &Rect::new(bounds.x0, bounds.y0 + 10.0, bounds.x0 + 4.0, bounds.y1 - 10.0),
    );

    let x = bounds.x0 + 18.0;
    draw_text(
        scene,
        text_renderer,
        label,
        12.0,
        colors::TEXT_MUTED,
        (x, bounds.y0 + 20.0),
        Align::Left,
    );
    draw_text(
        scene,
        text_renderer,
        value,
        22.0,
        colors::TEXT_DARK,
        (x, bounds.y0 + 48.0),
        Align::Left,
    );
    if !trend.is_empty() {
        draw_text(scene, text_renderer, trend, 11.0, accent, (x, bounds.y0 + 76.0), Align::Left);
    }
}

fn draw_progress_bar(scene: &mut Scene, card: Rect, fraction: f64) {
    let track = Rect::new(card.x0 + 18.0, card.y0 + 72.0, card.x1 - 18.0, card.y0 + 80.0);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        colors::BACKGROUND_BOTTOM.to_peniko(),
        None,
        &RoundedRect::from_rect(track, 4.0),
    );
    if fraction > 0.0 {
        let fill = Rect::new(track.x0, track.y0, track.x0 + track.width() * fraction, track.y1);
        let gradient = linear_gradient(
            (track.x0, track.y0),
            (track.x1, track.y0),
            colors::CHART_START,
            colors::CHART_END,
        );
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            &gradient,
            None,
            &RoundedRect::from_rect(fill, 4.0),
        );
    }
}

fn draw_table(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    stats: &ResultStats,
    unit_suffix: &str,
    width: f64,
    height: f64,
) {
    let right = width - PAD;
    let columns = [PAD + 12.0, right - 330.0, right - 220.0, right - 100.0];
    let headers = ["Item", "Quantity", "Total area", "Total profit"];

    let header = Rect::new(PAD, TABLE_TOP, right, TABLE_TOP + ROW_H);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        colors::BACKGROUND_BOTTOM.to_peniko(),
        None,
        &header,
    );
    let header_y = header.center().y;
    for (x, title) in columns.iter().zip(headers) {
        draw_text(
            scene,
            text_renderer,
            title,
            12.0,
            colors::TEXT_DARK,
            (*x, header_y),
            Align::Left,
        );
    }

    let shown = visible_rows(height, stats.rows.len());
    let divider = colors::GRID.to_peniko();
    for (i, row) in stats.rows.iter().take(shown).enumerate() {
        let top = TABLE_TOP + ROW_H * (i + 1) as f64;
        let y = top + ROW_H / 2.0;

        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            item_colors(i).fill.to_peniko(),
            None,
            &RoundedRect::new(PAD, y - 5.0, PAD + 6.0, y + 5.0, 2.0),
        );
        let cells = [
            format_compact!("{}", row.name),
            format_compact!("{}", row.quantity),
            format_compact!("{:.2} {unit_suffix}", row.area_total),
            format_compact!("${:.2}", row.profit_total),
        ];
        for (x, cell) in columns.iter().zip(&cells) {
            draw_text(scene, text_renderer, cell, 12.0, colors::TEXT_DARK, (*x, y), Align::Left);
        }
        scene.stroke(
            &Stroke::new(1.0),
            Affine::IDENTITY,
            divider,
            None,
            &Line::new((PAD, top + ROW_H), (right, top + ROW_H)),
        );
    }

    if shown < stats.rows.len() {
        let y = TABLE_TOP + ROW_H * (shown + 1) as f64 + ROW_H / 2.0;
        let more = format_compact!("... {} more item(s)", stats.rows.len() - shown);
        draw_text(
            scene,
            text_renderer,
            &more,
            11.0,
            colors::TEXT_MUTED,
            (PAD + 12.0, y),
            Align::Left,
        );
    }
}

fn draw_footer(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    stats: &ResultStats,
    height: f64,
) {
    let mut run = format_compact!(
        "{} generation(s), {} kind(s) selected",
        stats.generations_run,
        stats.selected_kinds()
    );
    if let Some(best) = stats.best_fitness {
        run.push_str(&format_compact!(", best fitness {best:.2}"));
    }
    draw_text(
        scene,
        text_renderer,
        &run,
        12.0,
        colors::TEXT_DARK,
        (PAD, height - 48.0),
        Align::Left,
    );

    if !stats.parameters.is_empty() {
        let params = stats
            .parameters
            .iter()
            .map(|(label, value)| format!("{label} {value}"))
            .collect::<Vec<_>>()
            .join("  |  ");
        draw_text(
            scene,
            text_renderer,
            &params,
            11.0,
            colors::TEXT_MUTED,
            (PAD, height - 26.0),
            Align::Left,
        );
    }
}
