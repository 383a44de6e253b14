/// Result validation tool
/// Tests: Load → Validate → Layout → Scene pipeline without GUI
use std::path::PathBuf;

use vello::Scene;

use distview_rs::distribution::stats::ResultStats;
use distview_rs::distribution::validate::{self, Severity};
use distview_rs::distribution;
use distview_rs::layout::{compute_layout, LayoutConfig};
use distview_rs::render::chart::build_chart_scene;
use distview_rs::render::scene::{build_scene, SceneSettings};
use distview_rs::render::stats::{build_stats_scene, visible_rows};
use distview_rs::render::text::{TextRenderer, DEFAULT_FONT};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("distview_rs=info".parse()?),
        )
        .init();

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        anyhow::bail!("usage: validate-result <result.json>");
    };

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          DISTVIEW-RS RESULT VALIDATION TOOL                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Target: {}", path.display());
    println!();

    // === STAGE 1: LOAD ===
    println!("┌─ STAGE 1: LOAD RESULT ─────────────────────────────────────┐");
    let start = std::time::Instant::now();
    let result = distribution::load_result(&path)?;
    let load_duration = start.elapsed();

    println!("  ✓ Parsed in {:.2}ms", load_duration.as_secs_f64() * 1000.0);
    println!(
        "  ✓ Items:     {} ({} instances requested)",
        result.distribution.len(),
        result.requested_instances()
    );
    if let Some(area) = result.area_total {
        println!("  ✓ Reported total area: {area:.2}");
    }
    println!("  ✓ Fitness history: {} generations", result.fitness_history.len());
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    if result.distribution.is_empty() {
        println!("⚠ Distribution is empty: the canvas will only show the summary banner.");
        println!();
    }

    // === STAGE 2: VALIDATION ===
    println!("┌─ STAGE 2: VALIDATION ──────────────────────────────────────┐");
    let issues = validate::validate(&result.distribution);
    for issue in issues.iter().take(10) {
        let mark = match issue.severity() {
            Severity::Warning => "⚠",
            Severity::Error => "✗",
        };
        println!("  {mark} {issue}");
    }
    if issues.len() > 10 {
        println!("  ... (truncated, {} more)", issues.len() - 10);
    }
    if validate::has_errors(&issues) {
        println!("  ✗ FAILED: distribution has errors and cannot be laid out");
        println!("└────────────────────────────────────────────────────────────┘");
        return Ok(());
    }
    if issues.is_empty() {
        println!("  ✓ All items valid");
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 3: LAYOUT ===
    println!("┌─ STAGE 3: SHELF LAYOUT ────────────────────────────────────┐");
    let config = LayoutConfig::default();
    let mut text_renderer = TextRenderer::new();
    if text_renderer.load_system_font(DEFAULT_FONT).is_err() {
        println!("  ⚠ No system font found, legend widths are estimated");
    }

    let start = std::time::Instant::now();
    let layout = compute_layout(&result.distribution, &config, &text_renderer)?;
    let layout_duration = start.elapsed();

    println!("  ✓ Layout computed in {:.2}ms", layout_duration.as_secs_f64() * 1000.0);
    println!("  ✓ Scale:    {:.3} px per unit length", layout.scale);
    println!("  ✓ Squares:  {}", layout.squares.len());

    let right = config.canvas_width - config.margin;
    let bottom = config.canvas_height - config.margin;
    let outside = layout
        .squares
        .iter()
        .filter(|s| {
            s.x < config.margin
                || s.y < config.margin
                || s.x + s.side > right + 1e-6
                || s.y + s.side > bottom + 1e-6
        })
        .count();
    if outside == 0 {
        println!("  ✓ All squares inside the canvas margins");
    } else {
        println!("  ✗ FAILED: {outside} squares cross the canvas margins!");
        return Ok(());
    }

    let t = layout.truncation;
    if t.is_truncated() {
        println!(
            "  ⚠ WARNING: {} of {} instances did not fit ({} omitted)",
            t.placed,
            t.requested,
            t.omitted()
        );
    } else {
        println!("  ✓ All {} instances placed", t.placed);
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 4: SCENE ===
    println!("┌─ STAGE 4: SCENE ENCODING ──────────────────────────────────┐");
    let mut scene = Scene::new();
    let start = std::time::Instant::now();
    build_scene(&mut scene, &layout, &config, &mut text_renderer, &SceneSettings::default());
    let scene_duration = start.elapsed();

    if scene.encoding().is_empty() {
        println!("  ✗ FAILED: canvas scene is empty!");
        return Ok(());
    }
    println!("  ✓ Canvas scene encoded in {:.2}ms", scene_duration.as_secs_f64() * 1000.0);

    if !result.fitness_history.is_empty() {
        let chart = build_chart_scene(
            &mut scene,
            &result.fitness_history,
            config.canvas_width,
            config.canvas_height,
            &mut text_renderer,
        );
        println!(
            "  ✓ Convergence chart: {} points, fitness {:.2} .. {:.2}",
            chart.polyline.len(),
            chart.fitness_range.0,
            chart.fitness_range.1
        );
    }

    let stats = ResultStats::from_result(&result, config.max_area);
    build_stats_scene(
        &mut scene,
        &stats,
        &config.unit_suffix,
        config.canvas_width,
        config.canvas_height,
        &mut text_renderer,
    );
    println!(
        "  ✓ Results view: {:.1}% utilization, {} of {} table rows shown",
        stats.utilization,
        visible_rows(config.canvas_height, stats.rows.len()),
        stats.rows.len()
    );
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    ✓ ALL STAGES PASSED                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Pipeline summary:");
    println!("  • Load:     {:.2}ms", load_duration.as_secs_f64() * 1000.0);
    println!("  • Layout:   {:.2}ms", layout_duration.as_secs_f64() * 1000.0);
    println!("  • Scene:    {:.2}ms", scene_duration.as_secs_f64() * 1000.0);

    Ok(())
}
