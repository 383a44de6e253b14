/// Diagnostic tool to verify result → layout for one or more files
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use distview_rs::distribution::stats::ResultStats;
use distview_rs::distribution::{self, validate};
use distview_rs::layout::{compute_layout, ApproxMeasure, LayoutConfig, LayoutResult};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("distview_rs=debug".parse()?),
        )
        .init();

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: debug-layout <result.json> [more.json ...]");
    }

    let config = LayoutConfig::default();
    let measure = ApproxMeasure::default();

    // Reports are built in parallel and printed in argument order.
    let reports: Vec<String> = paths
        .par_iter()
        .map(|path| match report(path, &config, &measure) {
            Ok(text) => text,
            Err(e) => format!("=== {} ===\n  ✗ {e:#}\n", path.display()),
        })
        .collect();

    for report in reports {
        println!("{report}");
    }
    Ok(())
}

fn report(path: &Path, config: &LayoutConfig, measure: &ApproxMeasure) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "=== DIAGNOSTIC: {} ===", path.display())?;

    let result = distribution::load_result(path)?;
    writeln!(
        out,
        "[1] Loaded {} items, {} instances requested",
        result.distribution.len(),
        result.requested_instances()
    )?;
    for (i, item) in result.distribution.iter().enumerate().take(10) {
        writeln!(
            out,
            "    [{}] id={} '{}' area={:.3} x{} (total {:.3})",
            i,
            item.id,
            item.name,
            item.area,
            item.quantity,
            item.area_total()
        )?;
    }

    let issues = validate::validate(&result.distribution);
    writeln!(out, "\n[2] Validation: {} issue(s)", issues.len())?;
    for issue in issues.iter().take(10) {
        writeln!(out, "    {:?}: {}", issue.severity(), issue)?;
    }

    let layout = compute_layout(&result.distribution, config, measure)?;
    writeln!(
        out,
        "\n[3] Layout: scale={:.3} px/m, {} squares",
        layout.scale,
        layout.squares.len()
    )?;
    write_shelves(&mut out, &layout)?;

    let t = layout.truncation;
    if t.is_truncated() {
        writeln!(
            out,
            "\n[4] Truncated: placed {} of {} ({} omitted)",
            t.placed,
            t.requested,
            t.omitted()
        )?;
    } else {
        writeln!(out, "\n[4] All {} instances placed", t.placed)?;
    }

    let panel = layout.legend.panel;
    writeln!(
        out,
        "\n[5] Legend panel {:.0}x{:.0} at ({:.0}, {:.0})",
        panel.w, panel.h, panel.x, panel.y
    )?;
    for entry in &layout.legend.entries {
        writeln!(
            out,
            "    {:>2}. {} {} (swatch at {:.0},{:.0})",
            entry.slot + 1,
            entry.name,
            entry.quantity_text,
            entry.swatch.x,
            entry.swatch.y
        )?;
    }

    writeln!(
        out,
        "\n[6] Summary: \"{}\" / \"{}\"",
        layout.summary.title, layout.summary.subtitle
    )?;

    let stats = ResultStats::from_result(&result, config.max_area);
    writeln!(
        out,
        "\n[7] Results: profit {:.2}, area {:.2} of {:.0} ({:.1}% used)",
        stats.profit_total, stats.area_total, stats.max_area, stats.utilization
    )?;
    writeln!(
        out,
        "    best solution {:?} ({} kind(s) selected)",
        stats.best_solution,
        stats.selected_kinds()
    )?;
    match stats.best_fitness {
        Some(best) => writeln!(
            out,
            "    {} generation(s), best fitness {:.2}",
            stats.generations_run, best
        )?,
        None => writeln!(out, "    no fitness history")?,
    }
    for (label, value) in &stats.parameters {
        writeln!(out, "    {label}: {value}")?;
    }
    Ok(out)
}

fn write_shelves(out: &mut String, layout: &LayoutResult) -> std::fmt::Result {
    let shelf_count = layout.squares.iter().map(|s| s.shelf + 1).max().unwrap_or(0);
    for shelf in 0..shelf_count {
        let row: Vec<_> = layout.squares.iter().filter(|s| s.shelf == shelf).collect();
        let Some(first) = row.first() else {
            continue;
        };
        let tallest = row.iter().map(|s| s.side).fold(0.0, f64::max);
        writeln!(
            out,
            "    shelf {}: y={:.1}, {} squares, tallest {:.1}px",
            shelf,
            first.y,
            row.len(),
            tallest
        )?;
    }
    Ok(())
}
