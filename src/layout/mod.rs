pub mod convergence;
pub mod label;
pub mod legend;
pub mod palette;
pub mod scale;
pub mod shelf;
pub mod summary;

use compact_str::CompactString;
use thiserror::Error;

use crate::distribution::{DistributionItem, ItemId};
use palette::{item_colors, ColorPair};

pub use label::Label;
pub use legend::{ApproxMeasure, FontSpec, Legend, LegendEntry, TextMeasure};
pub use shelf::OverflowPolicy;
pub use summary::SummaryBanner;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl LayoutRect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// Configuration for the distribution layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Canvas size in pixels
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Real-world area the whole canvas stands for (m²)
    pub max_area: f64,
    /// Damping applied to the scale so a full distribution keeps some slack
    pub shrink: f64,
    /// Space kept free on every canvas edge (px)
    pub margin: f64,
    /// Space between neighbouring squares and shelves (px)
    pub gutter: f64,
    pub overflow: OverflowPolicy,
    pub title: CompactString,
    /// Appended to every area figure
    pub unit_suffix: CompactString,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 900.0,
            canvas_height: 650.0,
            max_area: 50.0,
            shrink: 0.85,
            margin: 20.0,
            gutter: 10.0,
            overflow: OverflowPolicy::StopPass,
            title: "Optimal Distribution".into(),
            unit_suffix: "m²".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("maximum area must be positive, got {0}")]
    NonPositiveMaxArea(f64),
    #[error("canvas must have a positive size, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
}

/// One placed instance of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSquare {
    pub x: f64,
    pub y: f64,
    pub side: f64,
    pub item_index: usize,
    pub item_id: ItemId,
    pub shelf: usize,
    pub colors: ColorPair,
    pub label: Label,
}

impl PlacedSquare {
    pub fn bounds(&self) -> LayoutRect {
        LayoutRect {
            x: self.x,
            y: self.y,
            w: self.side,
            h: self.side,
        }
    }

    /// Corner radius the renderer rounds this square with.
    pub fn corner_radius(&self) -> f64 {
        (self.side * 0.1).min(12.0)
    }
}

/// How many of the requested instances made it onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub requested: u64,
    pub placed: u64,
}

impl Truncation {
    pub fn is_truncated(&self) -> bool {
        self.placed < self.requested
    }

    pub fn omitted(&self) -> u64 {
        self.requested - self.placed
    }
}

/// The full layout result of one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub scale: f64,
    pub squares: Vec<PlacedSquare>,
    pub legend: Legend,
    pub summary: SummaryBanner,
    pub truncation: Truncation,
}

/// Lay out a distribution on the configured canvas.
///
/// Pure: identical inputs give identical results. Configuration errors skip
/// the pass entirely; running out of vertical space is reported through
/// [`LayoutResult::truncation`], not as an error.
pub fn compute_layout(
    items: &[DistributionItem],
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> Result<LayoutResult, LayoutError> {
    let scale = scale::scale_factor(
        config.canvas_width,
        config.canvas_height,
        config.max_area,
        config.shrink,
    )?;

    let bounds = shelf::ShelfBounds {
        width: config.canvas_width,
        height: config.canvas_height,
        margin: config.margin,
        gutter: config.gutter,
    };
    let packing = shelf::pack(items, scale, &bounds, config.overflow);

    let squares: Vec<PlacedSquare> = packing
        .placements
        .iter()
        .map(|p| {
            let item = &items[p.item_index];
            PlacedSquare {
                x: p.x,
                y: p.y,
                side: p.side,
                item_index: p.item_index,
                item_id: item.id.clone(),
                shelf: p.shelf,
                colors: item_colors(p.item_index),
                label: label::label_for(p.side, &item.name, item.area, &config.unit_suffix),
            }
        })
        .collect();

    let truncation = Truncation {
        requested: items.iter().map(|i| i.quantity as u64).sum(),
        placed: squares.len() as u64,
    };

    tracing::info!(
        "Laid out {} of {} instances ({} items) on {:.0}x{:.0} canvas, scale={:.3}",
        truncation.placed,
        truncation.requested,
        items.len(),
        config.canvas_width,
        config.canvas_height,
        scale
    );
    if truncation.is_truncated() {
        tracing::warn!(
            "Canvas too short: {} instance(s) omitted (policy {:?}, stopped at item {:?})",
            truncation.omitted(),
            config.overflow,
            packing.stopped_at
        );
    }

    Ok(LayoutResult {
        scale,
        squares,
        legend: legend::layout_legend(items, config.canvas_height, config.margin, measure),
        summary: summary::layout_summary(
            items,
            config.canvas_width,
            &config.title,
            &config.unit_suffix,
        ),
        truncation,
    })
}
