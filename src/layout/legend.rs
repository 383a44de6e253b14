use compact_str::{format_compact, CompactString};

use crate::distribution::DistributionItem;
use super::palette::{item_colors, ColorPair};

use super::LayoutRect;

pub const ROW_HEIGHT: f64 = 32.0;
pub const PANEL_PADDING: f64 = 24.0;
pub const PANEL_WIDTH: f64 = 280.0;
pub const SWATCH_SIZE: f64 = 22.0;
const NAME_OFFSET: f64 = 32.0;
const QUANTITY_GAP: f64 = 8.0;

pub const NAME_FONT: FontSpec = FontSpec { px: 13.0 };
pub const QUANTITY_FONT: FontSpec = FontSpec { px: 11.0 };

/// Font request passed to a [`TextMeasure`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub px: f32,
}

/// Text measurement supplied by whatever backend will draw the text.
pub trait TextMeasure {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64;
}

/// Fixed per-character advance; used when no real font is available and in tests.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMeasure {
    pub advance_ratio: f32,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.58 }
    }
}

impl TextMeasure for ApproxMeasure {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64 {
        (text.chars().count() as f32 * font.px * self.advance_ratio) as f64
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub item_index: usize,
    pub slot: usize,
    pub colors: ColorPair,
    pub name: CompactString,
    pub quantity: u32,
    pub swatch: LayoutRect,
    /// Left edge and vertical center of the name text.
    pub name_pos: (f64, f64),
    pub quantity_text: CompactString,
    /// Left edge and vertical center of the quantity text, right after the measured name.
    pub quantity_pos: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub panel: LayoutRect,
    pub entries: Vec<LegendEntry>,
}

/// Lay out the legend panel: one row per distinct item, anchored to the bottom-left margin.
pub fn layout_legend(
    items: &[DistributionItem],
    canvas_h: f64,
    margin: f64,
    measure: &dyn TextMeasure,
) -> Legend {
    let panel_h = items.len() as f64 * ROW_HEIGHT + PANEL_PADDING;
    let panel = LayoutRect {
        x: margin - PANEL_PADDING / 2.0,
        y: canvas_h - margin - panel_h,
        w: PANEL_WIDTH,
        h: panel_h,
    };
    let first_row = panel.y + PANEL_PADDING / 2.0;
    let text_x = margin + NAME_OFFSET;

    let entries = items
        .iter()
        .enumerate()
        .map(|(slot, item)| {
            let row_y = first_row + slot as f64 * ROW_HEIGHT;
            let text_y = row_y + SWATCH_SIZE / 2.0;
            let name_w = measure.measure_width(&item.name, &NAME_FONT);
            LegendEntry {
                item_index: slot,
                slot,
                colors: item_colors(slot),
                name: item.name.clone(),
                quantity: item.quantity,
                swatch: LayoutRect {
                    x: margin,
                    y: row_y,
                    w: SWATCH_SIZE,
                    h: SWATCH_SIZE,
                },
                name_pos: (text_x, text_y),
                quantity_text: format_compact!("× {}", item.quantity),
                quantity_pos: (text_x + name_w + QUANTITY_GAP, text_y),
            }
        })
        .collect();

    Legend { panel, entries }
}
