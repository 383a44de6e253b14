use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use fontdue::Font;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::layout::{ApproxMeasure, FontSpec, TextMeasure};
use crate::render::colors::AppColor;

pub const DEFAULT_FONT: &str = "default";

pub struct TextRenderer {
    fonts: HashMap<String, Font>,
    layout: Layout,
    /// Used for measurement while no font is loaded.
    fallback: ApproxMeasure,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            fallback: ApproxMeasure::default(),
        }
    }

    pub fn load_system_font(&mut self, name: &str) -> anyhow::Result<()> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\segoeui.ttf")));
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\arial.ttf")));
        }

        candidates.push(PathBuf::from("C:\\Windows\\Fonts\\segoeui.ttf"));
        candidates.push(PathBuf::from("C:\\Windows\\Fonts\\arial.ttf"));
        candidates.push(PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf"));
        candidates.push(PathBuf::from("/Library/Fonts/Arial.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf"));

        for path in candidates {
            if self.load_font_from_path(name, &path).is_ok() {
                return Ok(());
            }
        }

        anyhow::bail!("unable to load a system font from known locations")
    }

    pub fn load_font_from_path(&mut self, name: &str, path: &Path) -> anyhow::Result<()> {
        let font_data = std::fs::read(path)?;
        let font = Font::from_bytes(font_data, fontdue::FontSettings::default())
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        self.fonts.insert(name.to_string(), font);
        tracing::info!("Loaded text font from {}", path.display());
        Ok(())
    }

    /// Rasterize `text` into tinted RGBA glyph bitmaps.
    pub fn render_text(
        &mut self,
        text: &str,
        font_name: &str,
        font_size: f32,
        max_width: Option<f32>,
        color: AppColor,
    ) -> Option<TextRenderResult> {
        let font = self.fonts.get(font_name)?;

        self.layout.reset(&LayoutSettings {
            max_width,
            ..Default::default()
        });
        self.layout.append(&[font], &TextStyle::new(text, font_size, 0));

        let [r, g, b, a] = color.to_rgba8();
        let mut glyphs = Vec::new();
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;

        for glyph in self.layout.glyphs() {
            let (metrics, bitmap) = font.rasterize_config(GlyphRasterConfig {
                glyph_index: glyph.key.glyph_index,
                px: font_size,
                font_hash: 0,
            });

            let mut rgba_bitmap = Vec::with_capacity(bitmap.len() * 4);
            for &coverage in &bitmap {
                let alpha = ((coverage as u16 * a as u16) / 255) as u8;
                rgba_bitmap.extend_from_slice(&[r, g, b, alpha]);
            }

            width = width.max(glyph.x + metrics.width as f32);
            height = height.max(glyph.y + metrics.height as f32);

            glyphs.push(TextGlyph {
                x: glyph.x,
                y: glyph.y,
                width: metrics.width,
                height: metrics.height,
                bitmap: rgba_bitmap,
            });
        }

        if glyphs.is_empty() {
            return None;
        }

        Some(TextRenderResult {
            glyphs,
            width: width.ceil() as u32,
            height: height.ceil() as u32,
        })
    }
}

impl TextMeasure for TextRenderer {
    /// Sum of horizontal advances with the default font.
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64 {
        match self.fonts.get(DEFAULT_FONT) {
            Some(f) => text
                .chars()
                .map(|ch| f.metrics(ch, font.px).advance_width as f64)
                .sum(),
            None => self.fallback.measure_width(text, font),
        }
    }
}

pub struct TextRenderResult {
    pub glyphs: Vec<TextGlyph>,
    pub width: u32,
    pub height: u32,
}

pub struct TextGlyph {
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
    pub bitmap: Vec<u8>, // RGBA format
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_with_fallback_when_no_font_is_loaded() {
        let renderer = TextRenderer::new();
        let font = FontSpec { px: 10.0 };
        let width = renderer.measure_width("abcd", &font);
        assert!((width - 4.0 * 10.0 * 0.58).abs() < 1e-4);
    }

    #[test]
    fn render_without_font_yields_nothing() {
        let mut renderer = TextRenderer::new();
        assert!(renderer
            .render_text("hello", DEFAULT_FONT, 12.0, None, AppColor::new(0.0, 0.0, 0.0))
            .is_none());
    }
}
