use vello::peniko::color::{DynamicColor, Srgb};
use vello::peniko::Color;

pub use crate::layout::palette::{item_colors, AppColor, ColorPair, PALETTE};

impl AppColor {
    /// Convert to vello's peniko Color (AlphaColor<Srgb>).
    pub fn to_peniko(self) -> Color {
        Color::new([self.r, self.g, self.b, self.a])
    }

    /// Convert to DynamicColor for gradient stops.
    pub fn to_dynamic(self) -> DynamicColor {
        DynamicColor::from_alpha_color::<Srgb>(self.to_peniko())
    }
}

// Canvas chrome.
pub const BACKGROUND_TOP: AppColor = AppColor::from_hex(0xf8f9fa);
pub const BACKGROUND_BOTTOM: AppColor = AppColor::from_hex(0xe9ecef);
pub const GRID: AppColor = AppColor::from_hex(0xdee2e6);
pub const FRAME: AppColor = AppColor::from_hex(0x495057);
pub const TEXT_DARK: AppColor = AppColor::from_hex(0x212529);
pub const TEXT_MUTED: AppColor = AppColor::from_hex(0x6c757d);
pub const AXIS: AppColor = AppColor::from_hex(0xadb5bd);
pub const WARNING: AppColor = AppColor::from_hex(0xe8590c);
pub const WHITE: AppColor = AppColor::new(1.0, 1.0, 1.0);
pub const CHART_START: AppColor = AppColor::from_hex(0x667eea);
pub const CHART_END: AppColor = AppColor::from_hex(0x764ba2);
pub const SUCCESS: AppColor = AppColor::from_hex(0x12b886);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peniko_conversion_keeps_channels() {
        let color = AppColor::from_hex(0x667eea).with_alpha(0.5);
        let [r, g, b, a] = color.to_peniko().components;
        assert_eq!((r, g, b, a), (color.r, color.g, color.b, 0.5));
    }
}
