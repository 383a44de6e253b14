/// Backend-independent RGBA color, channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_hex(rgb: u32) -> Self {
        Self::new(
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
        )
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// 8-bit channels, premultiplied by nothing.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Create a lighter version (hover highlight).
    pub fn lighten(self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).min(1.0),
            g: (self.g + amount).min(1.0),
            b: (self.b + amount).min(1.0),
            a: self.a,
        }
    }
}

/// Fill color plus the darker shade its gradient runs into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPair {
    pub fill: AppColor,
    pub shadow: AppColor,
}

const fn pair(fill: u32, shadow: u32) -> ColorPair {
    ColorPair {
        fill: AppColor::from_hex(fill),
        shadow: AppColor::from_hex(shadow),
    }
}

pub const PALETTE: [ColorPair; 12] = [
    pair(0x667eea, 0x4c63d2),
    pair(0x12b886, 0x0ca678),
    pair(0xfab005, 0xe09f04),
    pair(0xfa5252, 0xe03e3e),
    pair(0x228be6, 0x1c7ed6),
    pair(0xbe4bdb, 0xae3ec9),
    pair(0x20c997, 0x1bb386),
    pair(0xfd7e14, 0xe8590c),
    pair(0x4c6ef5, 0x3b5bdb),
    pair(0x82c91e, 0x74b816),
    pair(0x15aabf, 0x1098ad),
    pair(0xe64980, 0xd6336c),
];

/// Color pair for the distinct item at `index`, cycling through the palette.
pub fn item_colors(index: usize) -> ColorPair {
    PALETTE[index % PALETTE.len()]
}
