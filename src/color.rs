use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context};

/// A 16-bit RGB565 color, the native encoding of the small TFT panels the
/// demo was born on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xffff);
    pub const RED: Color = Color(0xf800);
    /// Sprite transparency key, never produced by the renderer itself
    pub const TRANSPARENT: Color = Color(0x0120);

    /// Packs 8-bit channels into RGB565
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u16 & 0xf8) << 8) | ((g as u16 & 0xfc) << 3) | (b as u16 >> 3))
    }

    /// Expands back to 8-bit channels, replicating the high bits
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 11) & 0x1f) as u8;
        let g = ((self.0 >> 5) & 0x3f) as u8;
        let b = (self.0 & 0x1f) as u8;
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.to_rgb();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Parses `RRGGBB`, with or without a leading `#`
impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            bail!("expected a color as RRGGBB, got {s:?}");
        }
        let value =
            u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex color {s:?}"))?;
        Ok(Color::from_rgb(
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ))
    }
}
