use anyhow::{ensure, Result};

use crate::color::Color;

/// Everything a session needs, resolved once before the first frame
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Target wall-clock duration of one frame, in milliseconds
    pub frame_length_ms: u64,
    /// Grid line count; 0 disables the grid and the shadow
    pub wires: u8,
    pub background: Color,
    pub grid: Color,
    pub shadow: Color,
    /// Top-left corner of the animation region on the display
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// The ball's base radius is `height / scale_ratio`
    pub scale_ratio: u16,
    /// Static lean of the ball, in degrees
    pub tilt_deg: f64,
    /// Paint a color gradient behind the wall grid
    pub gradient: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            frame_length_ms: 20,
            wires: 7,
            background: Color::from_rgb(0xa9, 0xa9, 0xa9),
            grid: Color::from_rgb(0xac, 0x00, 0xac),
            shadow: Color::from_rgb(0x66, 0x66, 0x66),
            x: 0,
            y: 0,
            width: 320,
            height: 240,
            scale_ratio: 5,
            tilt_deg: 17.0,
            gradient: false,
        }
    }
}

impl AnimationConfig {
    /// Rejects regions the renderer cannot lay a ball out in
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "animation region must not be empty (got {}x{})",
            self.width,
            self.height
        );
        ensure!(self.scale_ratio > 0, "scale ratio must be at least 1");
        ensure!(self.frame_length_ms > 0, "frame length must be at least 1ms");
        ensure!(self.tilt_deg.is_finite(), "tilt must be a finite angle");
        for (name, color) in [
            ("background", self.background),
            ("grid", self.grid),
            ("shadow", self.shadow),
        ] {
            ensure!(
                color != Color::TRANSPARENT,
                "{name} color {color} is the sprite transparency key, pick a neighbouring shade"
            );
        }
        Ok(())
    }
}
