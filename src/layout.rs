use anyhow::{ensure, Result};

use crate::config::AnimationConfig;

/// Extra room around the ball, in pixels, so the breathing scale never
/// touches the sprite edge
const AMPLITUDE_FACTOR: f64 = 4.0;

/// Geometry derived from the configured region
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub region_x: f64,
    pub width: f64,
    /// Radius of the ball at the top of its bob
    pub scale: f64,
    /// How much the radius grows as the ball drops
    pub scale_amplitude: f64,
    /// Vertical travel of the ball's center
    pub y_amplitude: f64,
    /// Center line of the ball when it touches the floor
    pub v_centering: f64,
    pub left_boundary: f64,
    pub right_boundary: f64,
    pub sprite_width: u32,
    pub sprite_height: u32,
    pub sprite_center_x: i32,
    pub sprite_center_y: i32,
}

impl Layout {
    /// Derives the ball's geometry from `config`
    ///
    /// Fails when the region cannot hold the sprite at every point of its
    /// bounce, horizontally or vertically.
    pub fn new(config: &AnimationConfig) -> Result<Self> {
        config.validate()?;

        let width = config.width as f64;
        let height = config.height as f64;
        let region_x = config.x as f64;
        let region_y = config.y as f64;

        let scale = height / config.scale_ratio as f64;
        let scale_amplitude = scale / AMPLITUDE_FACTOR;
        let max_scale = scale + scale_amplitude;

        let sprite_size = ((max_scale + AMPLITUDE_FACTOR) * 2.0) as u32;
        let sprite_center_x = (sprite_size / 2 + sprite_size % 2) as i32;
        let sprite_center_y = (sprite_size / 2 - sprite_size % 2) as i32;

        let bounce_margin = (AMPLITUDE_FACTOR * 2.0 + max_scale).trunc();
        let left_boundary = region_x + bounce_margin;
        let right_boundary = region_x + width - bounce_margin;

        ensure!(
            sprite_size <= config.height && sprite_size <= config.width,
            "a {}x{} region is too small for a ball of ratio {}",
            config.width,
            config.height,
            config.scale_ratio
        );
        ensure!(
            left_boundary < right_boundary,
            "a {}px wide region leaves no room to bounce",
            config.width
        );

        let y_amplitude = (height - max_scale) / 2.0;
        let v_centering = region_y + (height - 1.0) - (max_scale + AMPLITUDE_FACTOR);
        // Sprite rows at the top of the bob and resting on the floor
        let highest = (v_centering - y_amplitude - sprite_center_y as f64) as i64;
        let lowest = (v_centering - sprite_center_y as f64) as i64 + sprite_size as i64;
        ensure!(
            highest >= config.y as i64 && lowest <= config.y as i64 + config.height as i64,
            "a {}px high region cannot hold the bounce of a ball of ratio {}",
            config.height,
            config.scale_ratio
        );

        Ok(Layout {
            region_x,
            width,
            scale,
            scale_amplitude,
            y_amplitude,
            v_centering,
            left_boundary,
            right_boundary,
            sprite_width: sprite_size,
            sprite_height: sprite_size,
            sprite_center_x,
            sprite_center_y,
        })
    }

    /// Horizontal starting point of the ball
    pub fn center_x(&self) -> f64 {
        self.region_x + self.width / 2.0
    }

    /// Size of the buffer the shadow is drawn into
    pub fn shadow_size(&self) -> (u32, u32) {
        (self.sprite_width / 2, self.sprite_height / 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: u32) -> AnimationConfig {
        AnimationConfig {
            width: side,
            height: side,
            ..AnimationConfig::default()
        }
    }

    #[test]
    fn square_240_matches_reference_numbers() {
        let layout = Layout::new(&square(240)).unwrap();
        assert_eq!(layout.scale, 48.0);
        assert_eq!(layout.scale_amplitude, 12.0);
        assert_eq!(layout.sprite_width, 128);
        assert_eq!(layout.sprite_center_x, 64);
        assert_eq!(layout.sprite_center_y, 64);
        assert_eq!(layout.y_amplitude, 90.0);
        assert_eq!(layout.v_centering, 175.0);
        assert_eq!(layout.left_boundary, 68.0);
        assert_eq!(layout.right_boundary, 172.0);
        assert_eq!(layout.center_x(), 120.0);
        assert_eq!(layout.shadow_size(), (64, 16));
    }

    #[test]
    fn odd_sprite_sizes_shift_the_center() {
        // (40.6 + 10.15 + 4) * 2 = 109.5, truncated to 109
        let config = AnimationConfig {
            width: 203,
            height: 203,
            ..AnimationConfig::default()
        };
        let layout = Layout::new(&config).unwrap();
        let size = layout.sprite_width as i32;
        assert_eq!(size % 2, 1);
        assert_eq!(layout.sprite_center_x, size / 2 + 1);
        assert_eq!(layout.sprite_center_y, size / 2 - 1);
    }

    #[test]
    fn region_offset_moves_boundaries() {
        let config = AnimationConfig {
            x: 10,
            y: 20,
            ..square(240)
        };
        let layout = Layout::new(&config).unwrap();
        assert_eq!(layout.left_boundary, 78.0);
        assert_eq!(layout.right_boundary, 182.0);
        assert_eq!(layout.v_centering, 195.0);
    }

    #[test]
    fn rejects_regions_without_room() {
        let narrow = AnimationConfig {
            width: 100,
            height: 240,
            ..AnimationConfig::default()
        };
        assert!(Layout::new(&narrow).is_err());
        let flat = AnimationConfig {
            width: 320,
            height: 0,
            ..AnimationConfig::default()
        };
        assert!(Layout::new(&flat).is_err());
    }

    #[test]
    fn rejects_bounces_that_leave_the_top() {
        // Fits by width and height, but the top of the bob is 39px above
        // the region
        let config = AnimationConfig {
            y: 20,
            scale_ratio: 3,
            ..AnimationConfig::default()
        };
        let err = Layout::new(&config).unwrap_err();
        assert!(err.to_string().contains("cannot hold the bounce"));
    }

    #[test]
    fn sprite_stays_inside_the_region_at_both_ends_of_the_bob() {
        for (height, ratio) in [(240, 5), (48, 6), (203, 5), (600, 4)] {
            let config = AnimationConfig {
                y: 7,
                width: 320.max(height),
                height,
                scale_ratio: ratio,
                ..AnimationConfig::default()
            };
            let layout = Layout::new(&config).unwrap();
            let top = (layout.v_centering - layout.y_amplitude - layout.sprite_center_y as f64)
                as i32;
            let bottom = (layout.v_centering - layout.sprite_center_y as f64) as i32
                + layout.sprite_height as i32;
            assert!(top >= 7, "{height}/{ratio}: top {top}");
            assert!(bottom <= 7 + height as i32, "{height}/{ratio}: bottom {bottom}");
        }
    }
}
