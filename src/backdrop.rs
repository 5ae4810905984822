use crate::color::Color;
use crate::config::AnimationConfig;
use crate::surface::Surface;

/// The grid wall and the perspective floor behind the ball
///
/// Everything is laid out in display coordinates, so the same backdrop can be
/// drawn into any buffer by passing the buffer's top-left display position.
#[derive(Clone, Debug)]
pub struct Backdrop {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    color: Color,
    /// Height of the floor band
    floor_height: i32,
    step_x: i32,
    step_y: i32,
    gradient: bool,
}

impl Backdrop {
    /// Returns `None` when wires are disabled
    pub fn new(config: &AnimationConfig) -> Option<Self> {
        if config.wires == 0 {
            return None;
        }
        let wires = config.wires as i32;
        let width = config.width as i32;
        let height = config.height as i32;
        Some(Backdrop {
            x: config.x as i32,
            y: config.y as i32,
            width,
            height,
            color: config.grid,
            floor_height: (height * 2 / wires).min(height),
            step_x: (width / wires).max(1),
            step_y: (height / wires).max(1),
            gradient: config.gradient,
        })
    }

    /// Display row where the wall meets the floor
    pub fn horizon(&self) -> i32 {
        self.y + self.height - self.floor_height
    }

    /// Display row of the shadow buffer's top edge, for a shadow of the given
    /// height resting on the floor
    pub fn shadow_top(&self, shadow_height: i32) -> i32 {
        self.horizon() + (self.floor_height - shadow_height) / 2 + shadow_height
    }

    /// Draws the grid into `target`, whose top-left corner sits at
    /// `(origin_x, origin_y)` on the display
    pub fn draw<S: Surface>(&self, target: &mut S, origin_x: i32, origin_y: i32) {
        let horizon = self.horizon();
        let bottom = self.y + self.height - 1;
        let center = self.width / 2;

        if self.gradient {
            self.draw_gradient(target, origin_x, origin_y);
        }

        // Wall columns, continued as floor rays fanning out from the center
        for i in (0..self.width).step_by(self.step_x as usize) {
            let x = self.x + i;
            target.draw_vline(x - origin_x, self.y - origin_y, horizon - self.y, self.color);

            let spread = self.x + center + (i - center) * 3;
            let (end_x, end_y) = self.clip_ray(x, horizon, spread, bottom);
            target.draw_line(
                x - origin_x,
                horizon - origin_y,
                end_x - origin_x,
                end_y - origin_y,
                self.color,
            );
        }

        // Wall rows
        for j in (0..self.height - self.floor_height).step_by(self.step_y as usize) {
            target.draw_hline(self.x - origin_x, self.y + j - origin_y, self.width, self.color);
        }

        // Floor rows, closer together toward the horizon
        target.draw_hline(self.x - origin_x, horizon - origin_y, self.width, self.color);
        for divisor in [16, 8, 4, 2] {
            let row = horizon + self.floor_height / divisor;
            if row <= bottom {
                target.draw_hline(self.x - origin_x, row - origin_y, self.width, self.color);
            }
        }
    }

    /// Fills the wall with a red-to-cyan sweep, one row at a time in blocks a
    /// quarter grid cell wide
    fn draw_gradient<S: Surface>(&self, target: &mut S, origin_x: i32, origin_y: i32) {
        let block = (self.step_x / 4).max(1);
        for row in 0..self.height - self.floor_height {
            let shade = (row % 256) as u8;
            for col in (0..self.width).step_by(block as usize) {
                let color = Color::from_rgb(shade, 255 - shade, 255 - ((col / 2) % 256) as u8);
                target.draw_hline(
                    self.x + col - origin_x,
                    self.y + row - origin_y,
                    block.min(self.width - col),
                    color,
                );
            }
        }
    }

    /// Shortens a floor ray so it ends on the region's side edge instead of
    /// spilling outside it
    fn clip_ray(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> (i32, i32) {
        let left = self.x;
        let right = self.x + self.width - 1;
        let edge = if x1 < left {
            left
        } else if x1 > right {
            right
        } else {
            return (x1, y1);
        };
        let t = (edge - x0) as f64 / (x1 - x0) as f64;
        (edge, y0 + ((y1 - y0) as f64 * t).round() as i32)
    }
}
