use log::trace;

use crate::layout::Layout;
use crate::math::{wrap, QUARTER_PI, TWO_PI};
use crate::state::{BallState, BounceEvents};

/// Horizontal speed, in pixels per frame
pub const VELOCITY_X: f64 = 2.1;
/// Bob angle advance per frame, in radians
pub const VELOCITY_Y: f64 = 0.07;
/// Texture scroll per frame, in degrees
pub const PHASE_VELOCITY_DEG: f64 = 2.5;

/// Steps the ball's kinematics one frame at a time
#[derive(Clone, Debug)]
pub struct BounceController {
    left_boundary: f64,
    right_boundary: f64,
    base_scale: f64,
    scale_amplitude: f64,
    v_centering: f64,
    y_amplitude: f64,
    velocity_x: f64,
    velocity_y: f64,
    phase_velocity: f64,
}

impl BounceController {
    /// Controller bouncing between the layout's side boundaries
    pub fn new(layout: &Layout) -> Self {
        BounceController {
            left_boundary: layout.left_boundary,
            right_boundary: layout.right_boundary,
            base_scale: layout.scale,
            scale_amplitude: layout.scale_amplitude,
            v_centering: layout.v_centering,
            y_amplitude: layout.y_amplitude,
            velocity_x: VELOCITY_X,
            velocity_y: VELOCITY_Y,
            phase_velocity: PHASE_VELOCITY_DEG.to_radians(),
        }
    }

    /// Advances `ball` by one frame and reports the bounces it caused
    pub fn step(&self, ball: &mut BallState) -> BounceEvents {
        let mut events = BounceEvents::default();

        // Rolling right scrolls the texture backwards
        if ball.moving_right {
            ball.phase = wrap(ball.phase + (QUARTER_PI - self.phase_velocity), QUARTER_PI);
            ball.position_x += self.velocity_x;
        } else {
            ball.phase = wrap(ball.phase + self.phase_velocity, QUARTER_PI);
            ball.position_x -= self.velocity_x;
        }

        if ball.position_x >= self.right_boundary {
            ball.position_x = self.right_boundary;
            ball.moving_right = false;
            events.wall = true;
        } else if ball.position_x < self.left_boundary {
            ball.position_x = self.left_boundary;
            ball.moving_right = true;
            events.wall = true;
        }

        ball.bob_angle = wrap(ball.bob_angle + self.velocity_y, TWO_PI);
        let bob = self.bob(ball.bob_angle);
        ball.scale = self.base_scale + self.scale_amplitude * bob;
        ball.position_y = self.v_centering - self.y_amplitude * bob;

        // The floor is wherever the ball stops falling
        let trend = ball.position_y - ball.last_position_y;
        if !ball.moving_up && trend < 0.0 {
            events.floor = true;
        }
        ball.moving_up = ball.position_y < ball.last_position_y;
        ball.last_position_y = ball.position_y;

        if events.any() {
            trace!(
                "bounce wall={} floor={} at ({:.1}, {:.1})",
                events.wall,
                events.floor,
                ball.position_x,
                ball.position_y
            );
        }
        events
    }

    /// `|cos(angle)|`: 1 at the top of the bob, 0 on the floor
    pub fn bob(&self, angle: f64) -> f64 {
        angle.cos().abs()
    }

    #[cfg(test)]
    fn with_velocity_x(mut self, velocity_x: f64) -> Self {
        self.velocity_x = velocity_x;
        self
    }
}
