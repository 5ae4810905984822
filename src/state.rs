use std::time::Instant;

use crate::layout::Layout;

/// Mutable simulation state of the ball
#[derive(Clone, Debug, PartialEq)]
pub struct BallState {
    /// Texture scroll position, always in `[0, π/4)`
    pub phase: f64,
    /// Center of the ball in display coordinates
    pub position_x: f64,
    pub position_y: f64,
    /// Current radius
    pub scale: f64,
    /// Bob angle, always in `[0, 2π)`
    pub bob_angle: f64,
    pub moving_right: bool,
    pub moving_up: bool,
    /// Vertical position on the previous frame
    pub last_position_y: f64,
}

impl BallState {
    /// Ball at the horizontal center, at the top of its bob, heading right
    pub fn new(layout: &Layout) -> Self {
        let top = layout.v_centering - layout.y_amplitude;
        BallState {
            phase: 0.0,
            position_x: layout.center_x(),
            position_y: top,
            scale: layout.scale + layout.scale_amplitude,
            bob_angle: 0.0,
            moving_right: true,
            moving_up: false,
            last_position_y: top,
        }
    }
}

/// Bounces raised during one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BounceEvents {
    pub wall: bool,
    pub floor: bool,
}

impl BounceEvents {
    /// True when either wall or floor fired
    pub fn any(self) -> bool {
        self.wall || self.floor
    }
}

/// One run of the animation
#[derive(Clone, Debug)]
pub struct AnimationSession {
    pub ball: BallState,
    /// How long to run, in milliseconds; 0 runs until cancelled
    pub duration_ms: u64,
    pub started_ms: u64,
    pub frames: u64,
    pub done: bool,
    wall_hit: bool,
    floor_hit: bool,
}

impl AnimationSession {
    /// Session for `ball`, running for `duration_ms` or forever when 0
    pub fn new(ball: BallState, duration_ms: u64) -> Self {
        AnimationSession {
            ball,
            duration_ms,
            started_ms: 0,
            frames: 0,
            done: false,
            wall_hit: false,
            floor_hit: false,
        }
    }

    /// Latches the frame's bounces until the caller takes them
    pub fn raise(&mut self, events: BounceEvents) {
        self.wall_hit |= events.wall;
        self.floor_hit |= events.floor;
    }

    /// Reads and clears the wall bounce signal
    pub fn take_wall_hit(&mut self) -> bool {
        std::mem::take(&mut self.wall_hit)
    }

    /// Reads and clears the floor bounce signal
    pub fn take_floor_hit(&mut self) -> bool {
        std::mem::take(&mut self.floor_hit)
    }

    /// Takes both signals at once
    pub fn take_events(&mut self) -> BounceEvents {
        BounceEvents {
            wall: self.take_wall_hit(),
            floor: self.take_floor_hit(),
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }

    /// Whether the configured duration has run out at `now_ms`
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.duration_ms > 0 && self.elapsed_ms(now_ms) >= self.duration_ms
    }
}

/// Frames-per-second estimate, refreshed once a second
pub struct FpsCounter {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl FpsCounter {
    pub fn new() -> Self {
        FpsCounter {
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    /// Counts a frame; returns the new estimate when one is due
    pub fn tick(&mut self) -> Option<f64> {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
            return Some(self.fps);
        }
        None
    }
}
