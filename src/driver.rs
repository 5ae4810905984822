use anyhow::Result;
use log::{debug, info};

use crate::backdrop::Backdrop;
use crate::bounce::BounceController;
use crate::clock::Clock;
use crate::color::Color;
use crate::config::AnimationConfig;
use crate::layout::Layout;
use crate::math::EIGHTH_PI;
use crate::sphere::SphereModel;
use crate::state::{AnimationSession, BallState};
use crate::surface::Surface;
use crate::tiler::Tiler;
use crate::transform::Transform;

/// The shadow and its grid overlay, drawn once per frame
struct ShadowLayer<S> {
    buffer: S,
    backdrop: Backdrop,
    top: i32,
}

/// Runs the boing ball on a display surface, one fixed-length frame at a time
pub struct FrameDriver<S: Surface> {
    config: AnimationConfig,
    layout: Layout,
    sphere: SphereModel,
    transform: Transform,
    tiler: Tiler,
    controller: BounceController,
    ball: S,
    shadow: Option<ShadowLayer<S>>,
}

impl<S: Surface> FrameDriver<S> {
    /// Lays out the region and allocates the ball and shadow buffers
    ///
    /// Fails with the layout error when the region cannot hold the ball. No
    /// buffer is created for the shadow when wires are disabled.
    pub fn new(config: AnimationConfig) -> Result<Self> {
        let layout = Layout::new(&config)?;
        let shadow = Backdrop::new(&config).map(|backdrop| {
            let (width, height) = layout.shadow_size();
            ShadowLayer {
                buffer: S::create(width, height),
                top: backdrop.shadow_top(height as i32),
                backdrop,
            }
        });
        debug!("layout {layout:?}");

        Ok(FrameDriver {
            transform: Transform::new(config.tilt_deg.to_radians()),
            controller: BounceController::new(&layout),
            ball: S::create(layout.sprite_width, layout.sprite_height),
            sphere: SphereModel::new(),
            tiler: Tiler::default(),
            shadow,
            layout,
            config,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// A fresh session with the ball in its starting position
    pub fn session(&self, duration_ms: u64) -> AnimationSession {
        AnimationSession::new(BallState::new(&self.layout), duration_ms)
    }

    /// Paints the region's background and, when enabled, the grid
    pub fn prepare(&self, display: &mut S) {
        self.clear(display);
        if let Some(shadow) = &self.shadow {
            shadow.backdrop.draw(display, 0, 0);
        }
    }

    /// Repaints the whole region with the background color
    pub fn clear(&self, display: &mut S) {
        display.fill_rect(
            self.config.x as i32,
            self.config.y as i32,
            self.config.width as i32,
            self.config.height as i32,
            self.config.background,
        );
    }

    /// Advances the simulation one step and draws the result onto `display`.
    /// Bounces are latched on the session for the caller to take.
    pub fn render_frame(&mut self, display: &mut S, session: &mut AnimationSession) {
        let events = self.controller.step(&mut session.ball);
        session.raise(events);
        session.frames += 1;

        let ball = &session.ball;
        let sprite_x = (ball.position_x - self.layout.sprite_center_x as f64) as i32;
        let sprite_y = (ball.position_y - self.layout.sprite_center_y as f64) as i32;

        self.ball.fill(self.config.background);

        if let Some(shadow) = &mut self.shadow {
            let bob = self.controller.bob(ball.bob_angle);
            let (width, height) = (shadow.buffer.width() as i32, shadow.buffer.height() as i32);
            let shadow_x = sprite_x + width / 2;

            // The shadow shrinks as the ball rises
            let flatten = 1.0 - 0.5 * bob;
            let rx = ((width / 2 - 4) as f64 * flatten) as i32;
            let ry = ((height / 2 - 2) as f64 * flatten) as i32;

            shadow.buffer.fill(self.config.background);
            shadow.buffer.fill_ellipse(width / 2, height / 2, rx, ry, self.config.shadow);
            shadow.backdrop.draw(&mut shadow.buffer, shadow_x, shadow.top);
            shadow.buffer.blit(display, shadow_x, shadow.top, None);

            shadow.backdrop.draw(&mut self.ball, sprite_x, sprite_y);
            shadow
                .buffer
                .blit(&mut self.ball, shadow_x - sprite_x, shadow.top - sprite_y, None);
        }

        let lattice = self.sphere.regenerate(ball.phase % EIGHTH_PI);
        self.transform.apply(
            lattice,
            ball.scale,
            self.layout.sprite_center_x as f64,
            self.layout.sprite_center_y as f64,
        );
        self.tiler.paint(lattice, ball.phase >= EIGHTH_PI, &mut self.ball);

        self.ball
            .blit(display, sprite_x, sprite_y, Some(Color::TRANSPARENT));
    }

    /// Plays `session` until its duration runs out or `on_frame` returns
    /// `Ok(false)`
    ///
    /// `on_frame` sees every finished frame and may take the session's bounce
    /// signals. Frames that run long are not dropped; the loop just falls
    /// behind.
    pub fn animate<C, F>(
        &mut self,
        display: &mut S,
        clock: &mut C,
        session: &mut AnimationSession,
        clear_after: bool,
        mut on_frame: F,
    ) -> Result<()>
    where
        C: Clock,
        F: FnMut(&S, &mut AnimationSession) -> Result<bool>,
    {
        session.done = false;
        session.started_ms = clock.now_ms();
        info!(
            "animating {}x{} for {}ms at {}ms per frame",
            self.config.width, self.config.height, session.duration_ms, self.config.frame_length_ms
        );
        self.prepare(display);

        while !session.done {
            let tick = clock.now_ms();
            self.render_frame(display, session);

            if !on_frame(display, session)? {
                debug!("cancelled after {} frames", session.frames);
                session.done = true;
                break;
            }

            let processing = clock.now_ms().saturating_sub(tick);
            if processing < self.config.frame_length_ms {
                clock.sleep_ms(self.config.frame_length_ms - processing);
            } else {
                debug!(
                    "frame {} took {}ms, over the {}ms budget",
                    session.frames, processing, self.config.frame_length_ms
                );
            }

            if session.is_expired(clock.now_ms()) {
                session.done = true;
            }
        }

        if clear_after {
            self.clear(display);
        }
        info!(
            "animation finished after {} frames in {}ms",
            session.frames,
            session.elapsed_ms(clock.now_ms())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::surface::Canvas;

    fn config() -> AnimationConfig {
        AnimationConfig {
            width: 240,
            height: 240,
            frame_length_ms: 20,
            ..AnimationConfig::default()
        }
    }

    fn display() -> Canvas {
        Canvas::create(240, 240)
    }

    #[test]
    fn runs_the_expected_number_of_frames() {
        let config = config();
        let background = config.background;
        let mut driver = FrameDriver::<Canvas>::new(config).unwrap();
        let mut display = display();
        let mut clock = ManualClock::default();
        let mut session = driver.session(1000);

        let mut seen = 0;
        driver
            .animate(&mut display, &mut clock, &mut session, true, |_, _| {
                seen += 1;
                Ok(true)
            })
            .unwrap();

        assert_eq!(session.frames, 50);
        assert_eq!(seen, 50);
        assert!(session.done);
        assert_eq!(clock.sleeps(), vec![20; 50]);
        assert!(display.pixels().iter().all(|&c| c == background));
    }

    #[test]
    fn keeps_the_last_frame_when_asked() {
        let mut driver = FrameDriver::<Canvas>::new(config()).unwrap();
        let mut display = display();
        let mut clock = ManualClock::default();
        let mut session = driver.session(100);

        driver
            .animate(&mut display, &mut clock, &mut session, false, |_, _| Ok(true))
            .unwrap();

        let red = display.pixels().iter().filter(|&&c| c == Color::RED).count();
        assert!(red > 1000);
        assert!(display.pixels().iter().all(|&c| c != Color::TRANSPARENT));
    }

    #[test]
    fn busy_frames_skip_the_sleep() {
        let mut driver = FrameDriver::<Canvas>::new(config()).unwrap();
        let mut display = display();
        let mut clock = ManualClock::default();
        let handle = clock.clone();
        let mut session = driver.session(200);

        driver
            .animate(&mut display, &mut clock, &mut session, true, |_, session| {
                // Every other frame overruns its budget
                handle.advance(if session.frames % 2 == 0 { 25 } else { 5 });
                Ok(true)
            })
            .unwrap();

        // 5ms + 15ms sleep, then 25ms with no sleep: 45ms per pair
        assert_eq!(clock.sleeps(), vec![15; 5]);
        assert_eq!(session.frames, 9);
    }

    #[test]
    fn hook_can_cancel_and_read_bounces() {
        let mut driver = FrameDriver::<Canvas>::new(config()).unwrap();
        let mut display = display();
        let mut clock = ManualClock::default();
        let mut session = driver.session(0);

        let mut floors = 0;
        driver
            .animate(&mut display, &mut clock, &mut session, true, |_, session| {
                if session.take_floor_hit() {
                    floors += 1;
                }
                Ok(floors < 2)
            })
            .unwrap();

        assert!(session.done);
        // Second floor contact, ~45 frames after the first at frame 23
        assert_eq!(session.frames, 68);
        assert!(!session.take_floor_hit());
    }

    #[test]
    fn hook_errors_stop_the_loop() {
        let mut driver = FrameDriver::<Canvas>::new(config()).unwrap();
        let mut display = display();
        let mut clock = ManualClock::default();
        let mut session = driver.session(0);

        let result = driver.animate(&mut display, &mut clock, &mut session, true, |_, _| {
            anyhow::bail!("terminal went away")
        });
        assert!(result.is_err());
        assert_eq!(session.frames, 1);
    }

    #[test]
    fn ball_frame_leaves_no_trail() {
        let config = AnimationConfig {
            wires: 0,
            ..config()
        };
        let background = config.background;
        let mut driver = FrameDriver::<Canvas>::new(config).unwrap();
        let mut display = display();
        let mut session = driver.session(0);
        driver.prepare(&mut display);

        for _ in 0..30 {
            driver.render_frame(&mut display, &mut session);
        }
        // Anything not background must be under the current sprite
        let layout = driver.layout().clone();
        let left = (session.ball.position_x - layout.sprite_center_x as f64) as i32;
        let top = (session.ball.position_y - layout.sprite_center_y as f64) as i32;
        for y in 0..240 {
            for x in 0..240 {
                let inside = (left..left + layout.sprite_width as i32).contains(&(x as i32))
                    && (top..top + layout.sprite_height as i32).contains(&(y as i32));
                if !inside {
                    assert_eq!(display.pixel(x, y), Some(background), "({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn shadow_is_drawn_on_the_floor() {
        let config = config();
        let shadow_color = config.shadow;
        let mut driver = FrameDriver::<Canvas>::new(config).unwrap();
        let mut display = display();
        let mut session = driver.session(0);
        driver.prepare(&mut display);
        driver.render_frame(&mut display, &mut session);

        let shadow = display.pixels().iter().filter(|&&c| c == shadow_color).count();
        assert!(shadow > 50);
    }

    #[test]
    fn rejects_a_region_too_small() {
        let config = AnimationConfig {
            width: 50,
            height: 120,
            ..AnimationConfig::default()
        };
        assert!(FrameDriver::<Canvas>::new(config).is_err());
    }
}
