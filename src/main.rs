mod backdrop;
mod bounce;
mod clock;
mod color;
mod config;
mod driver;
mod graphics;
mod layout;
mod math;
mod sphere;
mod state;
mod surface;
mod terminal;
mod tiler;
mod transform;
mod vertex;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};

use crate::clock::SystemClock;
use crate::color::Color;
use crate::config::AnimationConfig;
use crate::driver::FrameDriver;
use crate::layout::Layout;
use crate::state::FpsCounter;
use crate::surface::{Canvas, Surface};
use crate::terminal::TerminalDisplay;

/// The Amiga boing ball, bouncing in your terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// How long to run, in milliseconds; 0 runs until q or Esc is pressed
    #[arg(short, long, default_value_t = 0)]
    duration: u64,

    /// Target duration of one frame, in milliseconds
    #[arg(short, long, default_value_t = 20)]
    frame_length: u64,

    /// Number of grid lines; 0 disables the grid and the shadow
    #[arg(short, long, default_value_t = 7)]
    wires: u8,

    /// The ball's radius is the region height divided by this; by default
    /// the smallest ratio from 5 up whose bounce fits the region
    #[arg(short, long)]
    scale_ratio: Option<u16>,

    /// Lean of the ball, in degrees
    #[arg(short, long, default_value_t = 17.0)]
    tilt: f64,

    /// Background color, as RRGGBB
    #[arg(long, default_value = "a9a9a9")]
    background: Color,

    /// Grid color, as RRGGBB
    #[arg(long, default_value = "ac00ac")]
    grid: Color,

    /// Shadow color, as RRGGBB
    #[arg(long, default_value = "666666")]
    shadow: Color,

    /// Region width in pixels; defaults to the terminal width
    #[arg(long)]
    width: Option<u32>,

    /// Region height in pixels; defaults to twice the terminal height
    #[arg(long)]
    height: Option<u32>,

    /// Paint a color gradient behind the wall grid
    #[arg(long)]
    gradient: bool,

    /// Leave the last frame on screen instead of clearing the region
    #[arg(long)]
    keep: bool,

    /// Ring the terminal bell when the ball bounces
    #[arg(long)]
    bell: bool,

    /// Render without touching the terminal; needs a duration
    #[arg(long)]
    headless: bool,

    /// Write the last rendered frame to this image file (png, ppm, bmp, ...)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Send log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn validate(&self) -> Result<()> {
        if self.headless && self.duration == 0 {
            bail!("--headless needs a --duration, there is no key to stop it with");
        }
        Ok(())
    }

    fn config(&self, (width, height): (u32, u32)) -> AnimationConfig {
        let config = AnimationConfig {
            frame_length_ms: self.frame_length,
            wires: self.wires,
            background: self.background,
            grid: self.grid,
            shadow: self.shadow,
            x: 0,
            y: 0,
            width: self.width.unwrap_or(width),
            height: self.height.unwrap_or(height),
            scale_ratio: self.scale_ratio.unwrap_or(DEFAULT_SCALE_RATIO),
            tilt_deg: self.tilt,
            gradient: self.gradient,
        };
        match self.scale_ratio {
            Some(_) => config,
            None => fit_scale_ratio(config),
        }
    }
}

const DEFAULT_SCALE_RATIO: u16 = 5;
const MAX_SCALE_RATIO: u16 = 64;

/// Shrinks the ball until its bounce fits the region. Leaves the default in
/// place when nothing fits, so the layout error reaches the user.
fn fit_scale_ratio(config: AnimationConfig) -> AnimationConfig {
    let fitted = (DEFAULT_SCALE_RATIO..=MAX_SCALE_RATIO).find(|&scale_ratio| {
        let candidate = AnimationConfig {
            scale_ratio,
            ..config.clone()
        };
        Layout::new(&candidate).is_ok()
    });
    match fitted {
        Some(scale_ratio) => {
            if scale_ratio != DEFAULT_SCALE_RATIO {
                debug!(
                    "scale ratio {scale_ratio} fits a {}x{} region",
                    config.width, config.height
                );
            }
            AnimationConfig {
                scale_ratio,
                ..config
            }
        }
        None => config,
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Renders into memory only
fn run_headless(args: &Args, config: AnimationConfig) -> Result<Canvas> {
    let mut display = Canvas::create(config.x + config.width, config.y + config.height);
    let mut driver = FrameDriver::<Canvas>::new(config)?;
    let mut session = driver.session(args.duration);
    let mut last_frame = None;

    driver.animate(
        &mut display,
        &mut SystemClock::new(),
        &mut session,
        !args.keep,
        |frame, session| {
            let events = session.take_events();
            if events.any() {
                debug!("frame {}: {:?}", session.frames, events);
            }
            if args.snapshot.is_some() {
                last_frame = Some(frame.clone());
            }
            Ok(true)
        },
    )?;

    Ok(last_frame.unwrap_or(display))
}

fn run_terminal(args: &Args, config: AnimationConfig) -> Result<Canvas> {
    let mut display = Canvas::create(config.x + config.width, config.y + config.height);
    let mut driver = FrameDriver::<Canvas>::new(config)?;
    debug!("ball radius {:.1}px", driver.layout().scale);
    let mut session = driver.session(args.duration);
    let mut screen = TerminalDisplay::new()?;
    let mut fps = FpsCounter::new();
    let mut last_frame = None;
    let mut cancelled = false;

    driver.animate(
        &mut display,
        &mut SystemClock::new(),
        &mut session,
        !args.keep,
        |frame, session| {
            if session.take_events().any() && args.bell {
                screen.bell()?;
            }
            screen.present(frame)?;
            if let Some(fps) = fps.tick() {
                debug!("{fps:.1} fps");
            }
            if args.snapshot.is_some() {
                last_frame = Some(frame.clone());
            }
            cancelled = screen.quit_requested()?;
            Ok(!cancelled)
        },
    )?;

    if args.keep && !cancelled {
        // Hold the final frame until q or Esc
        screen.present(&display)?;
        while !screen.quit_requested()? {
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
    }

    Ok(last_frame.unwrap_or(display))
}

/// Main function
fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;
    init_logging(args.log_file.as_ref())?;

    let region = if args.headless {
        (320, 240)
    } else {
        terminal::pixel_size(terminal::size())
    };
    let config = args.config(region);
    info!(
        "region {}x{}, background {}, grid {}, shadow {}",
        config.width, config.height, config.background, config.grid, config.shadow
    );

    let last_frame = if args.headless {
        run_headless(&args, config)?
    } else {
        run_terminal(&args, config)?
    };

    if let Some(path) = &args.snapshot {
        last_frame.save_snapshot(path)?;
        info!("saved snapshot to {}", path.display());
    }
    Ok(())
}
