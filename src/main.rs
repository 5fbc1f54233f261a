//! glowdust: pointer-following particle glow.

use std::path::PathBuf;

use clap::Parser;
use glowdust::prelude::*;
use glowdust::time::NOMINAL_FRAME;
use glowdust::{window, AppError, HeadlessRunner};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "glowdust", version, about = "Pointer-following particle glow")]
struct Args {
    /// JSON config file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render without a window and write a PNG snapshot
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Snapshot path for headless mode
    #[arg(short, long, default_value = "glowdust.png")]
    output: PathBuf,

    /// Headless viewport width (logical units)
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Headless viewport height (logical units)
    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Headless device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Treat the device as touch-first (reduced particle budget)
    #[arg(long)]
    touch: bool,

    /// Seed for reproducible spawns
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = verbosity_level(args.verbose) {
        logger.filter_level(level);
    }
    logger.init();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if args.headless {
        run_headless(&args, config)
    } else {
        window::run(config, args.touch, args.seed)
    }
}

/// Level forced by `-v` flags; `None` leaves `RUST_LOG` in charge.
fn verbosity_level(verbose: u8) -> Option<log::LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

fn run_headless(args: &Args, config: Config) -> Result<(), AppError> {
    let viewport = Viewport::new(args.width, args.height, args.pixel_ratio);
    let mut session = match args.seed {
        Some(seed) => Session::with_seed(config, seed),
        None => Session::new(config),
    };
    session.start(Canvas::new(viewport), &DeviceProfile::new(viewport, args.touch));

    // Sweep the pointer around the middle of the surface.
    let center = viewport.size() * 0.5;
    let orbit = viewport.size().min_element() * 0.25;
    let frames = args.frames;
    let rendered = HeadlessRunner::new().realtime(false).run(&mut session, frames, |i, s| {
        let angle = i as f32 / frames.max(1) as f32 * std::f32::consts::TAU;
        let at = center + Vec2::from_angle(angle) * orbit;
        s.set_pointer_position(at.x, at.y);
    });

    let live = session.store().map_or(0, ParticleStore::live_count);
    if let Some(canvas) = session.surface() {
        canvas.save_png(&args.output)?;
    }
    info!(
        "rendered {rendered} frames ({:?} simulated), {live} particles live, wrote {}",
        NOMINAL_FRAME * rendered,
        args.output.display()
    );

    session.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag_sets_logger_level() {
        let args = Args::parse_from(["glowdust", "-vv", "--headless"]);
        assert_eq!(verbosity_level(args.verbose), Some(log::LevelFilter::Debug));

        let mut logger = env_logger::Builder::new();
        logger.filter_level(log::LevelFilter::Warn);
        if let Some(level) = verbosity_level(args.verbose) {
            logger.filter_level(level);
        }
        let logger = logger.build();
        assert_eq!(logger.filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_level(0), None);
        assert_eq!(verbosity_level(1), Some(log::LevelFilter::Info));
        assert_eq!(verbosity_level(5), Some(log::LevelFilter::Trace));
    }
}
