use anyhow::Result;
use clap::Parser;
use rand::Rng;
use solar_tour::app::{App, LaunchOptions};
use solar_tour::tour::{Preset, TourTuning};
use winit::event_loop::EventLoop;

/// Scroll-driven tour of the solar system.
#[derive(Parser, Debug)]
#[command(name = "solar-tour", about = "Scroll through the solar system")]
struct Args {
    /// Constant preset controlling the camera mapping, rotation speeds and
    /// starfield spread.
    #[arg(long, value_enum, default_value_t = Preset::Classic)]
    preset: Preset,

    /// Texture quality tag, the `2k` in `assets/2k_earth.jpg`.
    #[arg(long, default_value = "2k")]
    quality: String,

    /// Seed for the starfield and the idle-rotation jitter. Random when
    /// omitted.
    #[arg(long)]
    seed: Option<u64>,
}

fn run(args: Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let options = LaunchOptions {
        tuning: TourTuning::preset(args.preset),
        quality: args.quality,
        seed,
    };
    let event_loop = EventLoop::new()?;
    let mut app = App::new(options);
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(args)
}
