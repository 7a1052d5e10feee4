//! Barrage headless replay runner
//!
//! Loads a level, replays it at a fixed step against a stationary target and
//! reports hazard counts, hits and a frame signature for determinism checks.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use log::{LevelFilter, info};

#[cfg(not(target_arch = "wasm32"))]
use barrage::consts::PLAYFIELD_CENTER;
#[cfg(not(target_arch = "wasm32"))]
use barrage::{BulletEngine, EngineTuning, Level};

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level document (JSON)
    level: PathBuf,

    /// How much of the timeline to replay
    #[arg(long, default_value_t = 10_000)]
    duration_ms: i32,

    /// Fixed step per frame
    #[arg(long, default_value_t = 16)]
    step_ms: i32,

    /// Target x in playfield pixels (defaults to the center)
    #[arg(long)]
    target_x: Option<f32>,

    /// Target y in playfield pixels (defaults to the center)
    #[arg(long)]
    target_y: Option<f32>,

    /// Replay seed
    #[arg(long, default_value_t = 99)]
    seed: u64,

    /// Ring density scale (0.25 to 3)
    #[arg(long, default_value_t = 1.0)]
    density: f32,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logger(level: &str) {
    let filter = match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::from_default_env()
        .filter_level(filter)
        .init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(&args.log_level);

    let level = match Level::load(&args.level) {
        Ok(level) => level,
        Err(e) => {
            log::error!("{}: {}", args.level.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let tuning = EngineTuning {
        seed: args.seed,
        ring_density_scale: args.density,
        ..EngineTuning::default()
    };
    let mut engine = BulletEngine::new(tuning);
    let report = engine.reset(&level);
    info!(
        "Replaying {} ({} events, {} warnings)",
        args.level.display(),
        report.events,
        report.warnings
    );

    let target = glam::Vec2::new(
        args.target_x.unwrap_or(PLAYFIELD_CENTER.x),
        args.target_y.unwrap_or(PLAYFIELD_CENTER.y),
    );
    let step_ms = args.step_ms.max(1);
    let dt = step_ms as f32 / 1000.0;

    let mut frames = 0u64;
    let mut hit_frames = 0u64;
    let mut peak_hazards = 0;
    let mut signature = 0u64;
    let mut next_log_ms = 0;

    let mut timeline_ms = 0;
    while timeline_ms <= args.duration_ms {
        let frame = engine.update(dt, timeline_ms, target);
        frames += 1;
        peak_hazards = peak_hazards.max(frame.active_hazards());
        if engine.check_target_hit(target) {
            hit_frames += 1;
        }
        signature = signature.rotate_left(5) ^ engine.signature();

        if timeline_ms >= next_log_ms {
            info!(
                "t={:>6} ms  hazards={:>4}  near={:>3}  clearance={:>8.1}",
                timeline_ms,
                frame.active_hazards(),
                frame.danger.near_count,
                frame.danger.min_clearance
            );
            next_log_ms += 1000;
        }
        timeline_ms += step_ms;
    }

    let diagnostics = engine.diagnostics();
    info!(
        "Done: {} frames, {} with hits, peak {} hazards, {} potentially impossible, pool {}",
        frames,
        hit_frames,
        peak_hazards,
        diagnostics.potentially_impossible_events,
        diagnostics.pool_capacity
    );
    println!("{signature:016x}");
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
