//! Host simulator for the fpcam renderer.
//!
//! Runs the double-buffered frame loop against a software console that
//! decodes every submitted linked list, so chain corruption and barrier
//! mistakes show up on a desktop without real hardware.

mod input;
mod sim;

use std::process;

use clap::Parser;
use thiserror::Error;

use fpcam_core::assets::{self, room};
use fpcam_core::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use fpcam_core::gpu::{GpuDriver, GpuError};
use fpcam_core::input::poll_pad;
use fpcam_core::scene::{ControlState, FrameScheduler, Viewer};
use fpcam_hal::ControllerBus;

use input::ScriptedPad;
use sim::{SimConfig, SimError, SimHardware};

#[derive(Parser)]
#[command(name = "fpcam-pc")]
#[command(about = "Run the first-person room viewer on simulated hardware", long_about = None)]
#[command(version)]
struct Args {
    /// Frames to render before exiting
    #[arg(short, long, default_value_t = 240)]
    frames: u32,

    /// Start with textured walls
    #[arg(short, long)]
    textured: bool,

    /// Start with the help overlay hidden
    #[arg(long)]
    hide_help: bool,

    /// Polls a DMA transfer stays busy for
    #[arg(long, default_value_t = 4)]
    dma_latency: u32,

    /// Polls between vertical blanks
    #[arg(long, default_value_t = 8)]
    vblank_period: u32,

    /// Report a PAL console
    #[arg(long)]
    pal: bool,

    /// Run with no controller plugged in
    #[arg(long)]
    no_pad: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("GPU driver: {0}")]
    Gpu(GpuError),
    #[error("frame {frame}: {source}")]
    Sim { frame: u32, source: SimError },
}

impl From<GpuError> for AppError {
    fn from(err: GpuError) -> Self {
        AppError::Gpu(err)
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    log::info!("fpcam-pc: simulated host starting");

    if let Err(e) = run(args) {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let hw = SimHardware::new(SimConfig {
        pal: args.pal,
        dma_latency: args.dma_latency,
        vblank_period: args.vblank_period.max(1),
        ..SimConfig::default()
    });
    let mut gpu = GpuDriver::new(hw, SCREEN_WIDTH, SCREEN_HEIGHT);
    log::info!("video mode: {:?}", gpu.video_mode());

    let textures = assets::upload(&mut gpu)?;
    let mut viewer = Viewer::new(room::mesh(), textures.walls, textures.font);
    viewer.controls = ControlState::new(!args.hide_help, args.textured);

    let mut scheduler: Box<FrameScheduler> = Box::default();

    let mut pad = if args.no_pad {
        ScriptedPad::disconnected()
    } else {
        ScriptedPad::tour()
    };
    pad.init();

    let mut peak_words = 0;
    for _ in 0..args.frames {
        let frame = scheduler.frame_number();
        let report = poll_pad(&mut pad, 0);
        let stats = viewer.step(scheduler.as_mut(), &mut gpu, report.as_ref())?;

        if let Some(source) = gpu.hw_mut().take_error() {
            return Err(AppError::Sim { frame, source });
        }
        peak_words = peak_words.max(stats.words);

        log::debug!(
            "frame {frame} slot {}: drawn {} back {} far {} behind {} glyphs {} words {}",
            stats.slot,
            stats.pass.drawn,
            stats.pass.back_facing,
            stats.pass.beyond_far,
            stats.pass.behind_camera,
            stats.glyphs,
            stats.words
        );
        if let Some(list) = gpu.hw().last_list() {
            log::trace!("list {:#08x}: {} packets {:?}", list.head, list.packets, list.commands);
        }
    }

    // Let the last transfer drain before reading the totals.
    gpu.wait_dma_done();
    let summary = gpu.hw().summary();
    log::info!(
        "rendered {} frames over {} vblanks; camera at {:?}",
        scheduler.frame_number(),
        summary.vblanks,
        viewer.camera.position
    );
    log::info!(
        "commands: {} flat + {} textured triangles, {} glyphs, {} fills; peak chain use {peak_words} words",
        summary.commands.flat_triangles,
        summary.commands.textured_triangles,
        summary.commands.rectangles,
        summary.commands.fills
    );
    log::info!(
        "{} other polygons, {} draw-mode words, {} VRAM writes ({} words)",
        summary.commands.other_polygons,
        summary.commands.draw_modes,
        summary.commands.vram_writes,
        summary.block_words
    );
    log::info!(
        "display {} at {:?}",
        if summary.display_enabled { "on" } else { "off" },
        summary.display_offset
    );
    Ok(())
}
