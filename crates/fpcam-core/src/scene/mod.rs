//! The first-person viewer: camera, controls and the per-frame step.

pub mod camera;
pub mod controls;
pub mod frame;

pub use camera::Camera;
pub use controls::{ControlConfig, ControlState};
pub use frame::{Frame, FrameScheduler, SlotRole};

use fpcam_hal::{DmaPort, GpuPort, VblankSource};

use crate::config::{ORDERING_TABLE_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::gpu::driver::{GpuDriver, GpuError};
use crate::gpu::texture::TextureInfo;
use crate::gte::{transform, Gte};
use crate::input::PadReport;
use crate::render::mesh::Mesh;
use crate::render::overlay;
use crate::render::pass::{self, PassStats, Shading};

/// What one call to [`Viewer::step`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Chain slot the frame was built in.
    pub slot: usize,
    pub pass: PassStats,
    /// Overlay glyphs drawn (0 with the help hidden).
    pub glyphs: usize,
    /// Command words used in the chain, trailing packets included.
    pub words: usize,
}

/// Everything the frame step reads and writes, passed explicitly.
pub struct Viewer<'a> {
    pub camera: Camera,
    pub controls: ControlState,
    pub config: ControlConfig,
    gte: Gte,
    mesh: Mesh<'a>,
    texture: TextureInfo,
    font: TextureInfo,
}

impl<'a> Viewer<'a> {
    /// Viewer for `mesh`, with the coprocessor set up for the configured
    /// screen and ordering table.
    pub fn new(mesh: Mesh<'a>, texture: TextureInfo, font: TextureInfo) -> Self {
        let mut gte = Gte::new();
        gte.setup(SCREEN_WIDTH, SCREEN_HEIGHT, ORDERING_TABLE_SIZE);
        Self {
            camera: Camera::default(),
            controls: ControlState::default(),
            config: ControlConfig::default(),
            gte,
            mesh,
            texture,
            font,
        }
    }

    pub fn gte(&self) -> &Gte {
        &self.gte
    }

    /// Build and present one frame, then apply `pad` to the camera for the
    /// next one.
    pub fn step<H, const WORDS: usize>(
        &mut self,
        scheduler: &mut FrameScheduler<WORDS>,
        gpu: &mut GpuDriver<H>,
        pad: Option<&PadReport>,
    ) -> Result<FrameStats, GpuError>
    where
        H: GpuPort + DmaPort + VblankSource,
    {
        let mut frame = scheduler.begin_frame(gpu);
        let slot = frame.slot();

        transform::apply_camera(&mut self.gte, &self.camera);

        let shading = if self.controls.textured {
            Shading::Textured(&self.texture)
        } else {
            Shading::Flat
        };
        let stats = pass::render_mesh(&mut self.gte, frame.chain(), &self.mesh, shading);

        let glyphs = if self.controls.show_help {
            let text = overlay::telemetry_text(&self.camera, stats.drawn, WORDS / 8);
            overlay::print_string(frame.chain(), &self.font, 0, 0, &text)
        } else {
            0
        };

        self.controls.apply(&mut self.camera, pad, &self.config);

        frame.present(gpu)?;
        Ok(FrameStats {
            slot,
            pass: stats,
            glyphs,
            words: scheduler.chain(slot).buffer().cursor(),
        })
    }
}
