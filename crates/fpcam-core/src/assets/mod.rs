//! Compile-time demo assets and their VRAM upload.

pub mod room;
pub mod textures;

use fpcam_hal::{DmaPort, GpuPort};

use crate::config::{FONT_CLUT_VRAM, FONT_HEIGHT, FONT_VRAM, FONT_WIDTH, TEXTURE_CLUT_VRAM, TEXTURE_VRAM};
use crate::gpu::commands::ColorDepth;
use crate::gpu::driver::{GpuDriver, GpuError};
use crate::gpu::texture::TextureInfo;

/// Descriptors of the uploaded textures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResidentTextures {
    pub walls: TextureInfo,
    pub font: TextureInfo,
}

/// Upload the wall texture and font sheet with their palettes.
pub fn upload<H: GpuPort + DmaPort>(gpu: &mut GpuDriver<H>) -> Result<ResidentTextures, GpuError> {
    let walls = gpu.upload_indexed_texture(
        &textures::CHECKER_TEXTURE,
        TEXTURE_VRAM.0,
        TEXTURE_VRAM.1,
        textures::TEXTURE_SIZE,
        textures::TEXTURE_SIZE,
        &textures::CHECKER_PALETTE,
        TEXTURE_CLUT_VRAM.0,
        TEXTURE_CLUT_VRAM.1,
        ColorDepth::Bpp4,
    )?;
    let font = gpu.upload_indexed_texture(
        &textures::FONT_TEXTURE,
        FONT_VRAM.0,
        FONT_VRAM.1,
        FONT_WIDTH,
        FONT_HEIGHT,
        &textures::FONT_PALETTE,
        FONT_CLUT_VRAM.0,
        FONT_CLUT_VRAM.1,
        ColorDepth::Bpp4,
    )?;
    Ok(ResidentTextures { walls, font })
}
