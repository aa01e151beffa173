//! Texture descriptors for VRAM-resident images.

use super::commands::{self, BlendMode, ColorDepth};

/// Largest texture the GPU can address in one page, in pixels per side.
pub const MAX_TEXTURE_SIZE: i32 = 256;

/// Where a texture lives in VRAM, expressed the way GP0 commands need it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureInfo {
    /// UV origin within the texture page.
    pub u: u8,
    pub v: u8,
    pub w: u16,
    pub h: u16,
    /// Texture page attribute.
    pub page: u16,
    /// CLUT attribute (indexed textures only).
    pub clut: u16,
}

impl TextureInfo {
    /// Descriptor for an image placed at VRAM (`x`, `y`).
    ///
    /// `x` is in VRAM halfword columns; `width_divider` is how many texels
    /// share one halfword (4 for 4 bpp, 2 for 8 bpp, 1 for 16 bpp).
    pub fn placed(x: i32, y: i32, w: i32, h: i32, depth: ColorDepth, clut: u16) -> Self {
        let width_divider = match depth {
            ColorDepth::Bpp4 => 4,
            ColorDepth::Bpp8 => 2,
            ColorDepth::Bpp16 => 1,
        };
        Self {
            u: ((x % 64) * width_divider) as u8,
            v: (y % 256) as u8,
            w: w as u16,
            h: h as u16,
            page: commands::page(x / 64, y / 256, BlendMode::SemiTransparent, depth),
            clut,
        }
    }

    /// UV word for texel (`u`, `v`) relative to the texture origin.
    pub fn uv(&self, u: u8, v: u8, attr: u16) -> u32 {
        commands::uv(
            u32::from(self.u) + u32::from(u),
            u32::from(self.v) + u32::from(v),
            attr,
        )
    }
}
