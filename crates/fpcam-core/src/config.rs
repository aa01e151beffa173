//! Compile-time configuration shared by the renderer and its hosts.

use glam::IVec3;

/// Visible framebuffer width in pixels.
pub const SCREEN_WIDTH: i32 = 320;
/// Visible framebuffer height in pixels.
pub const SCREEN_HEIGHT: i32 = 256;

/// Number of depth buckets in each ordering table.
pub const ORDERING_TABLE_SIZE: usize = 720;
/// Capacity of each command chain's packet arena, in 32-bit words.
pub const CHAIN_BUFFER_SIZE: usize = 32768;
/// Largest chunk a block DMA transfer to VRAM may use, in words.
pub const DMA_MAX_CHUNK_SIZE: usize = 16;

/// Byte address of the first command chain in main RAM.
pub const CHAIN_BASE_ADDR: u32 = 0x0010_0000;

/// Background fill colour (R, G, B).
pub const BACKGROUND_COLOR: [u8; 3] = [64, 64, 64];

/// Font sheet size in pixels.
pub const FONT_WIDTH: i32 = 96;
pub const FONT_HEIGHT: i32 = 56;

/// VRAM placement of the font sheet and its palette.
pub const FONT_VRAM: (i32, i32) = (SCREEN_WIDTH + 16, 0);
pub const FONT_CLUT_VRAM: (i32, i32) = (SCREEN_WIDTH + 16, FONT_HEIGHT);

/// VRAM placement of the wall texture and its palette.
pub const TEXTURE_VRAM: (i32, i32) = (SCREEN_WIDTH, 0);
pub const TEXTURE_CLUT_VRAM: (i32, i32) = (SCREEN_WIDTH, 64);

/// Camera position at power-on.
pub const CAMERA_START: IVec3 = IVec3::new(0, -1000, 0);
