//! Platform-agnostic GPU driver, generic over the hardware ports.
//!
//! Owns the port implementation and provides the blocking primitives the
//! frame loop is built from: waits on GPU/DMA status, linked-list submission,
//! display offset updates and VRAM uploads.

use core::fmt;

use fpcam_hal::{DmaPort, GpuPort, VblankSource};

use super::chain::DmaChain;
use super::commands::{self, ColorDepth, DmaRequestMode, VideoMode};
use super::texture::{TextureInfo, MAX_TEXTURE_SIZE};
use crate::config::DMA_MAX_CHUNK_SIZE;

/// Horizontal centre of the display range in dot clocks.
const DISPLAY_CENTER_X: i32 = 0x760;
/// Vertical centre of the display range in scanlines.
const DISPLAY_CENTER_Y_PAL: i32 = 0xA3;
const DISPLAY_CENTER_Y_NTSC: i32 = 0x88;

/// VRAM width in halfword columns.
const VRAM_WIDTH: i32 = 1024;

/// Driver misuse. Each variant is a static configuration mismatch; the
/// frame loop treats all of them as fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GpuError {
    /// DMA can only start from a word-aligned address.
    MisalignedTransfer { addr: u32 },
    /// Textures are limited to one 256x256 page.
    TextureTooLarge { w: i32, h: i32 },
    /// Block transfers above one chunk must be a whole number of chunks.
    UnevenTransfer { words: usize },
    /// Fewer data words supplied than the rectangle needs.
    ShortTransfer { needed: usize, supplied: usize },
    /// Palettes must start on a 16-column boundary and fit in VRAM.
    PalettePlacement { x: i32, colors: i32 },
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::MisalignedTransfer { addr } => {
                write!(f, "DMA start address {addr:#08x} is not word aligned")
            }
            GpuError::TextureTooLarge { w, h } => {
                write!(f, "texture {w}x{h} exceeds {MAX_TEXTURE_SIZE}x{MAX_TEXTURE_SIZE}")
            }
            GpuError::UnevenTransfer { words } => write!(
                f,
                "VRAM transfer of {words} words is not a multiple of {DMA_MAX_CHUNK_SIZE}"
            ),
            GpuError::ShortTransfer { needed, supplied } => {
                write!(f, "VRAM transfer needs {needed} words, got {supplied}")
            }
            GpuError::PalettePlacement { x, colors } => {
                write!(f, "palette of {colors} colours cannot start at VRAM column {x}")
            }
        }
    }
}

/// GPU driver. Owns the hardware ports.
pub struct GpuDriver<H> {
    hw: H,
    mode: VideoMode,
}

impl<H: GpuPort + DmaPort> GpuDriver<H> {
    /// Bring up the display for a `width` x `height` framebuffer in whatever
    /// video standard the GPU was left in, enable the DMA channels the
    /// renderer uses and unblank the output.
    pub fn new(mut hw: H, width: i32, height: i32) -> Self {
        let mode = if hw.read_status() & commands::STAT_MODE_PAL != 0 {
            VideoMode::Pal
        } else {
            VideoMode::Ntsc
        };
        let center_y = match mode {
            VideoMode::Pal => DISPLAY_CENTER_Y_PAL,
            VideoMode::Ntsc => DISPLAY_CENTER_Y_NTSC,
        };
        let offset_x = (width * commands::CLOCK_MULTIPLIER_320) / 2;
        let offset_y = (height / commands::CLOCK_DIVIDER_NONINTERLACED) / 2;

        hw.write_gp1(commands::gp1_reset_gpu());
        hw.write_gp1(commands::gp1_fb_range_h(
            DISPLAY_CENTER_X - offset_x,
            DISPLAY_CENTER_X + offset_x,
        ));
        hw.write_gp1(commands::gp1_fb_range_v(center_y - offset_y, center_y + offset_y));
        hw.write_gp1(commands::gp1_fb_mode(mode));

        hw.enable_channels();
        hw.write_gp1(commands::gp1_dma_request_mode(DmaRequestMode::Gp0Write));
        hw.write_gp1(commands::gp1_disp_blank(false));

        log::info!("GPU configured: {mode:?}, {width}x{height}");
        Self { hw, mode }
    }

    /// Video standard detected at start-up.
    pub fn video_mode(&self) -> VideoMode {
        self.mode
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn into_inner(self) -> H {
        self.hw
    }

    pub fn write_gp0(&mut self, word: u32) {
        self.hw.write_gp0(word);
    }

    pub fn write_gp1(&mut self, word: u32) {
        self.hw.write_gp1(word);
    }

    /// Block until GP0 can accept a command word.
    pub fn wait_gp0_ready(&mut self) {
        while self.hw.read_status() & commands::STAT_CMD_READY == 0 {
            core::hint::spin_loop();
        }
    }

    /// Block until the GPU DMA channel has finished its transfer.
    pub fn wait_dma_done(&mut self) {
        while self.hw.is_gpu_busy() {
            core::hint::spin_loop();
        }
    }

    /// Reset `chain`'s ordering table with the OTC channel and rewind its arena.
    pub fn clear_ordering_table<const WORDS: usize>(&mut self, chain: &mut DmaChain<WORDS>) {
        chain.reset(&mut self.hw);
    }

    /// Start sending `chain` to GP0, beginning at its farthest bucket.
    ///
    /// Waits for any previous transfer first. The chain must stay untouched
    /// until the transfer completes.
    pub fn send_linked_list<const WORDS: usize>(
        &mut self,
        chain: &DmaChain<WORDS>,
    ) -> Result<(), GpuError> {
        self.wait_dma_done();

        let head = chain.head_address();
        if head % 4 != 0 {
            return Err(GpuError::MisalignedTransfer { addr: head });
        }
        self.hw.start_linked_list(head, chain);
        Ok(())
    }

    /// Point the display at the VRAM area starting at (`x`, `y`).
    pub fn set_display_offset(&mut self, x: i32, y: i32) {
        self.hw.write_gp1(commands::gp1_fb_offset(x, y));
    }

    /// Copy a `w` x `h` halfword rectangle of `data` to VRAM at (`x`, `y`).
    ///
    /// The transfer is started and left running; call
    /// [`wait_dma_done`](Self::wait_dma_done) before reusing the DMA channel.
    pub fn send_vram_data(
        &mut self,
        data: &[u32],
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<(), GpuError> {
        self.wait_dma_done();

        let length = (w * h) as usize / 2;
        if data.len() < length {
            return Err(GpuError::ShortTransfer {
                needed: length,
                supplied: data.len(),
            });
        }
        let (chunk_words, chunks) = if length < DMA_MAX_CHUNK_SIZE {
            (length, 1)
        } else {
            if length % DMA_MAX_CHUNK_SIZE != 0 {
                return Err(GpuError::UnevenTransfer { words: length });
            }
            (DMA_MAX_CHUNK_SIZE, length / DMA_MAX_CHUNK_SIZE)
        };

        self.wait_gp0_ready();
        self.hw.write_gp0(commands::vram_write());
        self.hw.write_gp0(commands::xy(x, y));
        self.hw.write_gp0(commands::xy(w, h));

        self.hw
            .start_block_write(&data[..length], chunk_words as u16, chunks as u16);
        Ok(())
    }

    /// Upload a 16 bpp image to VRAM at (`x`, `y`) and describe it.
    pub fn upload_texture(
        &mut self,
        data: &[u32],
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<TextureInfo, GpuError> {
        check_texture_size(w, h)?;

        self.send_vram_data(data, x, y, w, h)?;
        self.wait_dma_done();

        log::info!("uploaded {w}x{h} texture to VRAM ({x}, {y})");
        Ok(TextureInfo::placed(x, y, w, h, ColorDepth::Bpp16, 0))
    }

    /// Upload a 4 bpp or 8 bpp image and its palette and describe them.
    ///
    /// `w` is in texels; the image occupies `w / 4` (4 bpp) or `w / 2` (8 bpp)
    /// VRAM columns. The palette occupies one row at (`palette_x`,
    /// `palette_y`) and `palette_x` must be a multiple of 16.
    #[allow(clippy::too_many_arguments)]
    pub fn upload_indexed_texture(
        &mut self,
        image: &[u32],
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        palette: &[u32],
        palette_x: i32,
        palette_y: i32,
        depth: ColorDepth,
    ) -> Result<TextureInfo, GpuError> {
        check_texture_size(w, h)?;

        let (colors, width_divider) = match depth {
            ColorDepth::Bpp8 => (256, 2),
            _ => (16, 4),
        };
        if palette_x % 16 != 0 || palette_x + colors > VRAM_WIDTH {
            return Err(GpuError::PalettePlacement {
                x: palette_x,
                colors,
            });
        }

        self.send_vram_data(image, x, y, w / width_divider, h)?;
        self.wait_dma_done();
        self.send_vram_data(palette, palette_x, palette_y, colors, 1)?;
        self.wait_dma_done();

        log::info!(
            "uploaded {w}x{h} {depth:?} texture to VRAM ({x}, {y}), palette at ({palette_x}, {palette_y})"
        );
        Ok(TextureInfo::placed(
            x,
            y,
            w,
            h,
            depth,
            commands::clut(palette_x / 16, palette_y),
        ))
    }
}

/// Methods available when the ports also expose the vertical blank interrupt.
impl<H: GpuPort + DmaPort + VblankSource> GpuDriver<H> {
    /// Block until the next vertical blank and acknowledge it.
    pub fn wait_vsync(&mut self) {
        while !self.hw.take_vblank() {
            core::hint::spin_loop();
        }
    }
}

fn check_texture_size(w: i32, h: i32) -> Result<(), GpuError> {
    if w > MAX_TEXTURE_SIZE || h > MAX_TEXTURE_SIZE {
        return Err(GpuError::TextureTooLarge { w, h });
    }
    Ok(())
}
