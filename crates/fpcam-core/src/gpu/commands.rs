//! GP0 / GP1 command word encoders and GPU status bits.

/// GPUSTAT: ready to receive a GP0 command word.
pub const STAT_CMD_READY: u32 = 1 << 26;
/// GPUSTAT: video mode bit (set = PAL).
pub const STAT_MODE_PAL: u32 = 1 << 20;

/// Video standard of the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoMode {
    Ntsc,
    Pal,
}

/// Texture colour depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorDepth {
    Bpp4 = 0,
    Bpp8 = 1,
    Bpp16 = 2,
}

/// Semi-transparency blend equation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    SemiTransparent = 0,
    Add = 1,
    Subtract = 2,
    AddQuarter = 3,
}

/// GP1 DMA request direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DmaRequestMode {
    None = 0,
    Fifo = 1,
    Gp0Write = 2,
    GpuRead = 3,
}

/// Horizontal resolution field of the display mode (320 px).
pub const HRES_320: u32 = 1;
/// Dot clock multiplier for 320 px horizontal resolution.
pub const CLOCK_MULTIPLIER_320: i32 = 8;
/// Scanline divider for non-interlaced modes.
pub const CLOCK_DIVIDER_NONINTERLACED: i32 = 1;

/// Flat-shaded triangle palette used in colour mode, indexed by face number.
pub const FACE_COLORS: [u32; 6] = [0x0000FF, 0x00FF00, 0xFF0000, 0x00FFFF, 0xFF00FF, 0xFFFF00];

/// Neutral texture modulation colour (128 = 1.0 per channel).
pub const TEXTURE_NEUTRAL: u32 = 0x80_8080;

const fn cmd(op: u32) -> u32 {
    op << 24
}

/// 24-bit colour word.
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16)
}

/// Packed vertex / position word.
pub const fn xy(x: i32, y: i32) -> u32 {
    (x as u32 & 0xFFFF) | ((y as u32 & 0xFFFF) << 16)
}

/// Packed texture coordinate with the attribute (CLUT or page) in the high half.
pub const fn uv(u: u32, v: u32, attr: u16) -> u32 {
    (u & 0xFF) | ((v & 0xFF) << 8) | ((attr as u32) << 16)
}

/// Linked-list packet tag.
pub const fn tag(len: u32, next: u32) -> u32 {
    (len << 24) | (next & 0x00FF_FFFF)
}

/// Triangle opcode. Gouraud triangles carry a colour per vertex.
pub const fn shaded_triangle(gouraud: bool, textured: bool, blend: bool) -> u32 {
    cmd(0x20) | ((gouraud as u32) << 28) | ((textured as u32) << 26) | ((blend as u32) << 25)
}

/// Variable-size rectangle opcode.
pub const fn rectangle(textured: bool, raw: bool, blend: bool) -> u32 {
    cmd(0x60) | ((textured as u32) << 26) | ((blend as u32) << 25) | ((raw as u32) << 24)
}

/// Fill a VRAM rectangle with a solid colour (followed by xy and wh words).
pub const fn vram_fill() -> u32 {
    cmd(0x02)
}

/// Start a CPU-to-VRAM transfer (followed by xy and wh words).
pub const fn vram_write() -> u32 {
    cmd(0xA0)
}

/// Texture page attribute as used in the high half of a UV word.
pub const fn page(x: i32, y: i32, blend: BlendMode, depth: ColorDepth) -> u16 {
    ((x as u16) & 15) | (((y as u16) & 1) << 4) | ((blend as u16) << 5) | ((depth as u16) << 7)
}

/// CLUT attribute as used in the high half of a UV word.
pub const fn clut(x: i32, y: i32) -> u16 {
    ((x as u16) & 0x3F) | (((y as u16) & 0x1FF) << 6)
}

/// Draw mode setting (texture page, dithering, drawing to the displayed area).
pub const fn texpage(page: u16, dither: bool, unlock_fb: bool) -> u32 {
    cmd(0xE1) | (page as u32 & 0x9FF) | ((dither as u32) << 9) | ((unlock_fb as u32) << 10)
}

/// Drawing area top-left corner.
pub const fn fb_offset1(x: i32, y: i32) -> u32 {
    cmd(0xE3) | (x as u32 & 0x3FF) | ((y as u32 & 0x3FF) << 10)
}

/// Drawing area bottom-right corner.
pub const fn fb_offset2(x: i32, y: i32) -> u32 {
    cmd(0xE4) | (x as u32 & 0x3FF) | ((y as u32 & 0x3FF) << 10)
}

/// Drawing offset added to every vertex.
pub const fn fb_origin(x: i32, y: i32) -> u32 {
    cmd(0xE5) | (x as u32 & 0x7FF) | ((y as u32 & 0x7FF) << 11)
}

/// GP1: reset the GPU.
pub const fn gp1_reset_gpu() -> u32 {
    cmd(0x00)
}

/// GP1: enable or blank the display output.
pub const fn gp1_disp_blank(blank: bool) -> u32 {
    cmd(0x03) | blank as u32
}

/// GP1: DMA request direction.
pub const fn gp1_dma_request_mode(mode: DmaRequestMode) -> u32 {
    cmd(0x04) | mode as u32
}

/// GP1: top-left corner of the displayed VRAM area.
pub const fn gp1_fb_offset(x: i32, y: i32) -> u32 {
    cmd(0x05) | (x as u32 & 0x3FF) | ((y as u32 & 0x1FF) << 10)
}

/// GP1: horizontal display range in dot clocks.
pub const fn gp1_fb_range_h(x1: i32, x2: i32) -> u32 {
    cmd(0x06) | (x1 as u32 & 0xFFF) | ((x2 as u32 & 0xFFF) << 12)
}

/// GP1: vertical display range in scanlines.
pub const fn gp1_fb_range_v(y1: i32, y2: i32) -> u32 {
    cmd(0x07) | (y1 as u32 & 0x3FF) | ((y2 as u32 & 0x3FF) << 10)
}

/// GP1: display mode (320 px wide, 15 bpp, non-interlaced).
pub const fn gp1_fb_mode(mode: VideoMode) -> u32 {
    let pal = match mode {
        VideoMode::Ntsc => 0,
        VideoMode::Pal => 1,
    };
    cmd(0x08) | HRES_320 | (pal << 3)
}
