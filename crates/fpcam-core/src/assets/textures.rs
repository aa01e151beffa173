//! 4 bpp images and palettes, packed the way VRAM expects them: eight texels
//! per word, leftmost texel in the lowest nibble, palettes as pairs of 15-bit
//! colours.

use crate::config::{FONT_HEIGHT, FONT_WIDTH};
use crate::render::overlay::{GLYPHS_PER_ROW, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Side of the square reference texture in texels.
pub const TEXTURE_SIZE: i32 = 64;
/// Side of one checkerboard square in texels.
const CHECKER_CELL: usize = 8;

const TEXELS_PER_WORD: usize = 8;

pub const TEXTURE_WORDS: usize = (TEXTURE_SIZE * TEXTURE_SIZE) as usize / TEXELS_PER_WORD;
pub const FONT_WORDS: usize = (FONT_WIDTH * FONT_HEIGHT) as usize / TEXELS_PER_WORD;
/// 16 colours, two per word.
pub const PALETTE_WORDS: usize = 8;

/// 15-bit VRAM colour from 8-bit channels.
pub const fn rgb15(r: u8, g: u8, b: u8) -> u16 {
    (r as u16 >> 3) | ((g as u16 >> 3) << 5) | ((b as u16 >> 3) << 10)
}

const fn pack_palette(colors: [u16; 16]) -> [u32; PALETTE_WORDS] {
    let mut out = [0; PALETTE_WORDS];
    let mut i = 0;
    while i < PALETTE_WORDS {
        out[i] = colors[2 * i] as u32 | ((colors[2 * i + 1] as u32) << 16);
        i += 1;
    }
    out
}

const fn set_texel<const N: usize>(words: &mut [u32; N], width: usize, x: usize, y: usize, index: u32) {
    let texel = y * width + x;
    words[texel / TEXELS_PER_WORD] |= (index & 0xF) << ((texel % TEXELS_PER_WORD) * 4);
}

const fn build_checker() -> [u32; TEXTURE_WORDS] {
    let size = TEXTURE_SIZE as usize;
    let mut out = [0; TEXTURE_WORDS];
    let mut y = 0;
    while y < size {
        let mut x = 0;
        while x < size {
            let index = if x == 0 || y == 0 {
                3
            } else if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 {
                1
            } else {
                2
            };
            set_texel(&mut out, size, x, y, index);
            x += 1;
        }
        y += 1;
    }
    out
}

/// Columns of the printable ASCII glyphs (space to `~`), five per glyph,
/// bit 0 at the top row.
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x5F, 0x00, 0x00],
    [0x00, 0x07, 0x00, 0x07, 0x00],
    [0x14, 0x7F, 0x14, 0x7F, 0x14],
    [0x24, 0x2A, 0x7F, 0x2A, 0x12],
    [0x23, 0x13, 0x08, 0x64, 0x62],
    [0x36, 0x49, 0x55, 0x22, 0x50],
    [0x00, 0x05, 0x03, 0x00, 0x00],
    [0x00, 0x1C, 0x22, 0x41, 0x00],
    [0x00, 0x41, 0x22, 0x1C, 0x00],
    [0x08, 0x2A, 0x1C, 0x2A, 0x08],
    [0x08, 0x08, 0x3E, 0x08, 0x08],
    [0x00, 0x50, 0x30, 0x00, 0x00],
    [0x08, 0x08, 0x08, 0x08, 0x08],
    [0x00, 0x60, 0x60, 0x00, 0x00],
    [0x20, 0x10, 0x08, 0x04, 0x02],
    [0x3E, 0x51, 0x49, 0x45, 0x3E],
    [0x00, 0x42, 0x7F, 0x40, 0x00],
    [0x42, 0x61, 0x51, 0x49, 0x46],
    [0x21, 0x41, 0x45, 0x4B, 0x31],
    [0x18, 0x14, 0x12, 0x7F, 0x10],
    [0x27, 0x45, 0x45, 0x45, 0x39],
    [0x3C, 0x4A, 0x49, 0x49, 0x30],
    [0x01, 0x71, 0x09, 0x05, 0x03],
    [0x36, 0x49, 0x49, 0x49, 0x36],
    [0x06, 0x49, 0x49, 0x29, 0x1E],
    [0x00, 0x36, 0x36, 0x00, 0x00],
    [0x00, 0x56, 0x36, 0x00, 0x00],
    [0x00, 0x08, 0x14, 0x22, 0x41],
    [0x14, 0x14, 0x14, 0x14, 0x14],
    [0x41, 0x22, 0x14, 0x08, 0x00],
    [0x02, 0x01, 0x51, 0x09, 0x06],
    [0x32, 0x49, 0x79, 0x41, 0x3E],
    [0x7E, 0x11, 0x11, 0x11, 0x7E],
    [0x7F, 0x49, 0x49, 0x49, 0x36],
    [0x3E, 0x41, 0x41, 0x41, 0x22],
    [0x7F, 0x41, 0x41, 0x22, 0x1C],
    [0x7F, 0x49, 0x49, 0x49, 0x41],
    [0x7F, 0x09, 0x09, 0x01, 0x01],
    [0x3E, 0x41, 0x41, 0x51, 0x32],
    [0x7F, 0x08, 0x08, 0x08, 0x7F],
    [0x00, 0x41, 0x7F, 0x41, 0x00],
    [0x20, 0x40, 0x41, 0x3F, 0x01],
    [0x7F, 0x08, 0x14, 0x22, 0x41],
    [0x7F, 0x40, 0x40, 0x40, 0x40],
    [0x7F, 0x02, 0x04, 0x02, 0x7F],
    [0x7F, 0x04, 0x08, 0x10, 0x7F],
    [0x3E, 0x41, 0x41, 0x41, 0x3E],
    [0x7F, 0x09, 0x09, 0x09, 0x06],
    [0x3E, 0x41, 0x51, 0x21, 0x5E],
    [0x7F, 0x09, 0x19, 0x29, 0x46],
    [0x46, 0x49, 0x49, 0x49, 0x31],
    [0x01, 0x01, 0x7F, 0x01, 0x01],
    [0x3F, 0x40, 0x40, 0x40, 0x3F],
    [0x1F, 0x20, 0x40, 0x20, 0x1F],
    [0x7F, 0x20, 0x18, 0x20, 0x7F],
    [0x63, 0x14, 0x08, 0x14, 0x63],
    [0x03, 0x04, 0x78, 0x04, 0x03],
    [0x61, 0x51, 0x49, 0x45, 0x43],
    [0x00, 0x00, 0x7F, 0x41, 0x41],
    [0x02, 0x04, 0x08, 0x10, 0x20],
    [0x41, 0x41, 0x7F, 0x00, 0x00],
    [0x04, 0x02, 0x01, 0x02, 0x04],
    [0x40, 0x40, 0x40, 0x40, 0x40],
    [0x00, 0x01, 0x02, 0x04, 0x00],
    [0x20, 0x54, 0x54, 0x54, 0x78],
    [0x7F, 0x48, 0x44, 0x44, 0x38],
    [0x38, 0x44, 0x44, 0x44, 0x20],
    [0x38, 0x44, 0x44, 0x48, 0x7F],
    [0x38, 0x54, 0x54, 0x54, 0x18],
    [0x08, 0x7E, 0x09, 0x01, 0x02],
    [0x08, 0x14, 0x54, 0x54, 0x3C],
    [0x7F, 0x08, 0x04, 0x04, 0x78],
    [0x00, 0x44, 0x7D, 0x40, 0x00],
    [0x20, 0x40, 0x44, 0x3D, 0x00],
    [0x00, 0x7F, 0x10, 0x28, 0x44],
    [0x00, 0x41, 0x7F, 0x40, 0x00],
    [0x7C, 0x04, 0x18, 0x04, 0x78],
    [0x7C, 0x08, 0x04, 0x04, 0x78],
    [0x38, 0x44, 0x44, 0x44, 0x38],
    [0x7C, 0x14, 0x14, 0x14, 0x08],
    [0x08, 0x14, 0x14, 0x18, 0x7C],
    [0x7C, 0x08, 0x04, 0x04, 0x08],
    [0x48, 0x54, 0x54, 0x54, 0x20],
    [0x04, 0x3F, 0x44, 0x40, 0x20],
    [0x3C, 0x40, 0x40, 0x20, 0x7C],
    [0x1C, 0x20, 0x40, 0x20, 0x1C],
    [0x3C, 0x40, 0x30, 0x40, 0x3C],
    [0x44, 0x28, 0x10, 0x28, 0x44],
    [0x0C, 0x50, 0x50, 0x50, 0x3C],
    [0x44, 0x64, 0x54, 0x4C, 0x44],
    [0x00, 0x08, 0x36, 0x41, 0x00],
    [0x00, 0x00, 0x7F, 0x00, 0x00],
    [0x00, 0x41, 0x36, 0x08, 0x00],
    [0x02, 0x01, 0x02, 0x04, 0x02],
];

const fn build_font() -> [u32; FONT_WORDS] {
    let width = FONT_WIDTH as usize;
    let cell_w = GLYPH_WIDTH as usize;
    let cell_h = GLYPH_HEIGHT as usize;
    let mut out = [0; FONT_WORDS];
    let mut y = 0;
    while y < FONT_HEIGHT as usize {
        let mut x = 0;
        while x < width {
            let glyph = (y / cell_h) * GLYPHS_PER_ROW as usize + x / cell_w;
            let (col, row) = (x % cell_w, y % cell_h);
            if glyph < GLYPHS.len() && col < 5 && (GLYPHS[glyph][col] >> row) & 1 != 0 {
                set_texel(&mut out, width, x, y, 1);
            }
            x += 1;
        }
        y += 1;
    }
    out
}

/// 64x64 checkerboard with a one-texel border in index 3.
pub static CHECKER_TEXTURE: [u32; TEXTURE_WORDS] = build_checker();

pub static CHECKER_PALETTE: [u32; PALETTE_WORDS] = pack_palette([
    0,
    rgb15(200, 200, 200),
    rgb15(90, 90, 110),
    rgb15(180, 60, 40),
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
]);

/// 96x56 font sheet: glyph pixels are index 1, everything else index 0.
pub static FONT_TEXTURE: [u32; FONT_WORDS] = build_font();

/// Index 0 is the transparent colour.
pub static FONT_PALETTE: [u32; PALETTE_WORDS] = pack_palette([
    0,
    rgb15(255, 255, 255),
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
    0,
]);
