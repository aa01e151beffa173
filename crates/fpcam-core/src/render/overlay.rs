//! On-screen text: help and telemetry drawn with a fixed-width font sheet.
//!
//! Glyphs are textured rectangles in the nearest bucket, so text is drawn
//! over the scene. The font's texture page packet is allocated after the
//! glyphs, which puts it ahead of them in the drained bucket.

use core::fmt::Write;

use crate::gpu::chain::DmaChain;
use crate::gpu::commands::{self, TEXTURE_NEUTRAL};
use crate::gpu::texture::TextureInfo;
use crate::scene::camera::Camera;

/// Glyph cell size in the font sheet.
pub const GLYPH_WIDTH: i32 = 6;
pub const GLYPH_HEIGHT: i32 = 8;
/// Glyph cells per font sheet row.
pub const GLYPHS_PER_ROW: u8 = 16;
/// Character code of the first glyph cell.
pub const FIRST_GLYPH: u8 = b' ';
/// Number of glyph cells in the 96x56 sheet.
pub const GLYPH_COUNT: u8 = 16 * 7;

pub const LINE_HEIGHT: i32 = 10;
pub const TAB_WIDTH: i32 = 32;

/// Bucket text is drawn in (nearest the camera).
pub const OVERLAY_BUCKET: usize = 0;

/// Command words in one glyph packet.
pub const GLYPH_WORDS: usize = 4;

/// Fixed capacity of the composed overlay text.
pub const TEXT_CAPACITY: usize = 1024;

pub type OverlayText = heapless::String<TEXT_CAPACITY>;

pub const HELP_TEXT: &str = "\t\tControls\n\
======================\n\
L: \t \tMove\n\
R: \t \tLook\n\
L2/R2: \tDown/Up\n\
Triangle:\tToggle this menu\n\
Square:\tToggle Textures/Colours\n";

/// Compose the help text followed by camera position and polygon count.
///
/// Anything past [`TEXT_CAPACITY`] is dropped.
pub fn telemetry_text(camera: &Camera, drawn: u32, budget: usize) -> OverlayText {
    let mut text = OverlayText::new();
    let p = camera.position;
    // A full buffer just truncates the overlay.
    let _ = write!(
        text,
        "{HELP_TEXT}\nX:{}\nY:{}\nZ:{}\n\np: {drawn}/{budget}",
        p.x, p.y, p.z
    );
    text
}

/// Font sheet cell of `c`, if the sheet has one.
fn glyph_cell(c: u8) -> Option<(u8, u8)> {
    let index = c.checked_sub(FIRST_GLYPH)?;
    if index >= GLYPH_COUNT {
        return None;
    }
    Some((
        (index % GLYPHS_PER_ROW) * GLYPH_WIDTH as u8,
        (index / GLYPHS_PER_ROW) * GLYPH_HEIGHT as u8,
    ))
}

/// Draw `text` with its top-left corner at (`x`, `y`). Returns the number of
/// glyph packets emitted.
///
/// `\n` starts a new line, `\t` advances to the next tab stop and characters
/// without a glyph cell are skipped.
pub fn print_string<const WORDS: usize>(
    chain: &mut DmaChain<WORDS>,
    font: &TextureInfo,
    x: i32,
    y: i32,
    text: &str,
) -> usize {
    let (mut cx, mut cy) = (x, y);
    let mut glyphs = 0;

    for c in text.bytes() {
        match c {
            b'\n' => {
                cx = x;
                cy += LINE_HEIGHT;
            }
            b'\t' => cx = x + ((cx - x) / TAB_WIDTH + 1) * TAB_WIDTH,
            b' ' => cx += GLYPH_WIDTH,
            _ => {
                let Some((u, v)) = glyph_cell(c) else {
                    continue;
                };
                let packet = chain.allocate(OVERLAY_BUCKET, GLYPH_WORDS);
                packet[0] = TEXTURE_NEUTRAL | commands::rectangle(true, true, false);
                packet[1] = commands::xy(cx, cy);
                packet[2] = font.uv(u, v, font.clut);
                packet[3] = commands::xy(GLYPH_WIDTH, GLYPH_HEIGHT);
                cx += GLYPH_WIDTH;
                glyphs += 1;
            }
        }
    }

    if glyphs > 0 {
        let packet = chain.allocate(OVERLAY_BUCKET, 1);
        packet[0] = commands::texpage(font.page, false, false);
    }
    glyphs
}
