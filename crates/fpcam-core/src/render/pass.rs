//! Mesh render pass: project, cull, bucket by depth and emit GP0 triangles.
//!
//! Faces are processed in mesh order. Each surviving face becomes one packet
//! in the ordering-table bucket of its average depth. Buckets are LIFO, so
//! among faces sharing a bucket the later one in the mesh is drawn first.

use crate::gpu::chain::DmaChain;
use crate::gpu::commands::{self, FACE_COLORS, TEXTURE_NEUTRAL};
use crate::gpu::texture::TextureInfo;
use crate::gte::Gte;
use crate::render::mesh::{Face, Mesh};

/// Command words in a flat triangle packet.
pub const FLAT_TRIANGLE_WORDS: usize = 4;
/// Command words in a textured triangle packet.
pub const TEXTURED_TRIANGLE_WORDS: usize = 7;

/// How visible faces are filled.
#[derive(Clone, Copy, Debug)]
pub enum Shading<'a> {
    /// Solid colour per face from [`FACE_COLORS`].
    Flat,
    /// Affine-textured with the given resident texture.
    Textured(&'a TextureInfo),
}

/// Outcome of the per-face visibility tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Draw into this bucket.
    Visible(usize),
    /// Zero or negative projected area.
    BackFacing,
    /// Average depth at or past the last bucket.
    BeyondFar,
    /// Entirely behind the camera plane.
    BehindCamera,
}

/// Decide what to do with a projected face.
///
/// `area` is the NCLIP result, `otz` the scaled average depth and
/// `raw_depths` the signed per-vertex camera-space depths. A face whose
/// average lands at bucket 0 or below is kept in bucket 0 while it crosses
/// the camera plane, so it does not pop. It is discarded when no vertex is in
/// front of the camera or when its raw depths sum to exactly zero.
pub fn classify(area: i32, otz: u16, raw_depths: [i32; 3], ot_size: usize) -> Visibility {
    if area <= 0 {
        return Visibility::BackFacing;
    }
    let z = usize::from(otz);
    if z >= ot_size {
        return Visibility::BeyondFar;
    }
    if z == 0 {
        let sum: i64 = raw_depths.iter().map(|&d| i64::from(d)).sum();
        if sum == 0 || raw_depths.iter().all(|&d| d <= 0) {
            return Visibility::BehindCamera;
        }
    }
    Visibility::Visible(z)
}

/// Per-pass face counts, for the overlay and logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    pub drawn: u32,
    pub back_facing: u32,
    pub beyond_far: u32,
    pub behind_camera: u32,
}

/// Render every face of `mesh` into `chain` using the transform currently
/// loaded in `gte`. Returns how many faces were drawn or culled.
///
/// Panics if the chain runs out of space or a face indexes past the mesh's
/// vertex table.
pub fn render_mesh<const WORDS: usize>(
    gte: &mut Gte,
    chain: &mut DmaChain<WORDS>,
    mesh: &Mesh<'_>,
    shading: Shading<'_>,
) -> PassStats {
    let mut stats = PassStats::default();
    let ot_size = chain.table().len();

    for (index, face) in mesh.faces.iter().enumerate() {
        let Some([v0, v1, v2]) = mesh.corners(face) else {
            panic!("fatal: face {index} references a vertex outside the mesh");
        };
        gte.load_vertices(v0, v1, v2);
        gte.rtpt();
        let area = gte.nclip();
        // AVSZ3 only matters for faces that survive the area test.
        let otz = if area > 0 { gte.avsz3() } else { 0 };

        match classify(area, otz, gte.raw_depths(), ot_size) {
            Visibility::Visible(z) => {
                match shading {
                    Shading::Flat => emit_flat(chain, z, index, gte),
                    Shading::Textured(texture) => emit_textured(chain, z, face, texture, gte),
                }
                stats.drawn += 1;
            }
            Visibility::BackFacing => stats.back_facing += 1,
            Visibility::BeyondFar => stats.beyond_far += 1,
            Visibility::BehindCamera => stats.behind_camera += 1,
        }
    }

    log::trace!(
        "render pass: {} drawn, {} back-facing, {} beyond far plane, {} behind camera",
        stats.drawn,
        stats.back_facing,
        stats.beyond_far,
        stats.behind_camera
    );
    stats
}

fn emit_flat<const WORDS: usize>(chain: &mut DmaChain<WORDS>, z: usize, index: usize, gte: &Gte) {
    let color = FACE_COLORS[index % FACE_COLORS.len()];
    let packet = chain.allocate(z, FLAT_TRIANGLE_WORDS);
    packet[0] = color | commands::shaded_triangle(false, false, false);
    packet[1] = gte.sxy(0);
    packet[2] = gte.sxy(1);
    packet[3] = gte.sxy(2);
}

fn emit_textured<const WORDS: usize>(
    chain: &mut DmaChain<WORDS>,
    z: usize,
    face: &Face,
    texture: &TextureInfo,
    gte: &Gte,
) {
    // The first UV word carries the CLUT, the second the texture page.
    let [t0, t1, t2] = face.uvs;
    let uv0 = texture.uv(t0.u, t0.v, texture.clut);
    let uv1 = texture.uv(t1.u, t1.v, texture.page);
    let uv2 = texture.uv(t2.u, t2.v, 0);

    let packet = chain.allocate(z, TEXTURED_TRIANGLE_WORDS);
    packet[0] = TEXTURE_NEUTRAL | commands::shaded_triangle(false, true, false);
    packet[1] = gte.sxy(0);
    packet[2] = uv0;
    packet[3] = gte.sxy(1);
    packet[4] = uv1;
    packet[5] = gte.sxy(2);
    packet[6] = uv2;
}
