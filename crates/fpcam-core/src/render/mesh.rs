//! Static triangle mesh tables.

use glam::I16Vec3;

/// Texel offset relative to the bound texture's origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Uv {
    pub u: u8,
    pub v: u8,
}

impl Uv {
    pub const fn new(u: u8, v: u8) -> Self {
        Self { u, v }
    }
}

/// One triangle: three vertex indices and a texel per corner.
///
/// The corner order decides which side is visible: after projection the
/// corners of a visible face have positive signed area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub vertices: [u16; 3],
    pub uvs: [Uv; 3],
}

impl Face {
    pub const fn new(vertices: [u16; 3], uvs: [Uv; 3]) -> Self {
        Self { vertices, uvs }
    }
}

/// A reference to immutable mesh data.
#[derive(Clone, Copy, Debug)]
pub struct Mesh<'a> {
    pub vertices: &'a [I16Vec3],
    pub faces: &'a [Face],
}

impl<'a> Mesh<'a> {
    pub const fn new(vertices: &'a [I16Vec3], faces: &'a [Face]) -> Self {
        Self { vertices, faces }
    }

    /// The three corner positions of `face`, or `None` if an index is out of range.
    pub fn corners(&self, face: &Face) -> Option<[I16Vec3; 3]> {
        let [a, b, c] = face.vertices;
        Some([
            *self.vertices.get(usize::from(a))?,
            *self.vertices.get(usize::from(b))?,
            *self.vertices.get(usize::from(c))?,
        ])
    }
}
