//! Per-frame packet generation: the mesh render pass and the text overlay.

pub mod mesh;
pub mod overlay;
pub mod pass;

pub use mesh::{Face, Mesh, Uv};
pub use pass::{render_mesh, PassStats, Shading, Visibility};
