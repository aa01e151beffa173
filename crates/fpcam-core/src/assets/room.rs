//! A closed box room viewed from the inside.
//!
//! Each of the six walls is a grid of quads, two triangles per quad, with the
//! whole reference texture mapped onto every quad. Y points down: the floor
//! is at `y = 0` and the ceiling at `y = -ROOM_HEIGHT`.

use glam::I16Vec3;

use crate::render::mesh::{Face, Mesh, Uv};

/// Half the room's width and depth.
pub const ROOM_HALF_EXTENT: i32 = 2000;
pub const ROOM_HEIGHT: i32 = 2000;
/// Quads along each edge of a wall.
pub const DIVISIONS: usize = 4;

const GRID: usize = DIVISIONS + 1;
const WALLS: usize = 6;

pub const VERTEX_COUNT: usize = WALLS * GRID * GRID;
pub const FACE_COUNT: usize = WALLS * DIVISIONS * DIVISIONS * 2;

/// Largest texel coordinate of the 64x64 reference texture.
const TEXEL_MAX: u8 = 63;

/// A wall as seen from inside: top-left corner plus the vectors to the
/// top-right and bottom-left corners.
struct Wall {
    origin: [i32; 3],
    right: [i32; 3],
    down: [i32; 3],
}

const S: i32 = ROOM_HALF_EXTENT;
const H: i32 = ROOM_HEIGHT;

const WALL_LAYOUT: [Wall; WALLS] = [
    // +Z
    Wall {
        origin: [-S, -H, S],
        right: [2 * S, 0, 0],
        down: [0, H, 0],
    },
    // -Z
    Wall {
        origin: [S, -H, -S],
        right: [-2 * S, 0, 0],
        down: [0, H, 0],
    },
    // +X
    Wall {
        origin: [S, -H, S],
        right: [0, 0, -2 * S],
        down: [0, H, 0],
    },
    // -X
    Wall {
        origin: [-S, -H, -S],
        right: [0, 0, 2 * S],
        down: [0, H, 0],
    },
    // Floor
    Wall {
        origin: [-S, 0, S],
        right: [2 * S, 0, 0],
        down: [0, 0, -2 * S],
    },
    // Ceiling
    Wall {
        origin: [-S, -H, -S],
        right: [2 * S, 0, 0],
        down: [0, 0, 2 * S],
    },
];

const fn build_vertices() -> [I16Vec3; VERTEX_COUNT] {
    let mut out = [I16Vec3::ZERO; VERTEX_COUNT];
    let mut w = 0;
    while w < WALLS {
        let wall = &WALL_LAYOUT[w];
        let mut row = 0;
        while row < GRID {
            let mut col = 0;
            while col < GRID {
                let mut p = [0i32; 3];
                let mut axis = 0;
                while axis < 3 {
                    p[axis] = wall.origin[axis]
                        + wall.right[axis] * col as i32 / DIVISIONS as i32
                        + wall.down[axis] * row as i32 / DIVISIONS as i32;
                    axis += 1;
                }
                out[(w * GRID + row) * GRID + col] = I16Vec3::new(p[0] as i16, p[1] as i16, p[2] as i16);
                col += 1;
            }
            row += 1;
        }
        w += 1;
    }
    out
}

const fn build_faces() -> [Face; FACE_COUNT] {
    let top_left = Uv::new(0, 0);
    let top_right = Uv::new(TEXEL_MAX, 0);
    let bottom_right = Uv::new(TEXEL_MAX, TEXEL_MAX);
    let bottom_left = Uv::new(0, TEXEL_MAX);

    let mut out = [Face::new([0; 3], [top_left; 3]); FACE_COUNT];
    let mut n = 0;
    let mut w = 0;
    while w < WALLS {
        let mut row = 0;
        while row < DIVISIONS {
            let mut col = 0;
            while col < DIVISIONS {
                let tl = ((w * GRID + row) * GRID + col) as u16;
                let tr = tl + 1;
                let bl = tl + GRID as u16;
                let br = bl + 1;
                out[n] = Face::new([tl, tr, bl], [top_left, top_right, bottom_left]);
                out[n + 1] = Face::new([tr, br, bl], [top_right, bottom_right, bottom_left]);
                n += 2;
                col += 1;
            }
            row += 1;
        }
        w += 1;
    }
    out
}

pub static VERTICES: [I16Vec3; VERTEX_COUNT] = build_vertices();
pub static FACES: [Face; FACE_COUNT] = build_faces();

/// The room as a renderable mesh.
pub fn mesh() -> Mesh<'static> {
    Mesh::new(&VERTICES, &FACES)
}
