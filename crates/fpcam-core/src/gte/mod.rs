//! Software model of the geometry transformation engine (coprocessor 2).
//!
//! Only the register state and commands the renderer uses are modelled:
//! MVMVA against the rotation matrix, RTPT (rotate, translate, project three
//! vertices), NCLIP (signed area) and AVSZ3 (scaled average depth). Results
//! saturate the way the hardware registers do.

pub mod matrix;
pub mod transform;

pub use matrix::Matrix3;

use glam::{I16Vec3, IVec3};

use crate::math::fixed::{saturate_i16, saturate_u16};

/// Most negative screen coordinate the projection can produce.
const SXY_MIN: i64 = -0x400;
/// Most positive screen coordinate the projection can produce.
const SXY_MAX: i64 = 0x3FF;
/// Saturated perspective divide result.
const DIVIDE_MAX: i64 = 0x1_FFFF;

/// Vector operand for MVMVA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MvmvaVector {
    V0,
    V1,
    V2,
    /// The IR1-IR3 accumulator registers.
    Ir,
}

/// Geometry coprocessor state.
#[derive(Clone, Debug)]
pub struct Gte {
    rotation: Matrix3,
    translation: IVec3,
    vectors: [I16Vec3; 3],
    ir: I16Vec3,
    mac0: i32,
    /// Screen XY FIFO (oldest first), each packed as `y << 16 | x`.
    sxy: [u32; 3],
    /// Depth FIFO (oldest first); SZ0 is the entry pushed before the last three.
    sz: [u16; 4],
    /// Unclamped camera-space depth of the three most recently projected vertices.
    raw_depth: [i32; 3],
    otz: u16,
    ofx: i32,
    ofy: i32,
    h: u16,
    zsf3: i16,
}

impl Default for Gte {
    fn default() -> Self {
        Self::new()
    }
}

impl Gte {
    /// Power-on state: identity rotation, zero translation, no projection setup.
    pub fn new() -> Self {
        Self {
            rotation: Matrix3::IDENTITY,
            translation: IVec3::ZERO,
            vectors: [I16Vec3::ZERO; 3],
            ir: I16Vec3::ZERO,
            mac0: 0,
            sxy: [0; 3],
            sz: [0; 4],
            raw_depth: [0; 3],
            otz: 0,
            ofx: 0,
            ofy: 0,
            h: 1,
            zsf3: 0,
        }
    }

    /// Configure screen centre, field of view and the average-Z scale factor
    /// so that the visible depth range maps onto `ot_size` buckets.
    pub fn setup(&mut self, width: i32, height: i32, ot_size: usize) {
        self.set_xy_origin(width / 2, height / 2);
        self.set_field_of_view(width as u16);
        self.set_z_scale_factor(((crate::math::ONE as usize * ot_size) / 0x7FFF) as i16);
    }

    /// Screen-space position of the projection centre, in pixels.
    pub fn set_xy_origin(&mut self, x: i32, y: i32) {
        self.ofx = x << 16;
        self.ofy = y << 16;
    }

    /// Distance from the eye to the projection plane (H register).
    pub fn set_field_of_view(&mut self, h: u16) {
        self.h = h;
    }

    /// Scale factor applied by AVSZ3 (ZSF3 register).
    pub fn set_z_scale_factor(&mut self, zsf3: i16) {
        self.zsf3 = zsf3;
    }

    pub fn z_scale_factor(&self) -> i16 {
        self.zsf3
    }

    pub fn load_rotation(&mut self, m: &Matrix3) {
        self.rotation = *m;
    }

    pub fn rotation(&self) -> &Matrix3 {
        &self.rotation
    }

    pub fn load_translation(&mut self, t: IVec3) {
        self.translation = t;
    }

    pub fn translation(&self) -> IVec3 {
        self.translation
    }

    /// Load V0-V2 with the columns of `m`, so MVMVA on Vn yields column n of
    /// the product of the rotation matrix and `m`.
    pub fn load_column_vectors(&mut self, m: &Matrix3) {
        for (i, v) in self.vectors.iter_mut().enumerate() {
            let [x, y, z] = m.column(i);
            *v = I16Vec3::new(x, y, z);
        }
    }

    /// Load the three vertices RTPT will project.
    pub fn load_vertices(&mut self, v0: I16Vec3, v1: I16Vec3, v2: I16Vec3) {
        self.vectors = [v0, v1, v2];
    }

    pub fn set_ir(&mut self, ir: I16Vec3) {
        self.ir = ir;
    }

    pub fn ir(&self) -> I16Vec3 {
        self.ir
    }

    /// MVMVA with shift: IR = (rotation * v) >> 12, no translation added.
    pub fn mvmva(&mut self, operand: MvmvaVector) -> I16Vec3 {
        let v = match operand {
            MvmvaVector::V0 => self.vectors[0],
            MvmvaVector::V1 => self.vectors[1],
            MvmvaVector::V2 => self.vectors[2],
            MvmvaVector::Ir => self.ir,
        };
        let mac = self.rotate(v);
        self.ir = I16Vec3::new(
            saturate_i16(mac[0] >> 12),
            saturate_i16(mac[1] >> 12),
            saturate_i16(mac[2] >> 12),
        );
        self.ir
    }

    /// RTPT: rotate, translate and perspective-project V0-V2 into the screen
    /// XY and depth FIFOs.
    pub fn rtpt(&mut self) {
        for i in 0..3 {
            self.rtps(i);
        }
    }

    fn rtps(&mut self, index: usize) {
        let rotated = self.rotate(self.vectors[index]);
        let t = self.translation;
        let mac1 = ((i64::from(t.x) << 12) + rotated[0]) >> 12;
        let mac2 = ((i64::from(t.y) << 12) + rotated[1]) >> 12;
        let mac3 = ((i64::from(t.z) << 12) + rotated[2]) >> 12;

        let ir1 = i64::from(saturate_i16(mac1));
        let ir2 = i64::from(saturate_i16(mac2));
        self.ir = I16Vec3::new(ir1 as i16, ir2 as i16, saturate_i16(mac3));

        let sz = saturate_u16(mac3);
        self.sz = [self.sz[1], self.sz[2], self.sz[3], sz];
        self.raw_depth[index] = mac3.clamp(i32::MIN as i64, i32::MAX as i64) as i32;

        let q = self.divide(sz);
        let sx = ((i64::from(self.ofx) + ir1 * q) >> 16).clamp(SXY_MIN, SXY_MAX);
        let sy = ((i64::from(self.ofy) + ir2 * q) >> 16).clamp(SXY_MIN, SXY_MAX);
        self.sxy = [self.sxy[1], self.sxy[2], pack_xy(sx as i16, sy as i16)];
    }

    /// H / SZ in 1.16 fixed point, saturating when the vertex is too close.
    fn divide(&self, sz: u16) -> i64 {
        let h = i64::from(self.h);
        let sz = i64::from(sz);
        if h < sz * 2 {
            (((h << 17) / sz + 1) / 2).min(DIVIDE_MAX)
        } else {
            DIVIDE_MAX
        }
    }

    fn rotate(&self, v: I16Vec3) -> [i64; 3] {
        let m = &self.rotation.0;
        let v = [i64::from(v.x), i64::from(v.y), i64::from(v.z)];
        let mut out = [0i64; 3];
        for (row, acc) in m.iter().zip(out.iter_mut()) {
            *acc = i64::from(row[0]) * v[0] + i64::from(row[1]) * v[1] + i64::from(row[2]) * v[2];
        }
        out
    }

    /// NCLIP: signed area (x2) of the triangle in the screen XY FIFO.
    /// Positive when the vertices wind the visible way.
    pub fn nclip(&mut self) -> i32 {
        let [(x0, y0), (x1, y1), (x2, y2)] = self.sxy.map(unpack_xy);
        let (x0, y0, x1, y1, x2, y2) = (
            i64::from(x0),
            i64::from(y0),
            i64::from(x1),
            i64::from(y1),
            i64::from(x2),
            i64::from(y2),
        );
        let area = x0 * y1 + x1 * y2 + x2 * y0 - x0 * y2 - x1 * y0 - x2 * y1;
        self.mac0 = area as i32;
        self.mac0
    }

    /// AVSZ3: OTZ = ZSF3 * (SZ1 + SZ2 + SZ3) >> 12, saturated to 0..=0xFFFF.
    pub fn avsz3(&mut self) -> u16 {
        let sum = i64::from(self.sz[1]) + i64::from(self.sz[2]) + i64::from(self.sz[3]);
        let mac0 = i64::from(self.zsf3) * sum;
        self.mac0 = mac0 as i32;
        self.otz = saturate_u16(mac0 >> 12);
        self.otz
    }

    pub fn mac0(&self) -> i32 {
        self.mac0
    }

    pub fn otz(&self) -> u16 {
        self.otz
    }

    /// Packed screen coordinate of vertex `i` (0-2) of the last RTPT,
    /// ready to be used as a GP0 vertex word.
    pub fn sxy(&self, i: usize) -> u32 {
        self.sxy[i]
    }

    /// Depth FIFO SZ0-SZ3.
    pub fn sz(&self) -> [u16; 4] {
        self.sz
    }

    /// Signed camera-space depth of each vertex of the last RTPT, before the
    /// depth FIFO clamps negative values to zero.
    pub fn raw_depths(&self) -> [i32; 3] {
        self.raw_depth
    }
}

/// Pack a screen coordinate the way both the SXY registers and GP0 expect it.
pub fn pack_xy(x: i16, y: i16) -> u32 {
    (x as u16 as u32) | ((y as u16 as u32) << 16)
}

/// Inverse of [`pack_xy`].
pub fn unpack_xy(word: u32) -> (i16, i16) {
    (word as u16 as i16, (word >> 16) as u16 as i16)
}
