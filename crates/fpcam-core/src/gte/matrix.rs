//! 3x3 rotation matrices in 1.3.12 fixed point.

use core::fmt;

use crate::math::{fixed, icos, isin, ONE};

/// Row-major 3x3 matrix of 1.3.12 elements, as held in the rotation registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Matrix3(pub [[i16; 3]; 3]);

impl Matrix3 {
    pub const IDENTITY: Self = Self([
        [ONE as i16, 0, 0],
        [0, ONE as i16, 0],
        [0, 0, ONE as i16],
    ]);

    /// Build a matrix from its elements in row-major order.
    #[allow(clippy::too_many_arguments)]
    pub const fn from_rows(
        xx: i16,
        xy: i16,
        xz: i16,
        yx: i16,
        yy: i16,
        yz: i16,
        zx: i16,
        zy: i16,
        zz: i16,
    ) -> Self {
        Self([[xx, xy, xz], [yx, yy, yz], [zx, zy, zz]])
    }

    /// Rotation about the X axis (pitch).
    pub fn pitch(angle: i32) -> Self {
        let (s, c) = (isin(angle), icos(angle));
        Self::from_rows(ONE as i16, 0, 0, 0, c, -s, 0, s, c)
    }

    /// Rotation about the Y axis (yaw).
    pub fn yaw(angle: i32) -> Self {
        let (s, c) = (isin(angle), icos(angle));
        Self::from_rows(c, 0, s, 0, ONE as i16, 0, -s, 0, c)
    }

    /// Rotation about the Z axis (roll).
    pub fn roll(angle: i32) -> Self {
        let (s, c) = (isin(angle), icos(angle));
        Self::from_rows(c, -s, 0, s, c, 0, 0, 0, ONE as i16)
    }

    /// Column `i` as an `[x, y, z]` vector.
    pub fn column(&self, i: usize) -> [i16; 3] {
        [self.0[0][i], self.0[1][i], self.0[2][i]]
    }

    /// Overwrite column `i`.
    pub fn set_column(&mut self, i: usize, v: [i16; 3]) {
        self.0[0][i] = v[0];
        self.0[1][i] = v[1];
        self.0[2][i] = v[2];
    }
}

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(
                f,
                "[{} {} {}]",
                fixed::q12(row[0]),
                fixed::q12(row[1]),
                fixed::q12(row[2])
            )?;
        }
        Ok(())
    }
}
