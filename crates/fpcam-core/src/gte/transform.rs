//! Camera transform composition on the coprocessor.
//!
//! The rotation is composed in place: each elementary axis rotation is loaded
//! into V0-V2 as column vectors and multiplied into the current matrix with
//! three MVMVA operations, one per output column.

use glam::{I16Vec3, IVec3};

use super::{Gte, Matrix3, MvmvaVector};
use crate::scene::camera::Camera;

/// Multiply the current rotation matrix by the matrix whose columns are in
/// V0-V2 and return the product.
pub fn multiply_current_matrix_by_vectors(gte: &mut Gte) -> Matrix3 {
    let mut product = Matrix3::default();
    for (column, operand) in [MvmvaVector::V0, MvmvaVector::V1, MvmvaVector::V2]
        .into_iter()
        .enumerate()
    {
        let ir = gte.mvmva(operand);
        product.set_column(column, [ir.x, ir.y, ir.z]);
    }
    product
}

/// Post-multiply the current rotation by `m` and load the product.
fn apply(gte: &mut Gte, m: &Matrix3) {
    gte.load_column_vectors(m);
    let product = multiply_current_matrix_by_vectors(gte);
    gte.load_rotation(&product);
}

/// Compose pitch, yaw and roll rotations into the current matrix.
///
/// The matrix is post-multiplied by pitch, then yaw, then roll, so a point
/// is rotated by roll first, then yaw, then pitch. Zero angles are skipped.
pub fn rotate_current_matrix(gte: &mut Gte, roll: i32, yaw: i32, pitch: i32) {
    if pitch != 0 {
        apply(gte, &Matrix3::pitch(pitch));
    }
    if yaw != 0 {
        apply(gte, &Matrix3::yaw(yaw));
    }
    if roll != 0 {
        apply(gte, &Matrix3::roll(roll));
    }
}

/// Load the translation as the current rotation applied to `offset`.
///
/// Pass the negated camera position so vertices land in camera space. The
/// offset goes through the 16-bit IR registers, which keep only the low 16
/// bits of each component.
pub fn update_translation(gte: &mut Gte, offset: IVec3) {
    gte.set_ir(I16Vec3::new(offset.x as i16, offset.y as i16, offset.z as i16));
    let t = gte.mvmva(MvmvaVector::Ir);
    gte.load_translation(IVec3::new(t.x.into(), t.y.into(), t.z.into()));
}

/// Rebuild the full transform state for `camera`:
/// `camera_space = R * (world - camera.position)`.
pub fn apply_camera(gte: &mut Gte, camera: &Camera) {
    gte.load_rotation(&Matrix3::IDENTITY);
    rotate_current_matrix(
        gte,
        -i32::from(camera.roll),
        i32::from(camera.yaw),
        i32::from(camera.pitch),
    );
    update_translation(gte, -camera.position);
}
