//! Fixed-point formats used by the geometry coprocessor.
//!
//! - 1.3.12 signed for rotation matrix elements and trig results (`Q12`)
//! - 16-bit signed for IR vector registers, saturating on overflow
//! - 16-bit unsigned for screen-space depth, saturating at 0 and 0xFFFF

use fixed::types::I4F12;

/// 1.0 in 1.3.12 fixed point.
pub const ONE: i32 = 1 << 12;

/// A 1.3.12 matrix element or trig value.
pub type Q12 = I4F12;

/// Reinterpret raw coprocessor bits as a `Q12` value.
pub fn q12(bits: i16) -> Q12 {
    Q12::from_bits(bits)
}

/// Clamp to the signed 16-bit IR register range.
pub fn saturate_i16(value: i64) -> i16 {
    value.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

/// Clamp to the unsigned 16-bit SZ/OTZ register range.
pub fn saturate_u16(value: i64) -> u16 {
    value.clamp(0, u16::MAX as i64) as u16
}
