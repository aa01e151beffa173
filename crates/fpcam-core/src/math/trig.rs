//! Integer sine/cosine over a 4096-unit full turn.
//!
//! Results are 1.3.12 fixed point (4096 = 1.0). The table is generated at
//! compile time from a fifth-order polynomial approximation so no floating
//! point is needed on the target.

/// Angle units per full turn.
pub const FULL_TURN: i32 = 4096;

const QUARTER_SHIFT: u32 = 10;

const A: i32 = 1 << 12;
const B: i32 = 19900;
const C: i32 = 3516;

static SIN_TABLE: [i16; FULL_TURN as usize] = build_table();

const fn approximate_sin(angle: i32) -> i32 {
    // Bit 11 of the angle selects the lower half-turn.
    let sign = angle << (30 - QUARTER_SHIFT);
    let mut x = angle - (1 << QUARTER_SHIFT);
    x = (x << (31 - QUARTER_SHIFT)) >> (31 - QUARTER_SHIFT);
    x *= x;
    x >>= 2 * QUARTER_SHIFT - 14;

    let mut y = B - ((x * C) >> 14);
    y = A - ((x * y) >> 16);

    if sign >= 0 {
        y
    } else {
        -y
    }
}

const fn build_table() -> [i16; FULL_TURN as usize] {
    let mut table = [0i16; FULL_TURN as usize];
    let mut i = 0;
    while i < FULL_TURN as usize {
        table[i] = approximate_sin(i as i32) as i16;
        i += 1;
    }
    table
}

/// Sine of `angle` (any integer; wraps every 4096 units).
pub fn isin(angle: i32) -> i16 {
    SIN_TABLE[(angle & (FULL_TURN - 1)) as usize]
}

/// Cosine of `angle` (any integer; wraps every 4096 units).
pub fn icos(angle: i32) -> i16 {
    isin(angle.wrapping_add(FULL_TURN / 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_angles_are_exact() {
        assert_eq!(isin(0), 0);
        assert_eq!(isin(1024), 4096);
        assert_eq!(isin(2048), 0);
        assert_eq!(isin(3072), -4096);
        assert_eq!(icos(0), 4096);
        assert_eq!(icos(2048), -4096);
    }

    #[test]
    fn negative_angles_wrap() {
        assert_eq!(isin(-1024), isin(3072));
        assert_eq!(icos(-512), icos(512));
    }
}
