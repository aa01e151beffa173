//! Fixed-point math shared by the coprocessor model and the controls.

pub mod fixed;
pub mod trig;

pub use self::fixed::ONE;
pub use self::trig::{icos, isin};
