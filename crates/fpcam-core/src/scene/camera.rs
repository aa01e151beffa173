//! First-person camera state.

use glam::IVec3;

use crate::config::CAMERA_START;

/// Camera position in world units and orientation in 4096-per-turn angle units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    pub position: IVec3,
    pub pitch: i16,
    pub roll: i16,
    pub yaw: i16,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: CAMERA_START,
            pitch: 0,
            roll: 0,
            yaw: 0,
        }
    }
}

impl Camera {
    pub fn at(position: IVec3) -> Self {
        Self {
            position,
            pitch: 0,
            roll: 0,
            yaw: 0,
        }
    }
}
