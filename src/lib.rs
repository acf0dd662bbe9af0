#![warn(missing_docs)]
//! Interactive 3D car viewer.
//!
//! Shows a glTF car on an endless roadside. Doors, frunk and trunk open on
//! click; clicking an open door puts the camera in that seat. Buildings and
//! ground textures stream past at a user-controlled speed, and a one-shot
//! fly-in introduces the scene.

pub mod anim;
pub mod car;
pub mod controls;
pub mod hotspot;
pub mod intro;
pub mod lights;
pub mod math;
pub mod panels;
pub mod rig;
pub mod world;

use bevy::prelude::*;

/// Application-wide viewer state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum ViewerState {
    /// Intro fly-in playing.
    #[default]
    Intro,
    /// Normal interaction.
    Running,
    /// World inspector open (Tab to toggle).
    Debugging,
}

/// Road speed driving the conveyor, ground scroll and wheel spin.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct DriveSpeed {
    /// Current speed, in `[0, max]`.
    pub value: f32,
    /// Upper bound offered by the controls.
    pub max: f32,
}

impl Default for DriveSpeed {
    fn default() -> Self {
        Self {
            value: 100.0,
            max: 100.0,
        }
    }
}

impl DriveSpeed {
    /// Speed `value` clamped into `[0, max]`.
    pub fn clamped(value: f32, max: f32) -> Self {
        Self {
            value: value.clamp(0.0, max),
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_is_clamped_to_the_slider_range() {
        assert_eq!(DriveSpeed::clamped(250.0, 100.0).value, 100.0);
        assert_eq!(DriveSpeed::clamped(-3.0, 100.0).value, 0.0);
        assert_eq!(DriveSpeed::clamped(42.5, 100.0).value, 42.5);
    }
}
