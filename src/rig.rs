//! Camera rig: free orbit outside the car, first-person look from a seat.
//!
//! Seat changes arrive as [`SeatRequest`] messages (from hotspot clicks or the
//! controls panel). While seated the rig disables orbit control, blends the
//! camera toward the seat anchor, and aims it from accumulated mouse/touch
//! look angles. Leaving the seat re-enables orbit control at its home framing.

mod entities;
mod systems;

pub use entities::{
    LookState, OrbitController, Seat, SeatRequest, SeatView, TouchLook, UnknownSeat, ViewerCamera,
};

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use bevy::prelude::*;

use crate::ViewerState;
use crate::controls::PointerOverUi;

/// Camera anchors for each seat, relative to the car origin.
#[derive(Clone, Debug, Reflect)]
pub struct SeatAnchors {
    /// Front left.
    pub driver: Vec3,
    /// Front right.
    pub passenger: Vec3,
    /// Back left.
    pub rear_left: Vec3,
    /// Back right.
    pub rear_right: Vec3,
}

impl SeatAnchors {
    /// Anchor for `seat`.
    pub fn get(&self, seat: Seat) -> Vec3 {
        match seat {
            Seat::Driver => self.driver,
            Seat::Passenger => self.passenger,
            Seat::RearLeft => self.rear_left,
            Seat::RearRight => self.rear_right,
        }
    }
}

/// Per-plugin configuration for the camera rig.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct RigConfig {
    /// First-person camera positions.
    pub seats: SeatAnchors,
    /// Seat to enter once the intro hands over control.
    pub start_seat: Option<Seat>,
    /// Orbit camera position at home framing.
    pub home_position: Vec3,
    /// Orbit target at home framing.
    pub home_target: Vec3,
    /// Per-tick factor for blending the camera toward a seat anchor.
    pub seat_blend: f32,
    /// Look radians per pointer unit while seated.
    pub look_sensitivity: f32,
    /// Seated pitch limit in radians.
    pub pitch_limit: f32,
    /// Vertical field of view while seated (degrees).
    pub seated_fov: f32,
    /// Vertical field of view in free orbit (degrees).
    pub free_fov: f32,
    /// Orbit radians per pixel of drag.
    pub orbit_sensitivity: f32,
    /// Orbit elevation limit in radians.
    pub orbit_pitch_limit: f32,
    /// Fractional distance change per scroll line.
    pub zoom_step: f32,
    /// Closest orbit distance.
    pub min_distance: f32,
    /// Farthest orbit distance.
    pub max_distance: f32,
    /// Bloom post-processing intensity.
    pub bloom_intensity: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            seats: SeatAnchors {
                driver: Vec3::new(0.5, 1.5, 0.4),
                passenger: Vec3::new(-0.5, 1.5, 0.4),
                rear_left: Vec3::new(0.6, 1.5, -0.2),
                rear_right: Vec3::new(-0.6, 1.5, -0.2),
            },
            start_seat: None,
            home_position: Vec3::new(3.0, 1.5, 5.0),
            home_target: Vec3::ZERO,
            seat_blend: 0.08,
            look_sensitivity: 0.002,
            pitch_limit: FRAC_PI_4,
            seated_fov: 70.0,
            free_fov: 60.0,
            orbit_sensitivity: 0.005,
            orbit_pitch_limit: FRAC_PI_2 - 0.05,
            zoom_step: 0.1,
            min_distance: 2.0,
            max_distance: 40.0,
            bloom_intensity: 0.15,
        }
    }
}

/// Run condition: the viewer occupies a seat.
pub fn seated(seat: Res<SeatView>) -> bool {
    seat.0.is_some()
}

/// Seat transitions and the seated camera.
///
/// Needs a [`RigConfig`] resource and a [`ViewerCamera`]. Pointer input lives
/// in [`RigPlugin`], which adds this plugin.
pub struct SeatPlugin;

impl Plugin for SeatPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SeatView>()
            .register_type::<LookState>()
            .register_type::<OrbitController>()
            .register_type::<ViewerCamera>()
            .init_resource::<SeatView>()
            .init_resource::<LookState>()
            .init_resource::<TouchLook>()
            .add_message::<SeatRequest>()
            .add_systems(
                Update,
                (
                    systems::apply_seat_requests,
                    systems::seat_camera
                        .run_if(seated)
                        .run_if(in_state(ViewerState::Running)),
                )
                    .chain(),
            );
    }
}

/// Free-orbit camera plus seated first-person camera.
pub struct RigPlugin(pub RigConfig);

impl Plugin for RigPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<RigConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<PointerOverUi>()
            .add_plugins(SeatPlugin)
            .add_systems(Startup, systems::spawn_camera)
            .add_systems(OnEnter(ViewerState::Running), systems::enter_start_seat)
            .add_systems(
                Update,
                systems::accumulate_look
                    .after(systems::apply_seat_requests)
                    .before(systems::seat_camera),
            )
            .add_systems(
                Update,
                (systems::orbit_input, systems::apply_orbit)
                    .chain()
                    .after(systems::apply_seat_requests)
                    .run_if(not(seated))
                    .run_if(in_state(ViewerState::Running)),
            );
    }
}
