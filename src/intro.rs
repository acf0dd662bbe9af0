//! Cinematic fly-in played once at startup.
//!
//! Once the car scene is ready and a short delay has passed, the camera is
//! eased from a high, distant offset down to a close three-quarter view of
//! the car, always aimed at it. Orbit control is off while it plays; when it
//! ends the orbit target becomes the car and the viewer enters
//! [`ViewerState::Running`]. If the car never loads, control is handed over
//! without the fly-in.

mod entities;
mod systems;

pub use entities::{IntroPhase, IntroSequence, IntroStep, fly_in_position};

use bevy::prelude::*;

use crate::ViewerState;

/// Per-plugin configuration for the intro fly-in.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct IntroConfig {
    /// `false` hands control over immediately.
    pub enabled: bool,
    /// Pause after the scene is ready (seconds).
    pub delay: f32,
    /// Longest wait for the car scene before control is handed over anyway (seconds).
    pub scene_timeout: f32,
    /// Length of the fly-in (seconds).
    pub duration: f32,
    /// Camera offset from the car when the fly-in starts.
    pub start_offset: Vec3,
    /// Camera offset from the car when the fly-in ends.
    pub end_offset: Vec3,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: 0.2,
            scene_timeout: 10.0,
            duration: 2.6,
            start_offset: Vec3::new(-8.0, 12.0, 32.0),
            end_offset: Vec3::new(-3.0, 2.5, 7.5),
        }
    }
}

/// Startup fly-in that hands over to orbit control.
pub struct IntroPlugin(pub IntroConfig);

impl Plugin for IntroPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<IntroConfig>()
            .register_type::<IntroSequence>()
            .insert_resource(self.0.clone())
            .init_resource::<IntroSequence>()
            .add_systems(
                Update,
                systems::run_intro.run_if(in_state(ViewerState::Intro)),
            );
    }
}
