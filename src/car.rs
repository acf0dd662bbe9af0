//! Car scene: glTF spawning, one-time named-node resolution, wheel spin.
//!
//! The model is spawned as a [`SceneRoot`]. When the scene instance is ready,
//! a single pass over its descendants builds [`CarNodes`], mapping each fixed
//! node identifier to its entity. Consumers look nodes up there instead of
//! scanning the hierarchy each frame; a missing node is simply absent.

mod entities;
mod systems;

pub use entities::{CarNode, CarNodes, CarRoot, CarUnavailable, Hotspot, RestPose};

use bevy::prelude::*;

use crate::ViewerState;

/// Per-plugin configuration for the car model.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CarConfig {
    /// glTF file relative to the asset directory.
    pub model_path: String,
    /// World position of the car origin.
    pub position: Vec3,
    /// Tire rotation in radians per reference tick per unit of speed.
    pub wheel_spin: f32,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self {
            model_path: "models/car.glb".into(),
            position: Vec3::ZERO,
            wheel_spin: 0.15,
        }
    }
}

/// Spawns the car and resolves its named parts.
pub struct CarPlugin(pub CarConfig);

impl Plugin for CarPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CarConfig>()
            .register_type::<CarRoot>()
            .register_type::<Hotspot>()
            .register_type::<RestPose>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, systems::spawn_car)
            .add_systems(
                Update,
                systems::watch_car_load
                    .run_if(not(resource_exists::<CarNodes>))
                    .run_if(not(resource_exists::<CarUnavailable>)),
            )
            .add_systems(
                Update,
                systems::spin_wheels
                    .run_if(resource_exists::<CarNodes>)
                    .run_if(not(in_state(ViewerState::Debugging))),
            );
    }
}
