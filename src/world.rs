//! Streaming roadside: building conveyor and scrolling ground textures.
//!
//! Nothing actually travels. Buildings slide toward the viewer on a
//! [`Conveyor`] and wrap to the far end, and the terrain and road textures
//! scroll their UVs, both at rates proportional to [`crate::DriveSpeed`].

mod entities;
mod systems;

pub use entities::{
    Building, BuildingMeshes, Conveyor, ScrollingSurface, Side, Slot, UnknownJitterMode,
    WorldRng, YawJitter,
};

use bevy::prelude::*;

use crate::ViewerState;

/// A tiled, scrolling ground plane.
#[derive(Clone, Debug, Reflect)]
pub struct GroundSurface {
    /// Texture asset path.
    pub texture: String,
    /// Plane extent (X, Z).
    pub size: Vec2,
    /// Texture repeats across the plane.
    pub repeat: Vec2,
    /// Plane height.
    pub height: f32,
    /// UV scroll per second per unit of speed.
    pub scroll_rate: f32,
}

/// Per-plugin configuration for the roadside.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct WorldConfig {
    /// Building rows per side.
    pub rows: usize,
    /// Distance between rows.
    pub spacing: f32,
    /// Lateral distance of each building line from the road centre.
    pub side_offset: f32,
    /// World units per second per unit of speed.
    pub speed_scale: f32,
    /// Maximum lateral jitter either way.
    pub lateral_jitter: f32,
    /// Smallest building scale.
    pub min_scale: f32,
    /// Largest building scale.
    pub max_scale: f32,
    /// Maximum yaw jitter either way (radians).
    pub yaw_jitter: f32,
    /// When yaw jitter is re-rolled.
    pub yaw_jitter_mode: YawJitter,
    /// Building footprints (width, height, depth), one per variant.
    pub variants: Vec<Vec3>,
    /// Building base colour.
    pub building_color: Color,
    /// Fixed seed for reproducible layouts; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Off-road terrain.
    pub terrain: GroundSurface,
    /// Road strip.
    pub road: GroundSurface,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            spacing: 20.0,
            side_offset: 10.0,
            speed_scale: 0.1,
            lateral_jitter: 1.0,
            min_scale: 0.8,
            max_scale: 2.4,
            yaw_jitter: 0.1,
            yaw_jitter_mode: YawJitter::PerTick,
            variants: vec![
                Vec3::new(10.0, 20.0, 10.0),
                Vec3::new(8.0, 28.0, 8.0),
                Vec3::new(12.0, 12.0, 14.0),
            ],
            building_color: Color::srgb(0.53, 0.53, 0.53),
            seed: None,
            terrain: GroundSurface {
                texture: "textures/grass.jpg".into(),
                size: Vec2::new(200.0, 200.0),
                repeat: Vec2::new(40.0, 40.0),
                height: -0.02,
                scroll_rate: 0.1,
            },
            road: GroundSurface {
                texture: "textures/road.jpg".into(),
                size: Vec2::new(4.0, 200.0),
                repeat: Vec2::new(1.0, 20.0),
                height: -0.01,
                scroll_rate: 1.0,
            },
        }
    }
}

/// Building conveyor and scrolling ground.
pub struct WorldPlugin(pub WorldConfig);

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<WorldConfig>()
            .register_type::<Building>()
            .register_type::<ScrollingSurface>()
            .register_type::<Conveyor>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, (systems::spawn_ground, systems::spawn_buildings))
            .add_systems(
                Update,
                (
                    systems::advance_conveyor,
                    systems::place_buildings.run_if(resource_changed::<Conveyor>),
                )
                    .chain()
                    .run_if(resource_exists::<Conveyor>)
                    .run_if(not(in_state(ViewerState::Debugging))),
            )
            .add_systems(
                Update,
                systems::scroll_ground.run_if(not(in_state(ViewerState::Debugging))),
            );
    }
}
