//! Car lamps, cabin light and scene lighting.
//!
//! [`LightState`] is the only input. Each lamp's emissive material and
//! projected spot light are derived from it in one place ([`LampLevels`]),
//! so the two can never disagree.

mod entities;
mod systems;

pub use entities::{InteriorLight, Lamp, LampLevels, LampMaterials, LampSpot, LightState};

use std::f32::consts::{FRAC_PI_6, PI};

use bevy::prelude::*;

use crate::car::CarNodes;
use crate::rig::SeatView;

/// One switchable lamp: emissive glow plus a projected spot.
#[derive(Clone, Debug, Reflect)]
pub struct LampConfig {
    /// Glow and beam colour.
    pub color: Color,
    /// Emissive multiplier when on.
    pub emissive_strength: f32,
    /// Spot intensity when on (lumens).
    pub spot_intensity: f32,
    /// Spot range.
    pub range: f32,
    /// Outer cone angle (radians).
    pub outer_angle: f32,
    /// Fraction of the cone that fades out.
    pub penumbra: f32,
    /// Spot position relative to the lamp node, in world axes.
    pub offset: Vec3,
    /// Spot aim point relative to the spot position.
    pub aim: Vec3,
}

/// Per-plugin configuration for lighting.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct LightsConfig {
    /// Headlights.
    pub head: LampConfig,
    /// Tail lights.
    pub rear: LampConfig,
    /// Cabin light position relative to the car.
    pub interior_position: Vec3,
    /// Cabin light intensity while seated (lumens).
    pub interior_intensity: f32,
    /// Cabin light range.
    pub interior_range: f32,
    /// Ambient brightness.
    pub ambient_brightness: f32,
    /// Sun position; it shines toward the origin.
    pub sun_position: Vec3,
    /// Sun illuminance (lux).
    pub sun_illuminance: f32,
    /// Sun colour.
    pub sun_color: Color,
    /// Background colour.
    pub clear_color: Color,
}

impl LightsConfig {
    /// Settings for `lamp`.
    pub fn lamp(&self, lamp: Lamp) -> &LampConfig {
        match lamp {
            Lamp::Head => &self.head,
            Lamp::Rear => &self.rear,
        }
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            head: LampConfig {
                color: Color::WHITE,
                emissive_strength: 2.5,
                spot_intensity: 1_000_000.0,
                range: 100.0,
                outer_angle: FRAC_PI_6,
                penumbra: 0.2,
                offset: Vec3::new(0.0, 0.2, 1.2),
                aim: Vec3::new(0.0, -0.1, 10.0),
            },
            rear: LampConfig {
                color: Color::srgb(1.0, 0.0, 0.0),
                emissive_strength: 3.0,
                spot_intensity: 100_000.0,
                range: 50.0,
                outer_angle: PI / 5.0,
                penumbra: 0.2,
                offset: Vec3::new(0.0, 0.1, -1.2),
                aim: Vec3::new(0.0, -0.1, -10.0),
            },
            interior_position: Vec3::new(0.0, 1.8, 0.0),
            interior_intensity: 20_000.0,
            interior_range: 5.0,
            ambient_brightness: 300.0,
            sun_position: Vec3::new(50.0, 100.0, 50.0),
            sun_illuminance: 8_000.0,
            sun_color: Color::srgb_u8(0xff, 0xf8, 0xe6),
            clear_color: Color::srgb_u8(0x24, 0x24, 0x24),
        }
    }
}

/// Lamps, cabin light and scene lighting.
pub struct LightsPlugin(pub LightsConfig);

impl Plugin for LightsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<LightsConfig>()
            .register_type::<LightState>()
            .register_type::<LampSpot>()
            .register_type::<InteriorLight>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .init_resource::<LightState>()
            .add_systems(Startup, systems::spawn_lights)
            .add_systems(
                Update,
                (
                    systems::clone_lamp_materials.run_if(resource_added::<CarNodes>),
                    systems::sync_lamps.run_if(
                        resource_changed::<LightState>.or(resource_exists_and_changed::<LampMaterials>),
                    ),
                    systems::follow_lamps.run_if(resource_exists::<CarNodes>),
                    systems::sync_interior.run_if(resource_changed::<SeatView>),
                )
                    .chain(),
            );
    }
}
