use bevy::prelude::*;

use super::{LampConfig, LightsConfig};

/// The two switchable lamp groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Lamp {
    /// Headlights.
    Head,
    /// Tail lights.
    Rear,
}

impl Lamp {
    /// Both lamps.
    pub const ALL: [Lamp; 2] = [Lamp::Head, Lamp::Rear];
}

/// Which lamps are switched on.
#[derive(Resource, Default, Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub struct LightState {
    /// Headlights on.
    pub headlights_on: bool,
    /// Tail lights on.
    pub rear_lights_on: bool,
}

impl LightState {
    /// Whether `lamp` is on.
    pub fn is_on(&self, lamp: Lamp) -> bool {
        match lamp {
            Lamp::Head => self.headlights_on,
            Lamp::Rear => self.rear_lights_on,
        }
    }

    /// Switches `lamp`.
    pub fn set(&mut self, lamp: Lamp, on: bool) {
        match lamp {
            Lamp::Head => self.headlights_on = on,
            Lamp::Rear => self.rear_lights_on = on,
        }
    }
}

/// Everything a lamp's on/off state drives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LampLevels {
    /// Emissive colour for the lamp's mesh materials.
    pub emissive: LinearRgba,
    /// Intensity of the projected spot light.
    pub spot_intensity: f32,
}

impl LampLevels {
    /// Levels for a lamp that is `on` or off.
    pub fn new(cfg: &LampConfig, on: bool) -> Self {
        if on {
            Self {
                emissive: cfg.color.to_linear() * cfg.emissive_strength,
                spot_intensity: cfg.spot_intensity,
            }
        } else {
            Self {
                emissive: LinearRgba::BLACK,
                spot_intensity: 0.0,
            }
        }
    }

    /// Levels for `lamp` under `state`.
    pub fn of(lamp: Lamp, state: &LightState, cfg: &LightsConfig) -> Self {
        Self::new(cfg.lamp(lamp), state.is_on(lamp))
    }
}

/// Spot light projected by a lamp.
#[derive(Component, Reflect)]
pub struct LampSpot(pub Lamp);

/// The cabin light.
#[derive(Component, Reflect)]
pub struct InteriorLight;

/// Per-lamp material handles, cloned from the model so lamps glow independently.
#[derive(Resource, Default)]
pub struct LampMaterials {
    /// Headlight materials.
    pub head: Vec<Handle<StandardMaterial>>,
    /// Tail light materials.
    pub rear: Vec<Handle<StandardMaterial>>,
}

impl LampMaterials {
    /// Materials belonging to `lamp`.
    pub fn get(&self, lamp: Lamp) -> &[Handle<StandardMaterial>] {
        match lamp {
            Lamp::Head => &self.head,
            Lamp::Rear => &self.rear,
        }
    }

    /// Mutable list for `lamp`.
    pub fn get_mut(&mut self, lamp: Lamp) -> &mut Vec<Handle<StandardMaterial>> {
        match lamp {
            Lamp::Head => &mut self.head,
            Lamp::Rear => &mut self.rear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rear_lights_on_glow_red_and_light_the_spot() {
        let cfg = LightsConfig::default();
        let state = LightState {
            rear_lights_on: true,
            ..default()
        };
        let levels = LampLevels::of(Lamp::Rear, &state, &cfg);
        assert_eq!(levels.emissive, LinearRgba::RED * 3.0);
        assert_eq!(levels.spot_intensity, cfg.rear.spot_intensity);
        assert!(levels.spot_intensity > 0.0);
    }

    #[test]
    fn headlights_on_glow_white() {
        let cfg = LightsConfig::default();
        let state = LightState {
            headlights_on: true,
            ..default()
        };
        let levels = LampLevels::of(Lamp::Head, &state, &cfg);
        assert_eq!(levels.emissive, LinearRgba::WHITE * 2.5);
        assert_eq!(levels.spot_intensity, cfg.head.spot_intensity);
    }

    #[test]
    fn off_is_black_and_dark() {
        let cfg = LightsConfig::default();
        let state = LightState::default();
        for lamp in Lamp::ALL {
            let levels = LampLevels::of(lamp, &state, &cfg);
            assert_eq!(levels.emissive, LinearRgba::BLACK);
            assert_eq!(levels.spot_intensity, 0.0);
        }
    }

    #[test]
    fn levels_depend_only_on_the_switch() {
        let cfg = LightsConfig::default();
        let mut state = LightState::default();
        let on = LampLevels::new(&cfg.rear, true);
        let off = LampLevels::new(&cfg.rear, false);
        for flips in 0..6 {
            state.set(Lamp::Rear, flips % 2 == 0);
            state.set(Lamp::Rear, flips % 2 == 0);
            let expected = if flips % 2 == 0 { on } else { off };
            assert_eq!(LampLevels::of(Lamp::Rear, &state, &cfg), expected);
        }
        assert!(!state.is_on(Lamp::Head));
    }
}
