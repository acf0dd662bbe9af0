use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

use super::LightsConfig;
use super::entities::{InteriorLight, Lamp, LampLevels, LampMaterials, LampSpot, LightState};
use crate::car::{CarNode, CarNodes, CarRoot};
use crate::rig::SeatView;

fn lamp_node(lamp: Lamp) -> CarNode {
    match lamp {
        Lamp::Head => CarNode::FrontLight,
        Lamp::Rear => CarNode::RearLight,
    }
}

/// Sun, ambient, the two lamp spots and the cabin light.
pub fn spawn_lights(mut commands: Commands, cfg: Res<LightsConfig>, state: Res<LightState>) {
    commands.insert_resource(GlobalAmbientLight {
        brightness: cfg.ambient_brightness,
        ..default()
    });
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            color: cfg.sun_color,
            illuminance: cfg.sun_illuminance,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(cfg.sun_position).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    for lamp in Lamp::ALL {
        let lamp_cfg = cfg.lamp(lamp);
        let levels = LampLevels::of(lamp, &state, &cfg);
        commands.spawn((
            Name::new(format!("{lamp:?}Spot")),
            LampSpot(lamp),
            SpotLight {
                color: lamp_cfg.color,
                intensity: levels.spot_intensity,
                range: lamp_cfg.range,
                outer_angle: lamp_cfg.outer_angle,
                inner_angle: lamp_cfg.outer_angle * (1.0 - lamp_cfg.penumbra),
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(lamp_cfg.offset)
                .looking_at(lamp_cfg.offset + lamp_cfg.aim, Vec3::Y),
        ));
    }

    commands.spawn((
        Name::new("InteriorLight"),
        InteriorLight,
        PointLight {
            intensity: 0.0,
            range: cfg.interior_range,
            ..default()
        },
        Transform::from_translation(cfg.interior_position),
    ));
}

/// Gives each lamp's meshes their own copy of the model material.
pub fn clone_lamp_materials(
    mut commands: Commands,
    nodes: Res<CarNodes>,
    children: Query<&Children>,
    mut mesh_materials: Query<&mut MeshMaterial3d<StandardMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut lamps = LampMaterials::default();
    for lamp in Lamp::ALL {
        let Some(node) = nodes.get(lamp_node(lamp)) else {
            continue;
        };
        let list = lamps.get_mut(lamp);
        for entity in std::iter::once(node).chain(children.iter_descendants(node)) {
            let Ok(mut handle) = mesh_materials.get_mut(entity) else {
                continue;
            };
            let Some(original) = materials.get(&handle.0).cloned() else {
                continue;
            };
            let copy = materials.add(original);
            handle.0 = copy.clone();
            list.push(copy);
        }
        if list.is_empty() {
            warn!("`{}` has no mesh materials; its glow is disabled", lamp_node(lamp).name());
        }
    }
    commands.insert_resource(lamps);
}

/// Applies [`LightState`] to the lamp materials and spots.
pub fn sync_lamps(
    state: Res<LightState>,
    cfg: Res<LightsConfig>,
    lamps: Option<Res<LampMaterials>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut spots: Query<(&LampSpot, &mut SpotLight)>,
) {
    for lamp in Lamp::ALL {
        let levels = LampLevels::of(lamp, &state, &cfg);
        if let Some(lamps) = &lamps {
            for handle in lamps.get(lamp) {
                if let Some(material) = materials.get_mut(handle) {
                    material.emissive = levels.emissive;
                }
            }
        }
        for (spot, mut light) in &mut spots {
            if spot.0 == lamp {
                light.intensity = levels.spot_intensity;
            }
        }
        debug!("{lamp:?} lamp {}", if state.is_on(lamp) { "on" } else { "off" });
    }
}

/// Keeps the spots at their lamps and the cabin light inside the car.
pub fn follow_lamps(
    cfg: Res<LightsConfig>,
    nodes: Res<CarNodes>,
    globals: Query<&GlobalTransform>,
    cars: Query<&GlobalTransform, With<CarRoot>>,
    mut spots: Query<(&LampSpot, &mut Transform), Without<InteriorLight>>,
    mut interior: Query<&mut Transform, (With<InteriorLight>, Without<LampSpot>)>,
) {
    for (spot, mut transform) in &mut spots {
        let Some(lamp) = nodes.get(lamp_node(spot.0)) else {
            continue;
        };
        let Ok(lamp_global) = globals.get(lamp) else {
            continue;
        };
        let lamp_cfg = cfg.lamp(spot.0);
        let position = lamp_global.translation() + lamp_cfg.offset;
        *transform =
            Transform::from_translation(position).looking_at(position + lamp_cfg.aim, Vec3::Y);
    }

    if let Ok(car) = cars.single()
        && let Ok(mut transform) = interior.single_mut()
    {
        transform.translation = car.transform_point(cfg.interior_position);
    }
}

/// The cabin light is lit only while a seat is occupied.
pub fn sync_interior(
    seat: Res<SeatView>,
    cfg: Res<LightsConfig>,
    mut lights: Query<&mut PointLight, With<InteriorLight>>,
) {
    let intensity = if seat.0.is_some() {
        cfg.interior_intensity
    } else {
        0.0
    };
    for mut light in &mut lights {
        light.intensity = intensity;
    }
}
