use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::mesh::morph::MorphWeights;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use super::CarConfig;
use super::entities::{CarNode, CarNodes, CarRoot, CarUnavailable, Hotspot, RestPose};
use crate::DriveSpeed;
use crate::anim::AnimConfig;
use crate::hotspot;

/// Spawns the car scene root; node resolution happens when it is ready.
pub fn spawn_car(mut commands: Commands, asset_server: Res<AssetServer>, cfg: Res<CarConfig>) {
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(cfg.model_path.clone()));
    commands
        .spawn((
            Name::new("Car"),
            CarRoot,
            SceneRoot(scene),
            Transform::from_translation(cfg.position),
        ))
        .observe(resolve_car_nodes);
    info!("Loading car model: {}", cfg.model_path);
}

/// Gives up on the car when its scene fails to load.
pub fn watch_car_load(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    cfg: Res<CarConfig>,
    roots: Query<&SceneRoot, With<CarRoot>>,
) {
    let Ok(scene) = roots.single() else {
        return;
    };
    if let LoadState::Failed(err) = asset_server.load_state(&scene.0) {
        warn!("Car model {} failed to load: {err}", cfg.model_path);
        commands.insert_resource(CarUnavailable);
    }
}

/// Builds [`CarNodes`] in one pass over the ready scene and tags hotspots.
///
/// Hinged panels get a [`RestPose`] and every panel node gets a [`Hotspot`]
/// plus the press observer. Nothing re-traverses the hierarchy afterwards.
pub fn resolve_car_nodes(
    ready: On<SceneInstanceReady>,
    mut commands: Commands,
    children: Query<&Children>,
    names: Query<&Name>,
    transforms: Query<&Transform>,
    morphs: Query<(), With<MorphWeights>>,
) {
    let root = ready.event_target();
    let named = std::iter::once(root)
        .chain(children.iter_descendants(root))
        .filter_map(|e| names.get(e).ok().map(|name| (e, name.as_str())));
    let (mut nodes, duplicates) = CarNodes::resolve(named);

    for node in duplicates {
        warn!("Car model has more than one `{}` node; using the first", node.name());
    }
    for node in nodes.missing() {
        warn!("Car model has no `{}` node; it will be skipped", node.name());
    }

    for node in CarNode::ALL {
        let (Some(entity), Some(panel)) = (nodes.get(node), node.panel()) else {
            continue;
        };
        let rest = transforms.get(entity).map_or(Quat::IDENTITY, |t| t.rotation);
        commands
            .entity(entity)
            .insert((Hotspot(panel), RestPose(rest)))
            .observe(hotspot::on_hotspot_pressed);
    }

    nodes.trunk_morph = nodes.get(CarNode::Trunk).and_then(|trunk| {
        std::iter::once(trunk)
            .chain(children.iter_descendants(trunk))
            .find(|&e| morphs.contains(e))
    });
    if nodes.get(CarNode::Trunk).is_some() && nodes.trunk_morph.is_none() {
        warn!("`Trunk` node has no morph targets; trunk animation disabled");
    }

    info!(
        "Car scene ready: {}/{} named nodes resolved",
        nodes.len(),
        CarNode::ALL.len()
    );
    commands.insert_resource(nodes);
}

/// Rolls the tires about their axle at a rate proportional to speed.
pub fn spin_wheels(
    time: Res<Time>,
    speed: Res<DriveSpeed>,
    anim: Res<AnimConfig>,
    cfg: Res<CarConfig>,
    nodes: Res<CarNodes>,
    mut transforms: Query<&mut Transform>,
) {
    if speed.value <= 0.0 {
        return;
    }
    let angle = speed.value * cfg.wheel_spin * anim.ticks(time.delta_secs());
    for tire in CarNode::TIRES {
        if let Some(entity) = nodes.get(tire)
            && let Ok(mut transform) = transforms.get_mut(entity)
        {
            transform.rotate_x(-angle);
        }
    }
}
