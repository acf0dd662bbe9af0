use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::math::Affine2;
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::WorldConfig;
use super::entities::{Building, BuildingMeshes, Conveyor, ScrollingSurface, Side, Slot, WorldRng};
use crate::DriveSpeed;

// ── Startup ─────────────────────────────────────────────────────────

/// Spawns the terrain and road planes with repeat-sampled textures.
pub fn spawn_ground(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<WorldConfig>,
) {
    for (name, surface) in [("Terrain", &cfg.terrain), ("Road", &cfg.road)] {
        let texture: Handle<Image> = asset_server.load_with_settings(
            surface.texture.clone(),
            |settings: &mut ImageLoaderSettings| {
                settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
                    address_mode_u: ImageAddressMode::Repeat,
                    address_mode_v: ImageAddressMode::Repeat,
                    ..default()
                });
            },
        );
        let material = materials.add(StandardMaterial {
            base_color_texture: Some(texture),
            perceptual_roughness: 1.0,
            uv_transform: uv_transform(surface.repeat, 0.0),
            ..default()
        });
        commands.spawn((
            Name::new(name),
            Mesh3d(meshes.add(Plane3d::default().mesh().size(surface.size.x, surface.size.y))),
            MeshMaterial3d(material),
            Transform::from_xyz(0.0, surface.height, 0.0),
            ScrollingSurface {
                repeat: surface.repeat,
                rate: surface.scroll_rate,
                offset: 0.0,
            },
        ));
    }
}

/// Lays out the conveyor and spawns one building per row and side.
pub fn spawn_buildings(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<WorldConfig>,
) {
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let conveyor = Conveyor::new(&cfg, &mut rng);

    let variant_meshes: Vec<Handle<Mesh>> = cfg
        .variants
        .iter()
        .map(|size| meshes.add(Cuboid::new(size.x, size.y, size.z)))
        .collect();
    let Some(first_mesh) = variant_meshes.first().cloned() else {
        warn!("No building variants configured; roadside left empty");
        return;
    };
    let material = materials.add(StandardMaterial {
        base_color: cfg.building_color,
        perceptual_roughness: 0.9,
        ..default()
    });

    let parent = commands
        .spawn((Name::new("Buildings"), Transform::default(), Visibility::default()))
        .id();
    for (i, slot) in conveyor.slots().iter().enumerate() {
        for side in Side::BOTH {
            let mesh = variant_meshes.get(slot.variant).cloned().unwrap_or_else(|| first_mesh.clone());
            commands.spawn((
                Name::new(format!("Building {i} {side:?}")),
                Building { slot: i, side },
                Mesh3d(mesh),
                MeshMaterial3d(material.clone()),
                building_transform(&cfg, slot, side),
                ChildOf(parent),
            ));
        }
    }

    info!(
        "Spawned {} buildings over {:.0} units",
        conveyor.slots().len() * 2,
        conveyor.span()
    );
    commands.insert_resource(conveyor);
    commands.insert_resource(WorldRng(rng));
    commands.insert_resource(BuildingMeshes(variant_meshes));
}

// ── Per-frame ───────────────────────────────────────────────────────

/// Moves the conveyor by this frame's travel distance.
pub fn advance_conveyor(
    time: Res<Time>,
    speed: Res<DriveSpeed>,
    cfg: Res<WorldConfig>,
    mut conveyor: ResMut<Conveyor>,
    mut rng: ResMut<WorldRng>,
) {
    let distance = speed.value.max(0.0) * cfg.speed_scale * time.delta_secs();
    let recycled = conveyor.advance(distance, &cfg, &mut rng.0);
    if recycled > 0 {
        debug!("Recycled {recycled} building rows");
    }
}

/// Writes conveyor rows to the building entities.
pub fn place_buildings(
    cfg: Res<WorldConfig>,
    conveyor: Res<Conveyor>,
    variant_meshes: Res<BuildingMeshes>,
    mut buildings: Query<(&Building, &mut Transform, &mut Mesh3d)>,
) {
    for (building, mut transform, mut mesh) in &mut buildings {
        let Some(slot) = conveyor.slots().get(building.slot) else {
            continue;
        };
        *transform = building_transform(&cfg, slot, building.side);
        if let Some(handle) = variant_meshes.0.get(slot.variant)
            && mesh.0 != *handle
        {
            mesh.0 = handle.clone();
        }
    }
}

/// Scrolls each ground texture against the direction of travel.
pub fn scroll_ground(
    time: Res<Time>,
    speed: Res<DriveSpeed>,
    mut surfaces: Query<(&mut ScrollingSurface, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if speed.value <= 0.0 {
        return;
    }
    for (mut surface, material) in &mut surfaces {
        surface.advance(speed.value, time.delta_secs());
        if let Some(material) = materials.get_mut(&material.0) {
            material.uv_transform = uv_transform(surface.repeat, surface.offset);
        }
    }
}

fn uv_transform(repeat: Vec2, offset: f32) -> Affine2 {
    Affine2::from_scale_angle_translation(repeat, 0.0, Vec2::new(0.0, offset))
}

fn building_transform(cfg: &WorldConfig, slot: &Slot, side: Side) -> Transform {
    let size = cfg.variants.get(slot.variant).copied().unwrap_or(Vec3::ONE);
    let i = side.index();
    Transform {
        translation: Vec3::new(
            side.sign() * cfg.side_offset + slot.lateral[i],
            size.y * slot.scale * 0.5,
            slot.z,
        ),
        rotation: Quat::from_rotation_y(slot.yaw[i]),
        scale: Vec3::splat(slot.scale),
    }
}
