use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::view::Hdr;

use super::RigConfig;
use super::entities::{LookState, OrbitController, SeatRequest, SeatView, TouchLook, ViewerCamera};
use crate::ViewerState;
use crate::anim::{AnimConfig, Smoothed};
use crate::car::CarRoot;
use crate::controls::PointerOverUi;

/// Spawns the Camera3d entity at home framing with HDR and bloom.
pub fn spawn_camera(mut commands: Commands, cfg: Res<RigConfig>) {
    commands.spawn((
        Name::new("ViewerCamera"),
        Camera3d::default(),
        Hdr,
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: cfg.bloom_intensity,
            composite_mode: BloomCompositeMode::Additive,
            ..Bloom::NATURAL
        },
        Projection::Perspective(PerspectiveProjection {
            fov: cfg.free_fov.to_radians(),
            ..default()
        }),
        Transform::from_translation(cfg.home_position).looking_at(cfg.home_target, Vec3::Y),
        OrbitController::new(cfg.home_position, cfg.home_target),
        ViewerCamera,
    ));
}

/// Sends the configured start seat once, the first time control is handed over.
pub fn enter_start_seat(
    cfg: Res<RigConfig>,
    mut done: Local<bool>,
    mut requests: MessageWriter<SeatRequest>,
) {
    if *done {
        return;
    }
    *done = true;
    if let Some(seat) = cfg.start_seat {
        requests.write(SeatRequest(Some(seat)));
    }
}

/// Applies seat requests: toggles orbit control, resets look, switches FOV.
pub fn apply_seat_requests(
    mut requests: MessageReader<SeatRequest>,
    mut seat: ResMut<SeatView>,
    mut look: ResMut<LookState>,
    mut touch: ResMut<TouchLook>,
    mut cameras: Query<(&mut OrbitController, &mut Transform, &mut Projection), With<ViewerCamera>>,
    cfg: Res<RigConfig>,
) {
    for &SeatRequest(requested) in requests.read() {
        if seat.0 == requested {
            continue;
        }
        info!(
            "Seat: {} -> {}",
            seat.0.map_or("outside", |s| s.key()),
            requested.map_or("outside", |s| s.key())
        );
        seat.0 = requested;

        let Ok((mut orbit, mut transform, mut projection)) = cameras.single_mut() else {
            continue;
        };
        let fov = match requested {
            Some(_) => {
                orbit.enabled = false;
                cfg.seated_fov
            }
            None => {
                look.reset();
                touch.end();
                orbit.enabled = true;
                orbit.reset();
                *transform = Transform::from_translation(orbit.position())
                    .looking_at(orbit.target, Vec3::Y);
                cfg.free_fov
            }
        };
        if let Projection::Perspective(perspective) = &mut *projection {
            perspective.fov = fov.to_radians();
        }
    }
}

/// Accumulates mouse-motion and first-touch deltas into [`LookState`].
///
/// Reads input every frame so motion from outside the car never reaches the
/// look angles; deltas only apply while seated and running.
#[allow(clippy::too_many_arguments)]
pub fn accumulate_look(
    mut mouse_motion: MessageReader<MouseMotion>,
    touches: Res<Touches>,
    seat: Res<SeatView>,
    state: Res<State<ViewerState>>,
    over_ui: Res<PointerOverUi>,
    mut look: ResMut<LookState>,
    mut touch: ResMut<TouchLook>,
    cfg: Res<RigConfig>,
) {
    let mut delta: Vec2 = mouse_motion.read().map(|ev| ev.delta).sum();
    if seat.0.is_none() || *state.get() != ViewerState::Running {
        touch.end();
        return;
    }

    if let Some(first) = touches.iter_just_pressed().next() {
        touch.start(first.position());
    } else if let Some(first) = touches.iter().next() {
        delta += touch.moved(first.position());
    }
    if touches.iter_just_released().next().is_some() {
        touch.end();
    }

    if delta == Vec2::ZERO || over_ui.0 {
        return;
    }
    look.apply_delta(delta, cfg.look_sensitivity, cfg.pitch_limit);
}

/// Blends the camera toward the occupied seat and aims it along the look direction.
pub fn seat_camera(
    time: Res<Time>,
    seat: Res<SeatView>,
    look: Res<LookState>,
    anim: Res<AnimConfig>,
    cfg: Res<RigConfig>,
    cars: Query<&GlobalTransform, With<CarRoot>>,
    mut cameras: Query<&mut Transform, With<ViewerCamera>>,
) {
    let Some(occupied) = seat.0 else { return };
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };

    let anchor = cfg.seats.get(occupied);
    let (target, facing) = match cars.single() {
        Ok(car) => (car.transform_point(anchor), car.rotation()),
        Err(_) => (anchor, Quat::IDENTITY),
    };

    let mut blend = Smoothed {
        current: transform.translation,
        target,
        factor: cfg.seat_blend,
    };
    transform.translation = blend.step(&anim, time.delta_secs());

    let dir = facing * look.direction();
    let eye = transform.translation;
    transform.look_at(eye + dir, Vec3::Y);
}

/// Left-drag orbits, mouse wheel zooms.
pub fn orbit_input(
    buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut scroll: MessageReader<MouseWheel>,
    over_ui: Res<PointerOverUi>,
    mut cameras: Query<&mut OrbitController, With<ViewerCamera>>,
    cfg: Res<RigConfig>,
) {
    let over_ui = over_ui.0;
    let dragging = buttons.pressed(MouseButton::Left) && !over_ui;

    let mut drag = Vec2::ZERO;
    for ev in mouse_motion.read() {
        drag += ev.delta;
    }
    let mut lines = 0.0;
    for ev in scroll.read() {
        lines += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        };
    }

    let Ok(mut orbit) = cameras.single_mut() else {
        return;
    };
    if !orbit.enabled {
        return;
    }
    if dragging && drag != Vec2::ZERO {
        orbit.rotate(
            -drag.x * cfg.orbit_sensitivity,
            drag.y * cfg.orbit_sensitivity,
            cfg.orbit_pitch_limit,
        );
    }
    if lines != 0.0 && !over_ui {
        let factor = (1.0 - cfg.zoom_step).powf(lines);
        orbit.zoom(factor, cfg.min_distance, cfg.max_distance);
    }
}

/// Places the camera from orbit parameters while orbit control is enabled.
#[allow(clippy::type_complexity)]
pub fn apply_orbit(
    mut cameras: Query<(&OrbitController, &mut Transform), (With<ViewerCamera>, Changed<OrbitController>)>,
) {
    for (orbit, mut transform) in &mut cameras {
        if !orbit.enabled {
            continue;
        }
        *transform = Transform::from_translation(orbit.position()).looking_at(orbit.target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::rig::{Seat, SeatPlugin};

    fn look_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_state(ViewerState::Running)
            .insert_resource(AnimConfig::default())
            .insert_resource(RigConfig::default())
            .init_resource::<Touches>()
            .init_resource::<PointerOverUi>()
            .add_message::<MouseMotion>()
            .add_plugins(SeatPlugin)
            .add_systems(
                Update,
                accumulate_look.after(apply_seat_requests).before(seat_camera),
            );
        let home = RigConfig::default().home_position;
        app.world_mut().spawn((
            ViewerCamera,
            OrbitController::new(home, Vec3::ZERO),
            Transform::from_translation(home),
            Projection::default(),
        ));
        app.update();
        app
    }

    fn move_mouse(app: &mut App, x: f32) {
        app.world_mut().write_message(MouseMotion {
            delta: Vec2::new(x, 0.0),
        });
    }

    fn look(app: &App) -> LookState {
        *app.world().resource::<LookState>()
    }

    #[test]
    fn motion_from_outside_does_not_carry_into_the_seat() {
        let mut app = look_app();
        move_mouse(&mut app, 200.0);
        app.update();

        app.world_mut().write_message(SeatRequest(Some(Seat::Driver)));
        app.update();
        assert_eq!(look(&app), LookState::default());

        move_mouse(&mut app, 100.0);
        app.update();
        let sensitivity = RigConfig::default().look_sensitivity;
        assert!((look(&app).yaw + 100.0 * sensitivity).abs() < 1e-6);
    }

    #[test]
    fn motion_over_the_controls_is_ignored() {
        let mut app = look_app();
        app.world_mut().write_message(SeatRequest(Some(Seat::Passenger)));
        app.update();

        app.world_mut().insert_resource(PointerOverUi(true));
        move_mouse(&mut app, 50.0);
        app.update();
        assert_eq!(look(&app), LookState::default());
    }
}
