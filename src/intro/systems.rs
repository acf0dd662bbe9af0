use bevy::prelude::*;

use super::IntroConfig;
use super::entities::{IntroSequence, IntroStep, fly_in_position};
use crate::ViewerState;
use crate::car::{CarNodes, CarRoot, CarUnavailable};
use crate::rig::{OrbitController, SeatView, ViewerCamera};

#[allow(clippy::too_many_arguments)]
pub fn run_intro(
    time: Res<Time>,
    cfg: Res<IntroConfig>,
    nodes: Option<Res<CarNodes>>,
    unavailable: Option<Res<CarUnavailable>>,
    seat: Res<SeatView>,
    mut intro: ResMut<IntroSequence>,
    mut next: ResMut<NextState<ViewerState>>,
    cars: Query<&GlobalTransform, With<CarRoot>>,
    mut cameras: Query<(&mut Transform, &mut OrbitController), With<ViewerCamera>>,
) {
    let Ok((mut transform, mut orbit)) = cameras.single_mut() else {
        return;
    };
    let car = cars.single().map_or(Vec3::ZERO, |t| t.translation());

    if !cfg.enabled {
        if intro.finish() {
            info!("Intro skipped");
        }
        hand_over(car, &transform, &mut orbit, &seat, &mut next);
        return;
    }
    // The delay starts once the scene is ready.
    if nodes.is_none() {
        let timed_out = intro.wait_for_scene(time.delta_secs(), cfg.scene_timeout);
        if unavailable.is_some() || timed_out {
            if intro.finish() {
                warn!("Car scene not available; skipping intro");
            }
            hand_over(car, &transform, &mut orbit, &seat, &mut next);
        }
        return;
    }

    match intro.advance(time.delta_secs(), &cfg) {
        IntroStep::Waiting | IntroStep::Idle => {}
        IntroStep::Flying(t) => {
            if orbit.enabled {
                info!("Intro started");
                orbit.enabled = false;
            }
            *transform = Transform::from_translation(fly_in_position(car, &cfg, t))
                .looking_at(car, Vec3::Y);
        }
        IntroStep::Finished => {
            *transform = Transform::from_translation(fly_in_position(car, &cfg, 1.0))
                .looking_at(car, Vec3::Y);
            info!("Intro finished");
            hand_over(car, &transform, &mut orbit, &seat, &mut next);
        }
    }
}

/// Orbit control takes over around the car from wherever the camera is.
fn hand_over(
    car: Vec3,
    transform: &Transform,
    orbit: &mut OrbitController,
    seat: &SeatView,
    next: &mut NextState<ViewerState>,
) {
    orbit.target = car;
    orbit.sync_from(transform.translation);
    orbit.enabled = seat.0.is_none();
    next.set(ViewerState::Running);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::intro::{IntroPhase, IntroPlugin};

    const FRAME: Duration = Duration::from_millis(100);
    const HOME: Vec3 = Vec3::new(3.0, 1.5, 5.0);

    fn intro_app(cfg: IntroConfig) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
            .init_state::<ViewerState>()
            .init_resource::<SeatView>()
            .add_plugins(IntroPlugin(cfg));
        app.world_mut().spawn((
            ViewerCamera,
            Transform::from_translation(HOME),
            OrbitController::new(HOME, Vec3::Y),
        ));
        app
    }

    fn state(app: &App) -> ViewerState {
        app.world().resource::<State<ViewerState>>().get().clone()
    }

    fn orbit(app: &mut App) -> OrbitController {
        let mut query = app.world_mut().query::<&OrbitController>();
        query.single(app.world()).unwrap().clone()
    }

    #[test]
    fn failed_car_load_hands_over_without_flying() {
        let mut app = intro_app(IntroConfig::default());
        app.update();
        assert_eq!(state(&app), ViewerState::Intro);

        app.world_mut().insert_resource(CarUnavailable);
        app.update();
        app.update();

        assert_eq!(state(&app), ViewerState::Running);
        assert_eq!(app.world().resource::<IntroSequence>().phase(), IntroPhase::Done);
        let orbit = orbit(&mut app);
        assert!(orbit.enabled);
        assert_eq!(orbit.target, Vec3::ZERO);
        assert!((orbit.position() - HOME).length() < 1e-4);
    }

    #[test]
    fn missing_scene_times_out() {
        let mut app = intro_app(IntroConfig {
            scene_timeout: 1.0,
            ..default()
        });
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(state(&app), ViewerState::Intro);

        for _ in 0..10 {
            app.update();
        }
        assert_eq!(state(&app), ViewerState::Running);
        assert!(orbit(&mut app).enabled);
    }

    #[test]
    fn seated_start_keeps_orbit_off() {
        let mut app = intro_app(IntroConfig {
            enabled: false,
            ..default()
        });
        app.world_mut().insert_resource(SeatView(Some(crate::rig::Seat::Driver)));
        app.update();
        app.update();
        assert_eq!(state(&app), ViewerState::Running);
        assert!(!orbit(&mut app).enabled);
    }
}
