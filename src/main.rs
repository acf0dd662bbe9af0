//! Interactive 3D car viewer binary.

mod launch_params;

use bevy::app::AppExit;
use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use car_viewer::anim::AnimConfig;
use car_viewer::{DriveSpeed, ViewerState, car, controls, intro, lights, panels, rig, world};

fn main() {
    let params = launch_params::parse();
    let settings = params.settings();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Car Viewer".into(),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(MeshPickingPlugin)
    .register_type::<ViewerState>()
    .register_type::<DriveSpeed>()
    .register_type::<AnimConfig>()
    .init_state::<ViewerState>()
    .insert_resource(settings.speed)
    .insert_resource(settings.anim);

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.add_plugins(bevy_egui::EguiPlugin::default())
        .add_plugins(car::CarPlugin(settings.car))
        .add_plugins(panels::PanelsPlugin(panels::PanelsConfig::default()))
        .add_plugins(rig::RigPlugin(settings.rig))
        .add_plugins(intro::IntroPlugin(settings.intro))
        .add_plugins(world::WorldPlugin(settings.world))
        .add_plugins(lights::LightsPlugin(lights::LightsConfig::default()))
        .add_plugins(controls::ControlsPlugin(controls::ControlsConfig::default()))
        .add_systems(Update, exit_on_esc)
        .add_systems(Update, toggle_inspector)
        .add_plugins(WorldInspectorPlugin::new().run_if(in_state(ViewerState::Debugging)));

    app.run();
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<ViewerState>>,
    mut next: ResMut<NextState<ViewerState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            ViewerState::Running => ViewerState::Debugging,
            ViewerState::Debugging => ViewerState::Running,
            ViewerState::Intro => return,
        };
        info!("Viewer state: {:?} -> {new_state:?}", state.get());
        next.set(new_state);
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
