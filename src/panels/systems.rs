use std::time::Duration;

use bevy::mesh::morph::MorphWeights;
use bevy::prelude::*;

use super::PanelsConfig;
use super::entities::{AutoClose, PanelBoard, PanelId, PanelMotion};
use crate::anim::AnimConfig;
use crate::car::{CarNodes, RestPose};
use crate::rig::SeatView;

/// Schedules the entered seat's door to close; leaving the car cancels it.
pub fn watch_seat(seat: Res<SeatView>, mut auto: ResMut<AutoClose>, cfg: Res<PanelsConfig>) {
    match seat.0 {
        Some(seat) => {
            let door = PanelId::door_for(seat);
            auto.schedule(door, Duration::from_secs_f32(cfg.auto_close_delay));
            debug!("Auto-close scheduled for {door:?}");
        }
        None => auto.cancel(),
    }
}

/// Closes the pending door once its delay has elapsed.
pub fn fire_auto_close(time: Res<Time>, mut auto: ResMut<AutoClose>, mut board: ResMut<PanelBoard>) {
    if auto.pending().is_none() {
        return;
    }
    if let Some(door) = auto.tick(time.delta())
        && board.force_close(door)
    {
        info!("Auto-closed {door:?}");
    }
}

/// Steps panel smoothing and writes the values to the car nodes.
pub fn animate_panels(
    time: Res<Time>,
    anim: Res<AnimConfig>,
    nodes: Res<CarNodes>,
    mut board: ResMut<PanelBoard>,
    mut hinges: Query<(&mut Transform, &RestPose)>,
    mut morphs: Query<&mut MorphWeights>,
) {
    board.step(&anim, time.delta_secs());

    for id in PanelId::ALL {
        let value = board.get(id).motion.current;
        match id.motion() {
            PanelMotion::HingeY | PanelMotion::HingeX => {
                let Some(entity) = nodes.get(id.node()) else {
                    continue;
                };
                let Ok((mut transform, rest)) = hinges.get_mut(entity) else {
                    continue;
                };
                let hinge = if id.motion() == PanelMotion::HingeY {
                    Quat::from_rotation_y(value)
                } else {
                    Quat::from_rotation_x(value)
                };
                transform.rotation = rest.0 * hinge;
            }
            PanelMotion::Morph => {
                if let Some(entity) = nodes.trunk_morph
                    && let Ok(mut weights) = morphs.get_mut(entity)
                    && let Some(first) = weights.weights_mut().first_mut()
                {
                    *first = value;
                }
            }
        }
    }
}
