//! Doors, frunk and trunk: open/closed state, seat entry, auto-close.
//!
//! [`PanelBoard`] holds one [`PanelState`] per panel and decides what a click
//! does. Entering a seat schedules the matching door to close after a short
//! delay via [`AutoClose`]. Each frame the board's smoothed values are written
//! to the resolved car nodes: hinge angles for doors and frunk, morph weight
//! for the trunk.

mod entities;
mod systems;

pub use entities::{AutoClose, PanelBoard, PanelId, PanelMotion, PanelState, PressOutcome};

use bevy::prelude::*;

use crate::car::CarNodes;
use crate::rig::SeatView;

/// Per-plugin configuration for panel animation.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct PanelsConfig {
    /// Per-tick smoothing factor for every panel.
    pub smoothing: f32,
    /// Side door swing when open (degrees, sign chosen per side).
    pub door_open_angle: f32,
    /// Frunk lid angle when open (degrees).
    pub frunk_open_angle: f32,
    /// Trunk morph influence when open.
    pub trunk_open_influence: f32,
    /// Delay before the entered seat's door closes (seconds).
    pub auto_close_delay: f32,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.12,
            door_open_angle: 90.0,
            frunk_open_angle: -60.0,
            trunk_open_influence: 1.0,
            auto_close_delay: 0.5,
        }
    }
}

/// Panel state machine and per-frame panel animation.
pub struct PanelsPlugin(pub PanelsConfig);

impl Plugin for PanelsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PanelsConfig>()
            .register_type::<PanelId>()
            .insert_resource(self.0.clone())
            .insert_resource(PanelBoard::new(&self.0))
            .init_resource::<AutoClose>()
            .add_systems(
                Update,
                (
                    systems::watch_seat.run_if(resource_changed::<SeatView>),
                    systems::fire_auto_close,
                    systems::animate_panels.run_if(resource_exists::<CarNodes>),
                )
                    .chain(),
            );
    }
}
