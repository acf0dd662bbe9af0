use std::time::Duration;

use bevy::prelude::*;

use super::PanelsConfig;
use crate::anim::{AnimConfig, Smoothed};
use crate::car::CarNode;
use crate::rig::Seat;

/// Openable parts of the car.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum PanelId {
    /// Driver's door.
    LeftFrontDoor,
    /// Passenger's door.
    RightFrontDoor,
    /// Rear left door.
    LeftRearDoor,
    /// Rear right door.
    RightRearDoor,
    /// Front storage lid.
    Frunk,
    /// Rear storage lid.
    Trunk,
}

/// How a panel's value is applied to its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelMotion {
    /// Angle about the node's local Y axis (side doors).
    HingeY,
    /// Angle about the node's local X axis (frunk lid).
    HingeX,
    /// Influence of the first morph target (trunk).
    Morph,
}

impl PanelId {
    /// Every panel.
    pub const ALL: [PanelId; 6] = [
        PanelId::LeftFrontDoor,
        PanelId::RightFrontDoor,
        PanelId::LeftRearDoor,
        PanelId::RightRearDoor,
        PanelId::Frunk,
        PanelId::Trunk,
    ];

    fn index(self) -> usize {
        match self {
            PanelId::LeftFrontDoor => 0,
            PanelId::RightFrontDoor => 1,
            PanelId::LeftRearDoor => 2,
            PanelId::RightRearDoor => 3,
            PanelId::Frunk => 4,
            PanelId::Trunk => 5,
        }
    }

    /// Model node this panel animates.
    pub fn node(self) -> CarNode {
        match self {
            PanelId::LeftFrontDoor => CarNode::LeftFrontDoor,
            PanelId::RightFrontDoor => CarNode::RightFrontDoor,
            PanelId::LeftRearDoor => CarNode::LeftRearDoor,
            PanelId::RightRearDoor => CarNode::RightRearDoor,
            PanelId::Frunk => CarNode::Frunk,
            PanelId::Trunk => CarNode::Trunk,
        }
    }

    /// Seat reached through this panel; `None` for frunk and trunk.
    pub fn seat(self) -> Option<Seat> {
        match self {
            PanelId::LeftFrontDoor => Some(Seat::Driver),
            PanelId::RightFrontDoor => Some(Seat::Passenger),
            PanelId::LeftRearDoor => Some(Seat::RearLeft),
            PanelId::RightRearDoor => Some(Seat::RearRight),
            PanelId::Frunk | PanelId::Trunk => None,
        }
    }

    /// Door next to `seat`.
    pub fn door_for(seat: Seat) -> PanelId {
        match seat {
            Seat::Driver => PanelId::LeftFrontDoor,
            Seat::Passenger => PanelId::RightFrontDoor,
            Seat::RearLeft => PanelId::LeftRearDoor,
            Seat::RearRight => PanelId::RightRearDoor,
        }
    }

    /// How the panel's value drives its node.
    pub fn motion(self) -> PanelMotion {
        match self {
            PanelId::Frunk => PanelMotion::HingeX,
            PanelId::Trunk => PanelMotion::Morph,
            _ => PanelMotion::HingeY,
        }
    }

    /// Target value when open. Left doors swing to `-angle`, right doors to `+angle`.
    pub fn open_value(self, cfg: &PanelsConfig) -> f32 {
        let door = cfg.door_open_angle.to_radians();
        match self {
            PanelId::LeftFrontDoor | PanelId::LeftRearDoor => -door,
            PanelId::RightFrontDoor | PanelId::RightRearDoor => door,
            PanelId::Frunk => cfg.frunk_open_angle.to_radians(),
            PanelId::Trunk => cfg.trunk_open_influence,
        }
    }
}

/// Open flag plus the animated value (angle or morph influence).
///
/// `is_open` holds exactly when the target is the panel's open value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelState {
    /// Whether the panel was last told to open.
    pub is_open: bool,
    /// Current and target angle/influence.
    pub motion: Smoothed<f32>,
}

/// What a press on a panel did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    /// Panel started opening.
    Opened,
    /// Panel started closing.
    Closed,
    /// Door left as is; the viewer should move into this seat.
    EnterSeat(Seat),
}

/// Open/closed state of every panel.
#[derive(Resource, Clone, Debug)]
pub struct PanelBoard {
    panels: [PanelState; 6],
    open_values: [f32; 6],
}

impl PanelBoard {
    /// All panels closed and at rest.
    pub fn new(cfg: &PanelsConfig) -> Self {
        let closed = PanelState {
            is_open: false,
            motion: Smoothed::at(0.0, cfg.smoothing),
        };
        Self {
            panels: [closed; 6],
            open_values: PanelId::ALL.map(|id| id.open_value(cfg)),
        }
    }

    /// Current state of `id`.
    pub fn get(&self, id: PanelId) -> &PanelState {
        &self.panels[id.index()]
    }

    fn set_open(&mut self, id: PanelId, open: bool) {
        let value = if open { self.open_values[id.index()] } else { 0.0 };
        let panel = &mut self.panels[id.index()];
        panel.is_open = open;
        panel.motion.target = value;
    }

    /// Handles a click on `id` while the viewer occupies `seat`.
    ///
    /// Doors: when seated, request that door's seat; when outside and the door
    /// is open, request its seat; otherwise open it. Frunk and trunk toggle.
    pub fn press(&mut self, id: PanelId, seat: Option<Seat>) -> PressOutcome {
        let Some(door_seat) = id.seat() else {
            let open = !self.get(id).is_open;
            self.set_open(id, open);
            return if open {
                PressOutcome::Opened
            } else {
                PressOutcome::Closed
            };
        };

        if seat.is_some() || self.get(id).is_open {
            return PressOutcome::EnterSeat(door_seat);
        }
        self.set_open(id, true);
        PressOutcome::Opened
    }

    /// Closes `id` unconditionally. Returns `true` if it was open.
    pub fn force_close(&mut self, id: PanelId) -> bool {
        let was_open = self.get(id).is_open;
        self.set_open(id, false);
        was_open
    }

    /// Advances every panel's animation by a frame of `dt` seconds.
    pub fn step(&mut self, cfg: &AnimConfig, dt: f32) {
        for panel in &mut self.panels {
            panel.motion.step(cfg, dt);
        }
    }
}

/// Pending automatic door close after entering a seat.
///
/// At most one close is pending; scheduling replaces it and leaving the car
/// cancels it.
#[derive(Resource, Default, Debug, Clone)]
pub struct AutoClose {
    pending: Option<(PanelId, Duration)>,
}

impl AutoClose {
    /// Closes `door` after `delay`, superseding any pending close.
    pub fn schedule(&mut self, door: PanelId, delay: Duration) {
        self.pending = Some((door, delay));
    }

    /// Drops any pending close.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Door waiting to be closed, if any.
    pub fn pending(&self) -> Option<PanelId> {
        self.pending.map(|(door, _)| door)
    }

    /// Advances by `dt`; returns the door once, when its delay runs out.
    pub fn tick(&mut self, dt: Duration) -> Option<PanelId> {
        let (door, remaining) = self.pending.as_mut()?;
        *remaining = remaining.saturating_sub(dt);
        if remaining.is_zero() {
            let door = *door;
            self.pending = None;
            return Some(door);
        }
        None
    }
}
