//! Hotspot dispatch: map a pressed scene node to a panel and act on it.
//!
//! Panel nodes carry a [`Hotspot`] component and a press observer, installed
//! when the car scene is resolved. A press on any mesh beneath a panel node
//! walks up the parent chain to the nearest hotspot, asks the [`PanelBoard`]
//! what the click means, and forwards seat requests to the camera rig.

use bevy::picking::events::{Pointer, Press};
use bevy::picking::pointer::PointerButton;
use bevy::prelude::*;

use crate::car::Hotspot;
use crate::panels::{PanelBoard, PanelId, PressOutcome};
use crate::rig::{SeatRequest, SeatView};

/// Walks from `start` up through `parent_of` until `hotspot_of` matches.
///
/// Returns `None` if no node on the chain is a hotspot.
pub fn resolve_hotspot(
    start: Entity,
    parent_of: impl Fn(Entity) -> Option<Entity>,
    hotspot_of: impl Fn(Entity) -> Option<PanelId>,
) -> Option<PanelId> {
    let mut current = Some(start);
    while let Some(entity) = current {
        if let Some(panel) = hotspot_of(entity) {
            return Some(panel);
        }
        current = parent_of(entity);
    }
    None
}

/// What a press on `panel` does while the viewer occupies `seat`.
///
/// Updates the board and returns the seat request to send, if any.
pub fn dispatch_press(
    panel: PanelId,
    seat: SeatView,
    board: &mut PanelBoard,
) -> Option<SeatRequest> {
    match board.press(panel, seat.0) {
        PressOutcome::EnterSeat(requested) => {
            debug!("{panel:?} pressed: requesting {requested}");
            Some(SeatRequest(Some(requested)))
        }
        outcome => {
            debug!("{panel:?} pressed: {outcome:?}");
            None
        }
    }
}

/// Observer on every hotspot node: dispatches a primary-button press.
///
/// The walk starts at the mesh actually hit. The innermost hotspot handles the
/// press and stops it from bubbling to enclosing hotspots.
pub fn on_hotspot_pressed(
    mut press: On<Pointer<Press>>,
    parents: Query<&ChildOf>,
    hotspots: Query<&Hotspot>,
    seat: Res<SeatView>,
    mut board: ResMut<PanelBoard>,
    mut requests: MessageWriter<SeatRequest>,
) {
    if press.button != PointerButton::Primary {
        return;
    }
    let Some(panel) = resolve_hotspot(
        press.original_event_target(),
        |e| parents.get(e).ok().map(ChildOf::parent),
        |e| hotspots.get(e).ok().map(|h| h.0),
    ) else {
        return;
    };
    press.propagate(false);

    if let Some(request) = dispatch_press(panel, *seat, &mut board) {
        requests.write(request);
    }
}
