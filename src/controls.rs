//! On-screen controls: speed, lamp switches, leaving the car.
//!
//! The panel only writes plain values: [`DriveSpeed`], [`LightState`] and
//! [`SeatRequest`]. [`PointerOverUi`] is refreshed every frame so camera input
//! systems can ignore drags on the panel without touching egui.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::DriveSpeed;
use crate::lights::{Lamp, LightState};
use crate::rig::{SeatRequest, SeatView};

/// Per-plugin configuration for the controls panel.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct ControlsConfig {
    /// Slider increment.
    pub speed_step: f64,
    /// Panel anchor offset from the top-left corner.
    pub position: Vec2,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            speed_step: 0.1,
            position: Vec2::new(12.0, 12.0),
        }
    }
}

/// Whether the pointer is over an egui area, as of the start of the frame.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerOverUi(pub bool);

/// Controls panel drawn with egui.
pub struct ControlsPlugin(pub ControlsConfig);

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ControlsConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<PointerOverUi>()
            .add_systems(PreUpdate, track_pointer)
            .add_systems(EguiPrimaryContextPass, controls_ui);
    }
}

/// Whether the pointer is over an egui area. `false` if egui is not ready.
pub fn pointer_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.is_pointer_over_area() || ctx.wants_pointer_input())
}

fn track_pointer(mut contexts: EguiContexts, mut over: ResMut<PointerOverUi>) {
    let now = pointer_over_ui(&mut contexts);
    if over.0 != now {
        over.0 = now;
    }
}

fn switch_label(name: &str, on: bool) -> String {
    format!("{name}: {}", if on { "ON" } else { "OFF" })
}

fn controls_ui(
    mut contexts: EguiContexts,
    cfg: Res<ControlsConfig>,
    seat: Res<SeatView>,
    mut speed: ResMut<DriveSpeed>,
    mut lights: ResMut<LightState>,
    mut requests: MessageWriter<SeatRequest>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let mut value = speed.value;
    let mut head = lights.headlights_on;
    let mut rear = lights.rear_lights_on;
    let mut exit = false;

    egui::Window::new("Controls")
        .default_pos([cfg.position.x, cfg.position.y])
        .resizable(false)
        .show(ctx, |ui| {
            ui.add(
                egui::Slider::new(&mut value, 0.0..=speed.max)
                    .step_by(cfg.speed_step)
                    .text("Speed"),
            );
            ui.horizontal(|ui| {
                if ui.button(switch_label("Front", head)).clicked() {
                    head = !head;
                }
                if ui.button(switch_label("Rear", rear)).clicked() {
                    rear = !rear;
                }
            });
            ui.label(format!(
                "Seat: {}",
                seat.0.map_or_else(|| "outside".to_string(), |s| s.to_string())
            ));
            if seat.0.is_some() && ui.button("Exit Car").clicked() {
                exit = true;
            }
        });

    // Write back only what changed.
    if value != speed.value {
        speed.value = value.clamp(0.0, speed.max);
    }
    if head != lights.headlights_on {
        lights.set(Lamp::Head, head);
    }
    if rear != lights.rear_lights_on {
        lights.set(Lamp::Rear, rear);
    }
    if exit {
        requests.write(SeatRequest(None));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_labels_show_state() {
        assert_eq!(switch_label("Front", true), "Front: ON");
        assert_eq!(switch_label("Rear", false), "Rear: OFF");
    }
}
