use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;

use crate::math;

/// A named occupant position inside the car.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Seat {
    /// Front left.
    Driver,
    /// Front right.
    Passenger,
    /// Back left.
    RearLeft,
    /// Back right.
    RearRight,
}

impl Seat {
    /// All seats, front to back, left to right.
    pub const ALL: [Seat; 4] = [
        Seat::Driver,
        Seat::Passenger,
        Seat::RearLeft,
        Seat::RearRight,
    ];

    /// Stable lowercase key, as accepted on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Seat::Driver => "driver",
            Seat::Passenger => "passenger",
            Seat::RearLeft => "rear_left",
            Seat::RearRight => "rear_right",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a seat key does not name one of [`Seat::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeat(pub String);

impl fmt::Display for UnknownSeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown seat `{}` (expected driver, passenger, rear_left or rear_right)",
            self.0
        )
    }
}

impl std::error::Error for UnknownSeat {}

impl FromStr for Seat {
    type Err = UnknownSeat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Seat::ALL
            .into_iter()
            .find(|seat| seat.key() == s)
            .ok_or_else(|| UnknownSeat(s.to_owned()))
    }
}

/// Which seat the viewer occupies; `None` means free orbit outside the car.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct SeatView(pub Option<Seat>);

/// Request to move the viewer into a seat, or out of the car with `None`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatRequest(pub Option<Seat>);

/// Accumulated first-person look angles while seated.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct LookState {
    /// Horizontal angle in radians; unbounded.
    pub yaw: f32,
    /// Vertical angle in radians; clamped to `±pitch_limit`.
    pub pitch: f32,
}

impl LookState {
    /// Applies a pointer delta: moving right turns left, moving down looks down.
    pub fn apply_delta(&mut self, delta: Vec2, sensitivity: f32, pitch_limit: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = math::clamp_pitch(self.pitch, -delta.y * sensitivity, pitch_limit);
    }

    /// Back to looking straight ahead.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Unit look direction in car space.
    pub fn direction(&self) -> Vec3 {
        math::look_direction(self.yaw, self.pitch)
    }
}

/// Previous sample of the first touch, used to turn touch positions into deltas.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct TouchLook {
    prev: Option<Vec2>,
}

impl TouchLook {
    /// A touch began at `pos`.
    pub fn start(&mut self, pos: Vec2) {
        self.prev = Some(pos);
    }

    /// The first touch moved to `pos`; returns movement since the last sample.
    pub fn moved(&mut self, pos: Vec2) -> Vec2 {
        let delta = self.prev.map_or(Vec2::ZERO, |prev| pos - prev);
        self.prev = Some(pos);
        delta
    }

    /// All touches lifted.
    pub fn end(&mut self) {
        self.prev = None;
    }
}

/// Marker for the single viewer camera.
#[derive(Component, Reflect)]
pub struct ViewerCamera;

/// Orbit control around a target point. Owns the camera while enabled.
#[derive(Component, Debug, Clone, Reflect)]
pub struct OrbitController {
    /// When `false` another system drives the camera.
    pub enabled: bool,
    /// Point orbited around.
    pub target: Vec3,
    /// Horizontal angle around the target (radians).
    pub yaw: f32,
    /// Elevation above the target's horizontal plane (radians).
    pub pitch: f32,
    /// Distance from the target.
    pub distance: f32,
    home_position: Vec3,
    home_target: Vec3,
}

impl OrbitController {
    /// Controller framing `target` from `position`, remembered as home framing.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut orbit = Self {
            enabled: true,
            target,
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.0,
            home_position: position,
            home_target: target,
        };
        orbit.sync_from(position);
        orbit
    }

    /// Re-derives angles and distance so the current camera `position` is kept.
    pub fn sync_from(&mut self, position: Vec3) {
        let offset = position - self.target;
        let (yaw, pitch) = math::yaw_pitch_of(offset);
        self.yaw = yaw;
        self.pitch = pitch;
        self.distance = offset.length().max(f32::EPSILON);
    }

    /// Returns to home framing.
    pub fn reset(&mut self) {
        self.target = self.home_target;
        self.sync_from(self.home_position);
    }

    /// Rotates by `delta_yaw`/`delta_pitch`, keeping pitch off the poles.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32, pitch_limit: f32) {
        self.yaw += delta_yaw;
        self.pitch = math::clamp_pitch(self.pitch, delta_pitch, pitch_limit);
    }

    /// Scales the distance, clamped to `[min, max]`.
    pub fn zoom(&mut self, factor: f32, min: f32, max: f32) {
        self.distance = (self.distance * factor).clamp(min, max);
    }

    /// Camera position implied by the current parameters.
    pub fn position(&self) -> Vec3 {
        self.target + math::look_direction(self.yaw, self.pitch) * self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn seat_keys_roundtrip() {
        for seat in Seat::ALL {
            assert_eq!(seat.key().parse::<Seat>(), Ok(seat));
        }
    }

    #[test]
    fn unknown_seat_is_rejected() {
        let err = "trunk".parse::<Seat>().unwrap_err();
        assert_eq!(err, UnknownSeat("trunk".into()));
        assert!(err.to_string().contains("trunk"));
    }

    #[test]
    fn yaw_is_unbounded_and_pitch_clamped() {
        let mut look = LookState::default();
        for _ in 0..10_000 {
            look.apply_delta(Vec2::new(-50.0, -80.0), 0.002, FRAC_PI_4);
            assert!(look.pitch <= FRAC_PI_4 && look.pitch >= -FRAC_PI_4);
        }
        // 10k * 50 * 0.002 = 1000 rad, far past a full turn
        assert!((look.yaw - 1000.0).abs() < 0.5);
        assert_eq!(look.pitch, FRAC_PI_4);

        for _ in 0..10_000 {
            look.apply_delta(Vec2::new(0.0, 80.0), 0.002, FRAC_PI_4);
        }
        assert_eq!(look.pitch, -FRAC_PI_4);
    }

    #[test]
    fn pointer_delta_signs() {
        let mut look = LookState::default();
        look.apply_delta(Vec2::new(10.0, 10.0), 0.002, FRAC_PI_4);
        assert!((look.yaw + 0.02).abs() < 1e-6);
        assert!((look.pitch + 0.02).abs() < 1e-6);
    }

    #[test]
    fn reset_returns_to_forward() {
        let mut look = LookState {
            yaw: 3.0,
            pitch: 0.4,
        };
        look.reset();
        assert_eq!(look, LookState::default());
        assert!((look.direction() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn touch_deltas_follow_samples() {
        let mut touch = TouchLook::default();
        touch.start(Vec2::new(100.0, 100.0));
        assert_eq!(touch.moved(Vec2::new(110.0, 95.0)), Vec2::new(10.0, -5.0));
        assert_eq!(touch.moved(Vec2::new(111.0, 95.0)), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn touch_end_resets_reference() {
        let mut touch = TouchLook::default();
        touch.start(Vec2::new(100.0, 100.0));
        touch.end();
        // No reference after lifting: first move produces no jump
        assert_eq!(touch.moved(Vec2::new(300.0, 300.0)), Vec2::ZERO);
        assert_eq!(touch.moved(Vec2::new(305.0, 300.0)), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn orbit_preserves_home_position() {
        let home = Vec3::new(3.0, 1.5, 5.0);
        let orbit = OrbitController::new(home, Vec3::ZERO);
        assert!((orbit.position() - home).length() < 1e-4);
    }

    #[test]
    fn orbit_reset_restores_home_framing() {
        let home = Vec3::new(3.0, 1.5, 5.0);
        let mut orbit = OrbitController::new(home, Vec3::ZERO);
        orbit.target = Vec3::new(1.0, 0.0, 1.0);
        orbit.rotate(1.0, 0.3, 1.5);
        orbit.zoom(3.0, 1.0, 50.0);
        orbit.reset();
        assert_eq!(orbit.target, Vec3::ZERO);
        assert!((orbit.position() - home).length() < 1e-4);
    }

    #[test]
    fn orbit_zoom_is_clamped() {
        let mut orbit = OrbitController::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        orbit.zoom(100.0, 2.0, 30.0);
        assert_eq!(orbit.distance, 30.0);
        orbit.zoom(0.0001, 2.0, 30.0);
        assert_eq!(orbit.distance, 2.0);
    }
}
