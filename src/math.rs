//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec3` inputs, making them straightforward to unit-test.

use bevy::prelude::Vec3;

/// Cubic ease-in-out curve: slow start, fast middle, gentle deceleration.
///
/// `t` should be in `[0, 1]`. Used by the cinematic intro fly-in.
///
/// # Examples
/// ```
/// # use car_viewer::math::ease_in_out_cubic;
/// assert_eq!(ease_in_out_cubic(0.0), 0.0);
/// assert_eq!(ease_in_out_cubic(0.5), 0.5);
/// assert_eq!(ease_in_out_cubic(1.0), 1.0);
/// ```
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Converts a per-tick smoothing factor into the factor for a frame of `dt`
/// seconds, assuming the factor was tuned for `reference_hz` ticks per second.
///
/// Returns `1 - (1 - factor)^(dt * reference_hz)`, so one reference frame
/// yields exactly `factor` and two half-length frames compound to the same
/// total. The result stays in `[0, 1]` for `factor` in `[0, 1]`.
pub fn frame_factor(factor: f32, dt: f32, reference_hz: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    let keep = (1.0 - factor).clamp(0.0, 1.0);
    1.0 - keep.powf(dt * reference_hz)
}

/// Number of ticks a geometric approach with factor `f` needs to bring an
/// initial gap of `initial_gap` within `epsilon`.
///
/// Computes `⌈ln(ε / |Δ0|) / ln(1 - f)⌉`. Returns 0 when the gap is already
/// within `epsilon`. `f` must be in `(0, 1)`.
pub fn ticks_to_converge(initial_gap: f32, epsilon: f32, f: f32) -> u32 {
    let gap = initial_gap.abs();
    if gap <= epsilon {
        return 0;
    }
    let ticks = ((epsilon / gap).ln() / (1.0 - f).ln()).ceil();
    ticks.max(0.0) as u32
}

/// Unit direction for a yaw/pitch pair.
///
/// Yaw rotates about +Y starting from +Z; pitch raises toward +Y:
/// `(sin(yaw)·cos(pitch), sin(pitch), cos(yaw)·cos(pitch))`.
pub fn look_direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        yaw.sin() * pitch.cos(),
        pitch.sin(),
        yaw.cos() * pitch.cos(),
    )
}

/// Inverse of [`look_direction`]: recovers `(yaw, pitch)` from an offset.
///
/// Returns `(0, 0)` for a zero-length offset.
pub fn yaw_pitch_of(offset: Vec3) -> (f32, f32) {
    let len = offset.length();
    if len <= f32::EPSILON {
        return (0.0, 0.0);
    }
    let yaw = offset.x.atan2(offset.z);
    let pitch = (offset.y / len).clamp(-1.0, 1.0).asin();
    (yaw, pitch)
}

/// Applies `delta` to `current` and clamps the result to `[-limit, limit]`.
pub fn clamp_pitch(current: f32, delta: f32, limit: f32) -> f32 {
    (current + delta).clamp(-limit, limit)
}
