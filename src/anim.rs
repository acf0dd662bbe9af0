//! Interpolated-target animation: ease a current value toward a target.
//!
//! Every animated attribute in the viewer (door angles, frunk angle, trunk
//! morph influence, seated camera position) is a [`Smoothed`] value stepped
//! once per frame with `current += f * (target - current)`.

use bevy::prelude::*;

use crate::math;

/// Per-tick stepping policy shared by all smoothed values.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct AnimConfig {
    /// Tick rate the per-tick factors were tuned for.
    pub reference_hz: f32,
    /// Scale factors by elapsed time. When `false`, each factor is applied
    /// once per frame regardless of frame duration.
    pub frame_normalized: bool,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self {
            reference_hz: 60.0,
            frame_normalized: true,
        }
    }
}

impl AnimConfig {
    /// Effective factor for a frame of `dt` seconds.
    pub fn factor(&self, factor: f32, dt: f32) -> f32 {
        if self.frame_normalized {
            math::frame_factor(factor, dt, self.reference_hz)
        } else {
            factor
        }
    }

    /// How many reference ticks a frame of `dt` seconds is worth.
    pub fn ticks(&self, dt: f32) -> f32 {
        if self.frame_normalized {
            dt * self.reference_hz
        } else {
            1.0
        }
    }
}

/// Values that can be linearly blended.
pub trait Blend: Copy {
    /// `self + (target - self) * t`.
    fn blend(self, target: Self, t: f32) -> Self;
    /// Distance between two values, used for convergence checks.
    fn gap(self, other: Self) -> f32;
}

impl Blend for f32 {
    fn blend(self, target: Self, t: f32) -> Self {
        self + (target - self) * t
    }

    fn gap(self, other: Self) -> f32 {
        (self - other).abs()
    }
}

impl Blend for Vec3 {
    fn blend(self, target: Self, t: f32) -> Self {
        self.lerp(target, t)
    }

    fn gap(self, other: Self) -> f32 {
        self.distance(other)
    }
}

/// A value easing toward a target by a fixed per-tick factor.
///
/// For a factor in `(0, 1)` the gap to the target shrinks geometrically and
/// never overshoots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoothed<T: Blend> {
    /// Value as of the last step.
    pub current: T,
    /// Value being approached.
    pub target: T,
    /// Fraction of the remaining gap closed per reference tick.
    pub factor: f32,
}

impl<T: Blend> Smoothed<T> {
    /// Starts at rest on `value`.
    pub fn at(value: T, factor: f32) -> Self {
        Self {
            current: value,
            target: value,
            factor,
        }
    }

    /// Advances one fixed tick.
    pub fn tick(&mut self) -> T {
        self.current = self.current.blend(self.target, self.factor);
        self.current
    }

    /// Advances by a frame of `dt` seconds under `cfg`.
    pub fn step(&mut self, cfg: &AnimConfig, dt: f32) -> T {
        self.current = self.current.blend(self.target, cfg.factor(self.factor, dt));
        self.current
    }

    /// Remaining distance to the target.
    pub fn gap(&self) -> f32 {
        self.current.gap(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_strictly_decreases_without_overshoot() {
        for &f in &[0.01, 0.08, 0.12, 0.5, 0.99] {
            for &(start, target) in &[(0.0_f32, 1.0_f32), (3.0, -2.0), (-1.5, -1.4)] {
                let mut s = Smoothed::at(start, f);
                s.target = target;
                let mut prev = s.gap();
                let sign = (target - start).signum();
                for _ in 0..200 {
                    s.tick();
                    let gap = s.gap();
                    if prev > 1e-6 {
                        assert!(gap < prev, "gap must shrink (f={f})");
                    }
                    // Never crosses the target
                    assert!((target - s.current) * sign >= -1e-6, "overshoot (f={f})");
                    prev = gap;
                }
            }
        }
    }

    #[test]
    fn converges_within_predicted_ticks() {
        let f = 0.12;
        let eps = 1e-3;
        let start_gap = std::f32::consts::FRAC_PI_2;
        let predicted = math::ticks_to_converge(start_gap, eps, f);

        let mut s = Smoothed::at(0.0, f);
        s.target = -start_gap;
        let mut ticks = 0;
        while s.gap() > eps {
            s.tick();
            ticks += 1;
            assert!(ticks <= predicted, "took longer than predicted {predicted}");
        }
        assert!(ticks + 1 >= predicted, "converged suspiciously early");
    }

    #[test]
    fn vector_blends_component_wise() {
        let mut s = Smoothed::at(Vec3::ZERO, 0.5);
        s.target = Vec3::new(2.0, -4.0, 8.0);
        let v = s.tick();
        assert!((v - Vec3::new(1.0, -2.0, 4.0)).length() < 1e-6);
    }

    #[test]
    fn normalized_step_matches_tick_at_reference_rate() {
        let cfg = AnimConfig::default();
        let mut a = Smoothed::at(0.0, 0.12);
        let mut b = a;
        a.target = 1.0;
        b.target = 1.0;
        for _ in 0..30 {
            a.tick();
            b.step(&cfg, 1.0 / 60.0);
        }
        assert!((a.current - b.current).abs() < 1e-4);
    }

    #[test]
    fn normalized_step_is_frame_rate_independent() {
        let cfg = AnimConfig::default();
        let mut fast = Smoothed::at(0.0, 0.12);
        let mut slow = fast;
        fast.target = 1.0;
        slow.target = 1.0;
        for _ in 0..120 {
            fast.step(&cfg, 1.0 / 120.0);
        }
        for _ in 0..30 {
            slow.step(&cfg, 1.0 / 30.0);
        }
        assert!((fast.current - slow.current).abs() < 1e-3);
    }

    #[test]
    fn fixed_step_ignores_frame_duration() {
        let cfg = AnimConfig {
            frame_normalized: false,
            ..default()
        };
        let mut s = Smoothed::at(0.0, 0.12);
        s.target = 1.0;
        s.step(&cfg, 0.5);
        assert!((s.current - 0.12).abs() < 1e-6);
        assert_eq!(cfg.ticks(0.5), 1.0);
    }
}
