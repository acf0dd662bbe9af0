use bevy::prelude::*;

use super::IntroConfig;
use crate::math;

/// Where the fly-in stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum IntroPhase {
    /// Waiting for the car scene, then for the start delay.
    Pending,
    /// Camera is flying in.
    Running,
    /// Finished for the rest of the session.
    Done,
}

/// One-shot fly-in sequencer.
///
/// Purely time-driven: [`IntroSequence::advance`] reports what the camera
/// should do this frame and never moves backwards through its phases.
#[derive(Resource, Debug, Reflect)]
pub struct IntroSequence {
    phase: IntroPhase,
    elapsed: f32,
    waited: f32,
}

/// Result of advancing the sequencer by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntroStep {
    /// Still waiting for the start delay.
    Waiting,
    /// Fly-in progress, already eased, in `[0, 1)`.
    Flying(f32),
    /// The fly-in reached its end this frame.
    Finished,
    /// Nothing left to do.
    Idle,
}

impl Default for IntroSequence {
    fn default() -> Self {
        Self {
            phase: IntroPhase::Pending,
            elapsed: 0.0,
            waited: 0.0,
        }
    }
}

impl IntroSequence {
    /// Current phase.
    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    /// Advances by `dt` seconds.
    pub fn advance(&mut self, dt: f32, cfg: &IntroConfig) -> IntroStep {
        match self.phase {
            IntroPhase::Done => IntroStep::Idle,
            IntroPhase::Pending => {
                self.elapsed += dt;
                if self.elapsed < cfg.delay {
                    return IntroStep::Waiting;
                }
                self.phase = IntroPhase::Running;
                self.elapsed -= cfg.delay;
                self.flying(cfg)
            }
            IntroPhase::Running => {
                self.elapsed += dt;
                self.flying(cfg)
            }
        }
    }

    /// Counts `dt` seconds spent waiting for the car scene. Returns `true`
    /// once `timeout` seconds have passed without it.
    pub fn wait_for_scene(&mut self, dt: f32, timeout: f32) -> bool {
        self.waited += dt;
        self.waited >= timeout
    }

    /// Jumps straight to `Done`. Returns `false` if it was already done.
    pub fn finish(&mut self) -> bool {
        let was_done = self.phase == IntroPhase::Done;
        self.phase = IntroPhase::Done;
        !was_done
    }

    fn flying(&mut self, cfg: &IntroConfig) -> IntroStep {
        if cfg.duration <= 0.0 || self.elapsed >= cfg.duration {
            self.phase = IntroPhase::Done;
            return IntroStep::Finished;
        }
        IntroStep::Flying(math::ease_in_out_cubic(self.elapsed / cfg.duration))
    }
}

/// Camera position for eased progress `t`, relative to the car at `car`.
pub fn fly_in_position(car: Vec3, cfg: &IntroConfig, t: f32) -> Vec3 {
    car + cfg.start_offset.lerp(cfg.end_offset, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(seq: &mut IntroSequence, cfg: &IntroConfig, dt: f32, frames: usize) -> Vec<IntroStep> {
        (0..frames).map(|_| seq.advance(dt, cfg)).collect()
    }

    #[test]
    fn waits_for_the_delay() {
        let cfg = IntroConfig::default();
        let mut seq = IntroSequence::default();
        assert_eq!(seq.advance(0.1, &cfg), IntroStep::Waiting);
        assert_eq!(seq.phase(), IntroPhase::Pending);
        assert!(matches!(seq.advance(0.15, &cfg), IntroStep::Flying(_)));
        assert_eq!(seq.phase(), IntroPhase::Running);
    }

    #[test]
    fn progress_is_monotone_and_finishes_once() {
        let cfg = IntroConfig::default();
        let mut seq = IntroSequence::default();
        // 0.2 s delay + 2.6 s flight at 60 Hz, plus slack.
        let steps = run(&mut seq, &cfg, 1.0 / 60.0, 200);

        let progress: Vec<f32> = steps
            .iter()
            .filter_map(|s| match s {
                IntroStep::Flying(t) => Some(*t),
                _ => None,
            })
            .collect();
        assert!(progress.windows(2).all(|w| w[1] >= w[0]));
        assert!(progress.iter().all(|t| (0.0..1.0).contains(t)));

        let finished = steps.iter().filter(|s| **s == IntroStep::Finished).count();
        assert_eq!(finished, 1);
        assert_eq!(steps.last(), Some(&IntroStep::Idle));
        assert_eq!(seq.phase(), IntroPhase::Done);
    }

    #[test]
    fn done_is_permanent() {
        let cfg = IntroConfig::default();
        let mut seq = IntroSequence::default();
        assert!(seq.finish());
        assert!(!seq.finish());
        assert_eq!(seq.advance(10.0, &cfg), IntroStep::Idle);
    }

    #[test]
    fn scene_wait_times_out() {
        let mut seq = IntroSequence::default();
        assert!(!seq.wait_for_scene(4.0, 10.0));
        assert!(!seq.wait_for_scene(5.9, 10.0));
        assert!(seq.wait_for_scene(0.1, 10.0));
        // Waiting does not eat into the start delay
        assert_eq!(seq.advance(0.1, &IntroConfig::default()), IntroStep::Waiting);
    }

    #[test]
    fn large_step_finishes_without_flying() {
        let cfg = IntroConfig::default();
        let mut seq = IntroSequence::default();
        assert_eq!(seq.advance(5.0, &cfg), IntroStep::Finished);
    }

    #[test]
    fn path_runs_from_start_to_end_offset() {
        let cfg = IntroConfig::default();
        let car = Vec3::new(1.0, 0.0, -2.0);
        assert_eq!(fly_in_position(car, &cfg, 0.0), car + cfg.start_offset);
        let end = fly_in_position(car, &cfg, 1.0);
        assert!((end - (car + cfg.end_offset)).length() < 1e-5);
    }
}
