//! Launch parameters.
//!
//! Native builds parse them from the command line with clap; web builds use
//! the defaults.

use car_viewer::anim::AnimConfig;
use car_viewer::car::CarConfig;
use car_viewer::intro::IntroConfig;
use car_viewer::rig::{RigConfig, Seat};
use car_viewer::world::{WorldConfig, YawJitter};
use car_viewer::DriveSpeed;

/// Startup options that override plugin defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchParams {
    /// Initial road speed.
    pub speed: f32,
    /// Hand over control without the fly-in.
    pub skip_intro: bool,
    /// Car glTF path, relative to the asset directory.
    pub model: Option<String>,
    /// Seat entered once the intro ends.
    pub seat: Option<Seat>,
    /// Apply smoothing factors once per frame instead of per elapsed time.
    pub fixed_step: bool,
    /// When building yaw jitter is re-rolled.
    pub yaw_jitter: YawJitter,
    /// Seed for the building layout.
    pub seed: Option<u64>,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            speed: DriveSpeed::default().value,
            skip_intro: false,
            model: None,
            seat: None,
            fixed_step: false,
            yaw_jitter: YawJitter::default(),
            seed: None,
        }
    }
}

/// Plugin configurations after launch overrides.
pub struct Settings {
    pub anim: AnimConfig,
    pub car: CarConfig,
    pub intro: IntroConfig,
    pub rig: RigConfig,
    pub world: WorldConfig,
    pub speed: DriveSpeed,
}

impl LaunchParams {
    /// Folds the overrides into default plugin settings.
    pub fn settings(self) -> Settings {
        Settings {
            anim: AnimConfig {
                frame_normalized: !self.fixed_step,
                ..Default::default()
            },
            car: CarConfig {
                model_path: self
                    .model
                    .unwrap_or_else(|| CarConfig::default().model_path),
                ..Default::default()
            },
            intro: IntroConfig {
                enabled: !self.skip_intro,
                ..Default::default()
            },
            rig: RigConfig {
                start_seat: self.seat,
                ..Default::default()
            },
            world: WorldConfig {
                yaw_jitter_mode: self.yaw_jitter,
                seed: self.seed,
                ..Default::default()
            },
            speed: DriveSpeed::clamped(self.speed, DriveSpeed::default().max),
        }
    }
}

#[cfg(feature = "native")]
mod native {
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    #[command(about = "Interactive 3D car viewer")]
    pub(super) struct CliArgs {
        /// Initial road speed (0 to 100).
        #[arg(long, default_value_t = DriveSpeed::default().value)]
        speed: f32,

        /// Skip the intro fly-in.
        #[arg(long)]
        skip_intro: bool,

        /// Car glTF path, relative to the asset directory.
        #[arg(long)]
        model: Option<String>,

        /// Seat to enter after the intro: driver, passenger, rear_left or rear_right.
        #[arg(long)]
        seat: Option<Seat>,

        /// Apply smoothing once per frame, regardless of frame time.
        #[arg(long)]
        fixed_step: bool,

        /// Building yaw jitter: per-tick or on-recycle.
        #[arg(long, default_value = "per-tick")]
        yaw_jitter: YawJitter,

        /// Seed for a reproducible building layout.
        #[arg(long)]
        seed: Option<u64>,
    }

    impl From<CliArgs> for LaunchParams {
        fn from(args: CliArgs) -> Self {
            Self {
                speed: args.speed,
                skip_intro: args.skip_intro,
                model: args.model,
                seat: args.seat,
                fixed_step: args.fixed_step,
                yaw_jitter: args.yaw_jitter,
                seed: args.seed,
            }
        }
    }

    pub fn parse() -> LaunchParams {
        CliArgs::parse().into()
    }

}

/// Parses launch parameters from CLI args (native) or uses defaults (web).
pub fn parse() -> LaunchParams {
    #[cfg(feature = "native")]
    {
        native::parse()
    }
    #[cfg(not(feature = "native"))]
    {
        LaunchParams::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_reach_plugin_configs() {
        let s = LaunchParams {
            speed: 500.0,
            skip_intro: true,
            model: Some("a.glb".into()),
            seat: Some(Seat::Passenger),
            fixed_step: true,
            yaw_jitter: YawJitter::OnRecycle,
            seed: Some(1),
        }
        .settings();
        assert_eq!(s.speed.value, s.speed.max);
        assert!(!s.intro.enabled);
        assert_eq!(s.car.model_path, "a.glb");
        assert_eq!(s.rig.start_seat, Some(Seat::Passenger));
        assert!(!s.anim.frame_normalized);
        assert_eq!(s.world.yaw_jitter_mode, YawJitter::OnRecycle);
        assert_eq!(s.world.seed, Some(1));
    }

    #[test]
    fn defaults_keep_plugin_defaults() {
        let s = LaunchParams::default().settings();
        assert!(s.intro.enabled);
        assert!(s.anim.frame_normalized);
        assert_eq!(s.car.model_path, CarConfig::default().model_path);
        assert_eq!(s.rig.start_seat, None);
    }
}
