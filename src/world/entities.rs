use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use rand::Rng;
use rand::rngs::StdRng;

use super::WorldConfig;

/// When building yaw jitter is re-rolled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum YawJitter {
    /// Every frame, for every building.
    #[default]
    PerTick,
    /// Only when a building is recycled.
    OnRecycle,
}

/// Error for a yaw jitter mode name that is not `per-tick` or `on-recycle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJitterMode(pub String);

impl fmt::Display for UnknownJitterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown yaw jitter mode `{}` (expected per-tick or on-recycle)", self.0)
    }
}

impl std::error::Error for UnknownJitterMode {}

impl FromStr for YawJitter {
    type Err = UnknownJitterMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-tick" => Ok(Self::PerTick),
            "on-recycle" => Ok(Self::OnRecycle),
            other => Err(UnknownJitterMode(other.to_string())),
        }
    }
}

/// Roadside a building stands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum Side {
    /// Negative X.
    Left,
    /// Positive X.
    Right,
}

impl Side {
    /// Both sides, indexable by [`Side::index`].
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Sign of the lateral offset.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Position in per-side arrays.
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// One conveyor row: both sides share its longitudinal position.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct Slot {
    /// Longitudinal position (world Z).
    pub z: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Index into [`WorldConfig::variants`].
    pub variant: usize,
    /// Lateral jitter per side.
    pub lateral: [f32; 2],
    /// Yaw jitter per side (radians).
    pub yaw: [f32; 2],
}

/// Conveyor of building rows streaming toward the viewer.
///
/// Every row stays inside `[threshold - span, threshold)`, so that window
/// holds exactly one building per row and side at all times.
#[derive(Resource, Debug, Reflect)]
pub struct Conveyor {
    slots: Vec<Slot>,
    spacing: f32,
}

impl Conveyor {
    /// Lays out `cfg.rows` rows receding from just before the recycle threshold.
    pub fn new(cfg: &WorldConfig, rng: &mut impl Rng) -> Self {
        let threshold = 2.0 * cfg.spacing;
        let slots = (0..cfg.rows)
            .map(|i| {
                let mut slot = Slot {
                    z: threshold - (i + 1) as f32 * cfg.spacing,
                    scale: 1.0,
                    variant: 0,
                    lateral: [0.0; 2],
                    yaw: [0.0; 2],
                };
                reroll(&mut slot, cfg, rng);
                slot
            })
            .collect();
        Self {
            slots,
            spacing: cfg.spacing,
        }
    }

    /// Rows in placement order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Total length covered by all rows.
    pub fn span(&self) -> f32 {
        self.slots.len() as f32 * self.spacing
    }

    /// Rows reaching this Z are recycled to the far end.
    pub fn threshold(&self) -> f32 {
        2.0 * self.spacing
    }

    /// Moves every row by `distance` toward the viewer and recycles rows that
    /// reached the threshold. Returns the number of recycles.
    pub fn advance(&mut self, distance: f32, cfg: &WorldConfig, rng: &mut impl Rng) -> usize {
        let threshold = self.threshold();
        let span = self.span();
        let mut recycled = 0;
        for slot in &mut self.slots {
            slot.z += distance;
            let mut wrapped = false;
            // Half-open window `[threshold - span, threshold)`: a row sitting
            // exactly on the threshold recycles, so `z - span` never rounds out.
            while slot.z >= threshold && span > 0.0 {
                slot.z -= span;
                wrapped = true;
            }
            if wrapped {
                reroll(slot, cfg, rng);
                recycled += 1;
            } else if cfg.yaw_jitter_mode == YawJitter::PerTick {
                slot.yaw = [jitter(rng, cfg.yaw_jitter), jitter(rng, cfg.yaw_jitter)];
            }
        }
        recycled
    }

    /// Rows inside `[threshold - span, threshold)`.
    pub fn visible(&self) -> usize {
        let threshold = self.threshold();
        let far = threshold - self.span();
        self.slots
            .iter()
            .filter(|s| (far..threshold).contains(&s.z))
            .count()
    }
}

fn jitter(rng: &mut impl Rng, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.random_range(-amount..=amount)
    } else {
        0.0
    }
}

fn reroll(slot: &mut Slot, cfg: &WorldConfig, rng: &mut impl Rng) {
    let (lo, hi) = if cfg.min_scale <= cfg.max_scale {
        (cfg.min_scale, cfg.max_scale)
    } else {
        (cfg.max_scale, cfg.min_scale)
    };
    slot.scale = rng.random_range(lo..=hi);
    slot.variant = if cfg.variants.is_empty() {
        0
    } else {
        rng.random_range(0..cfg.variants.len())
    };
    for side in Side::BOTH {
        slot.lateral[side.index()] = jitter(rng, cfg.lateral_jitter);
        slot.yaw[side.index()] = jitter(rng, cfg.yaw_jitter);
    }
}

/// A building instance: one conveyor row on one side.
#[derive(Component, Reflect)]
pub struct Building {
    /// Row index in the [`Conveyor`].
    pub slot: usize,
    /// Roadside.
    pub side: Side,
}

/// Building meshes, one per configured variant.
#[derive(Resource)]
pub struct BuildingMeshes(pub Vec<Handle<Mesh>>);

/// Random source for building jitter.
#[derive(Resource)]
pub struct WorldRng(pub StdRng);

/// Ground plane whose texture scrolls with speed.
#[derive(Component, Reflect)]
pub struct ScrollingSurface {
    /// Texture repeats across the plane.
    pub repeat: Vec2,
    /// UV units per second per unit of speed.
    pub rate: f32,
    /// Accumulated V offset.
    pub offset: f32,
}

impl ScrollingSurface {
    /// Advances the offset by `dt` seconds at `speed`. No-op when stopped.
    pub fn advance(&mut self, speed: f32, dt: f32) {
        if speed > 0.0 {
            self.offset = (self.offset - dt * speed * self.rate).rem_euclid(1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Distances from the far end of the window, sorted.
    fn depths(conveyor: &Conveyor) -> Vec<f32> {
        let far = conveyor.threshold() - conveyor.span();
        let mut d: Vec<f32> = conveyor.slots().iter().map(|s| s.z - far).collect();
        d.sort_by(f32::total_cmp);
        d
    }

    fn assert_evenly_spaced(conveyor: &Conveyor, spacing: f32) {
        let d = depths(conveyor);
        for pair in d.windows(2) {
            assert!(((pair[1] - pair[0]) - spacing).abs() < 1e-2, "{d:?}");
        }
    }

    #[test]
    fn initial_layout_fills_the_window() {
        let cfg = WorldConfig::default();
        let conveyor = Conveyor::new(&cfg, &mut rng());
        assert_eq!(conveyor.slots().len(), cfg.rows);
        assert_eq!(conveyor.visible(), cfg.rows);
        assert_eq!(conveyor.slots()[0].z, conveyor.threshold() - cfg.spacing);
        assert_evenly_spaced(&conveyor, cfg.spacing);
    }

    #[test]
    fn window_count_holds_at_every_tick() {
        let cfg = WorldConfig::default();
        let mut rng = rng();
        let mut conveyor = Conveyor::new(&cfg, &mut rng);
        // speed 100 at 60 Hz
        let per_tick = 100.0 * cfg.speed_scale / 60.0;
        let mut recycled = 0;
        for _ in 0..5_000 {
            recycled += conveyor.advance(per_tick, &cfg, &mut rng);
            assert_eq!(conveyor.visible(), cfg.rows);
        }
        assert!(recycled > cfg.rows);
        assert_evenly_spaced(&conveyor, cfg.spacing);
    }

    #[test]
    fn large_jumps_keep_the_invariant() {
        let cfg = WorldConfig::default();
        let mut rng = rng();
        let mut conveyor = Conveyor::new(&cfg, &mut rng);
        let span = conveyor.span();
        for distance in [span * 2.5, 37.0, span * 0.999] {
            conveyor.advance(distance, &cfg, &mut rng);
            assert_eq!(conveyor.visible(), cfg.rows);
        }
    }

    #[test]
    fn recycled_rows_stay_inside_jitter_bounds() {
        let cfg = WorldConfig::default();
        let mut rng = rng();
        let mut conveyor = Conveyor::new(&cfg, &mut rng);
        for _ in 0..500 {
            conveyor.advance(3.0, &cfg, &mut rng);
        }
        for slot in conveyor.slots() {
            assert!((cfg.min_scale..=cfg.max_scale).contains(&slot.scale));
            assert!(slot.variant < cfg.variants.len());
            for side in Side::BOTH {
                assert!(slot.lateral[side.index()].abs() <= cfg.lateral_jitter);
                assert!(slot.yaw[side.index()].abs() <= cfg.yaw_jitter);
            }
        }
    }

    #[test]
    fn swapped_scale_bounds_are_reordered() {
        let cfg = WorldConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..default()
        };
        let mut rng = rng();
        let mut conveyor = Conveyor::new(&cfg, &mut rng);
        conveyor.advance(conveyor.span(), &cfg, &mut rng);
        for slot in conveyor.slots() {
            assert!((1.0..=2.0).contains(&slot.scale), "{}", slot.scale);
        }
    }

    #[test]
    fn stopped_conveyor_moves_nothing() {
        let cfg = WorldConfig {
            yaw_jitter_mode: YawJitter::OnRecycle,
            ..default()
        };
        let mut rng = rng();
        let mut conveyor = Conveyor::new(&cfg, &mut rng);
        let before = conveyor.slots().to_vec();
        assert_eq!(conveyor.advance(0.0, &cfg, &mut rng), 0);
        assert_eq!(conveyor.slots(), before.as_slice());
    }

    #[test]
    fn per_tick_mode_rerolls_yaw_only() {
        let cfg = WorldConfig::default();
        let mut rng = rng();
        let mut conveyor = Conveyor::new(&cfg, &mut rng);
        let before = conveyor.slots().to_vec();
        conveyor.advance(0.0, &cfg, &mut rng);
        for (a, b) in before.iter().zip(conveyor.slots()) {
            assert_eq!(a.z, b.z);
            assert_eq!(a.scale, b.scale);
            assert_eq!(a.lateral, b.lateral);
        }
        assert!(before.iter().zip(conveyor.slots()).any(|(a, b)| a.yaw != b.yaw));
    }

    #[test]
    fn jitter_mode_parses() {
        assert_eq!("per-tick".parse::<YawJitter>(), Ok(YawJitter::PerTick));
        assert_eq!("on-recycle".parse::<YawJitter>(), Ok(YawJitter::OnRecycle));
        assert!("sometimes".parse::<YawJitter>().is_err());
    }

    #[test]
    fn surface_scrolls_backwards_only_while_moving() {
        let mut road = ScrollingSurface {
            repeat: Vec2::new(1.0, 20.0),
            rate: 1.0,
            offset: 0.0,
        };
        road.advance(0.0, 1.0);
        assert_eq!(road.offset, 0.0);
        road.advance(0.25, 1.0);
        assert!((road.offset - 0.75).abs() < 1e-6);
        road.advance(0.5, 1.0);
        assert!((road.offset - 0.25).abs() < 1e-6);
    }
}
