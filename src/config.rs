//! Tunables for the meadow scene.
//!
//! Everything the simulation reads lives here as a plain struct with a
//! `Default` preset, so tests can build a variant by struct update instead of
//! patching constants. All durations are milliseconds of scene time.

use crate::geometry::rand_range;

/// Closed numeric range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn pick(self, rng: &mut fastrand::Rng) -> f32 {
        rand_range(rng, self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// Prop placement
// ---------------------------------------------------------------------------

/// Where and how mushrooms are scattered.
#[derive(Debug, Clone, Copy)]
pub struct PlacementConfig {
    /// Top of the ground band as a fraction of container height.
    pub band_top: f32,
    /// Bottom of the ground band as a fraction of container height.
    pub band_bottom: f32,
    /// Horizontal inset from both container edges.
    pub edge_margin: f32,
    /// Natural asset width is multiplied by this before clamping.
    pub asset_scale: f32,
    pub min_width: f32,
    pub max_width: f32,
    /// Samples per prop before accepting an overlapping position.
    pub max_tries: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            band_top: 0.60,
            band_bottom: 0.86,
            edge_margin: 16.0,
            asset_scale: 0.22,
            min_width: 44.0,
            max_width: 120.0,
            max_tries: 80,
        }
    }
}

/// Prop count as a step function of container width.
#[derive(Debug, Clone, Copy)]
pub struct PropCountRule {
    /// Containers narrower than this get the narrow count.
    pub narrow_below: f32,
    pub narrow: usize,
    pub wide: usize,
}

impl PropCountRule {
    pub fn count_for(&self, width: f32) -> usize {
        if width < self.narrow_below {
            self.narrow
        } else {
            self.wide
        }
    }
}

impl Default for PropCountRule {
    fn default() -> Self {
        Self {
            narrow_below: 650.0,
            narrow: 10,
            wide: 16,
        }
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Movement and mood constants shared by every agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentTuning {
    /// Left edge of the legal x range.
    pub left_bound: f32,
    /// Gap kept between the sprite's right edge and the container edge.
    pub right_margin: f32,
    /// Full sprite width; the right bound is `width - right_margin - sprite_width`.
    pub sprite_width: f32,
    /// Lane baseline as a fraction of container height.
    pub lane_fraction: f32,
    /// Magnitude range of the initial horizontal velocity.
    pub initial_speed: Range,

    /// Per-ms random walk amplitude on `vx`.
    pub wander_jitter: f32,
    pub max_roam_speed: f32,
    /// Converts `vx * speed_mul * dt` into pixels.
    pub move_scale: f32,

    /// Per-step chance a moody agent starts sulking.
    pub mood_chance: f32,
    pub mood_duration: Range,
    /// Fraction of `vx * dt` moved while sulking.
    pub low_move_factor: f32,
    /// Per-step multiplier on `vx` while sulking.
    pub low_move_damping: f32,

    /// Steering gain toward the chase target.
    pub chase_gain: f32,
    /// Per-ms cap on the chase steering term.
    pub chase_accel: f32,
    pub max_chase_speed: f32,

    /// Nearest prop closer than this pushes the agent away.
    pub avoid_radius: f32,
    pub avoid_strength: f32,
    /// Per-ms cap on the avoidance term.
    pub avoid_max: f32,

    pub hop_cooldown: f64,
    pub hop_duration: f64,
    pub hop_impulse: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            left_bound: 8.0,
            right_margin: 10.0,
            sprite_width: 120.0,
            lane_fraction: 0.72,
            initial_speed: Range::new(0.9, 1.6),
            wander_jitter: 0.02,
            max_roam_speed: 2.2,
            move_scale: 0.06,
            mood_chance: 0.003,
            mood_duration: Range::new(180.0, 320.0),
            low_move_factor: 0.02,
            low_move_damping: 0.9,
            chase_gain: 0.000_15,
            chase_accel: 0.06,
            max_chase_speed: 3.2,
            avoid_radius: 220.0,
            avoid_strength: 0.0008,
            avoid_max: 0.55,
            hop_cooldown: 800.0,
            hop_duration: 260.0,
            hop_impulse: 0.9,
        }
    }
}

// ---------------------------------------------------------------------------
// Chase director
// ---------------------------------------------------------------------------

/// Scripted chase interludes between two roaming agents.
#[derive(Debug, Clone, Copy)]
pub struct ChaseConfig {
    pub enabled: bool,
    /// Per-frame chance of starting a chase once the cooldown has run out.
    pub chance: f32,
    /// Delay before the first chase and between chases.
    pub cooldown: Range,
    pub duration: Range,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chance: 0.01,
            cooldown: Range::new(6_000.0, 14_000.0),
            duration: Range::new(1_200.0, 2_400.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Full scene preset.
#[derive(Debug, Clone, Copy)]
pub struct SceneConfig {
    pub placement: PlacementConfig,
    pub prop_count: PropCountRule,
    pub agents: AgentTuning,
    pub chase: ChaseConfig,
    /// `dt` used for the first frame after boot.
    pub nominal_dt: f32,
    /// Upper clamp on `dt` so a backgrounded window does not teleport agents.
    pub max_dt: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            prop_count: PropCountRule::default(),
            agents: AgentTuning::default(),
            chase: ChaseConfig::default(),
            nominal_dt: 16.0,
            max_dt: 32.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prop_count_steps_at_threshold() {
        let rule = PropCountRule::default();
        assert_eq!(rule.count_for(400.0), 10);
        assert_eq!(rule.count_for(649.9), 10);
        assert_eq!(rule.count_for(650.0), 16);
        assert_eq!(rule.count_for(1920.0), 16);
    }

    #[test]
    fn range_pick_within_bounds() {
        let mut rng = fastrand::Rng::with_seed(3);
        let r = Range::new(180.0, 320.0);
        for _ in 0..500 {
            assert!((r.min..=r.max).contains(&r.pick(&mut rng)));
        }
    }
}
