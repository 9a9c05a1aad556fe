use glam::Vec2;

use crate::config::AgentTuning;
use crate::geometry::{rand_range, rand_sign, Container, HorizontalBounds, Rect};
use crate::scene::props::Prop;

/// How long a moody kind sulks when the scene boots.
const MOODY_START_IDLE: f32 = 180.0;

/// Lower-body collision box, relative to the sprite's top-left corner.
const BODY_OFFSET: Vec2 = Vec2::new(16.0, 44.0);
const BODY_SIZE: Vec2 = Vec2::new(72.0, 48.0);

/// Prop cap region an agent has to hop over: (left, top, right, bottom) insets.
const HOP_INSET: [f32; 4] = [8.0, 18.0, 8.0, 0.0];

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Per-kind constants.
#[derive(Debug, Clone, Copy)]
pub struct KindTraits {
    /// Multiplier on integrated velocity.
    pub speed_mul: f32,
    /// Extra pixels below the shared lane baseline.
    pub lane_offset: f32,
    /// Whether the kind can drop into idle/sleep/hiss.
    pub moody: bool,
    /// Spawn x as a fraction of container width.
    pub spawn_fraction: f32,
    /// Coat color, RGBA packed.
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AgentKind {
    Orange,
    Black,
    Grey,
}

impl AgentKind {
    /// Fixed roster, in update order.
    pub const ROSTER: [AgentKind; 3] = [Self::Orange, Self::Black, Self::Grey];

    pub fn traits(self) -> KindTraits {
        match self {
            Self::Orange => KindTraits {
                speed_mul: 1.0,
                lane_offset: 0.0,
                moody: false,
                spawn_fraction: 0.20,
                color: 0xF0_96_3C_FF,
            },
            Self::Black => KindTraits {
                speed_mul: 1.25,
                lane_offset: 10.0,
                moody: false,
                spawn_fraction: 0.60,
                color: 0x26_24_2C_FF,
            },
            Self::Grey => KindTraits {
                speed_mul: 0.85,
                lane_offset: 18.0,
                moody: true,
                spawn_fraction: 0.40,
                color: 0x8C_8C_96_FF,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Black => "black",
            Self::Grey => "grey",
        }
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Roam,
    Idle,
    Sleep,
    Hiss,
    Chase,
}

impl Mode {
    /// Moods a moody kind may drop into from `Roam`.
    pub const MOODS: [Mode; 3] = [Self::Idle, Self::Sleep, Self::Hiss];

    /// Low-movement modes skip steering, avoidance and hopping.
    pub fn is_resting(self) -> bool {
        matches!(self, Self::Idle | Self::Sleep | Self::Hiss)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Roam => "roam",
            Self::Idle => "idle",
            Self::Sleep => "sleep",
            Self::Hiss => "hiss",
            Self::Chase => "chase",
        }
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// Inputs shared by every agent for one step.
pub struct StepContext<'a> {
    /// Elapsed scene time for this step (ms), already clamped.
    pub dt: f32,
    /// Scene clock (ms) after this step's `dt` was added.
    pub now: f64,
    pub container: Container,
    pub props: &'a [Prop],
    pub tuning: &'a AgentTuning,
}

/// What the renderer reads for one agent each frame.
#[derive(Debug, Clone, Copy)]
pub struct AgentView {
    pub kind: AgentKind,
    pub mode: Mode,
    /// Sprite top-left.
    pub pos: Vec2,
    /// +1 facing right, -1 facing left.
    pub facing: f32,
    pub hopping: bool,
    /// Visual variant, e.g. "grey sleep".
    pub sprite: &'static str,
}

/// A wandering cat.
#[derive(Debug, Clone)]
pub struct Agent {
    pub kind: AgentKind,
    /// Sprite top-left in container pixels.
    pub pos: Vec2,
    /// Horizontal velocity before the kind's speed multiplier.
    pub vx: f32,
    pub mode: Mode,
    /// Time left in the current timed mode (ms).
    pub mode_timer: f32,
    /// Chase target x, only meaningful in `Mode::Chase`.
    pub target: Option<f32>,
    pub last_hop_at: Option<f64>,
    pub hop_started_at: Option<f64>,
    pub facing: f32,
}

impl Agent {
    pub fn spawn(
        kind: AgentKind,
        container: Container,
        tuning: &AgentTuning,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let traits = kind.traits();
        let bounds = Self::bounds(container, tuning);
        let (mode, mode_timer) = if traits.moody {
            (Mode::Idle, MOODY_START_IDLE)
        } else {
            (Mode::Roam, 0.0)
        };

        Self {
            kind,
            pos: Vec2::new(
                bounds.clamp(container.width * traits.spawn_fraction),
                Self::lane_y(kind, container, tuning),
            ),
            vx: tuning.initial_speed.pick(rng) * rand_sign(rng),
            mode,
            mode_timer,
            target: None,
            last_hop_at: None,
            hop_started_at: None,
            facing: 1.0,
        }
    }

    /// Legal x range for agents in a container.
    pub fn bounds(container: Container, tuning: &AgentTuning) -> HorizontalBounds {
        HorizontalBounds {
            left: tuning.left_bound,
            right: container.width - tuning.right_margin,
            sprite_width: tuning.sprite_width,
        }
    }

    pub fn lane_y(kind: AgentKind, container: Container, tuning: &AgentTuning) -> f32 {
        container.height * tuning.lane_fraction + kind.traits().lane_offset
    }

    /// Lower-body collision box. Smaller than the sprite so ears and tail
    /// don't snag on mushroom caps.
    pub fn body_rect(&self) -> Rect {
        Rect::new(
            self.pos.x + BODY_OFFSET.x,
            self.pos.y + BODY_OFFSET.y,
            BODY_SIZE.x,
            BODY_SIZE.y,
        )
    }

    pub fn is_hopping(&self, now: f64, hop_duration: f64) -> bool {
        self.hop_started_at
            .is_some_and(|started| now - started < hop_duration)
    }

    /// Switch into a chase toward `target_x`. Only a roaming agent accepts.
    pub fn start_chase(&mut self, target_x: f32, duration: f32) -> bool {
        if self.mode != Mode::Roam {
            return false;
        }
        self.mode = Mode::Chase;
        self.mode_timer = duration;
        self.target = Some(target_x);
        true
    }

    /// Refresh the chase target (the quarry keeps moving).
    pub fn retarget(&mut self, target_x: f32) {
        if self.mode == Mode::Chase {
            self.target = Some(target_x);
        }
    }

    pub fn sprite(&self) -> &'static str {
        match (self.kind, self.mode) {
            (AgentKind::Orange, Mode::Roam | Mode::Chase) => "orange run",
            (AgentKind::Black, Mode::Roam | Mode::Chase) => "black run",
            (AgentKind::Grey, Mode::Roam | Mode::Chase) => "grey walk",
            (AgentKind::Orange, _) => "orange idle",
            (AgentKind::Black, _) => "black idle",
            (AgentKind::Grey, Mode::Sleep) => "grey sleep",
            (AgentKind::Grey, Mode::Hiss) => "grey hiss",
            (AgentKind::Grey, _) => "grey idle",
        }
    }

    pub fn view(&self, now: f64, tuning: &AgentTuning) -> AgentView {
        AgentView {
            kind: self.kind,
            mode: self.mode,
            pos: self.pos,
            facing: self.facing,
            hopping: self.is_hopping(now, tuning.hop_duration),
            sprite: self.sprite(),
        }
    }

    /// Advance one step.
    pub fn update(&mut self, ctx: &StepContext<'_>, rng: &mut fastrand::Rng) {
        let t = ctx.tuning;
        let traits = self.kind.traits();
        let bounds = Self::bounds(ctx.container, t);
        let dt = ctx.dt;

        // Mode timers
        self.mode_timer = (self.mode_timer - dt).max(0.0);
        if self.mode_timer <= 0.0 && self.mode != Mode::Roam {
            self.mode = Mode::Roam;
            self.target = None;
        }
        if traits.moody && self.mode == Mode::Roam && rng.f32() < t.mood_chance {
            self.mode = Mode::MOODS[rng.usize(0..Mode::MOODS.len())];
            self.mode_timer = t.mood_duration.pick(rng);
        }

        self.pos.y = Self::lane_y(self.kind, ctx.container, t);

        // Sulking: drift to a stop, no steering or hopping
        if self.mode.is_resting() {
            self.vx *= t.low_move_damping;
            self.pos.x = bounds.clamp(self.pos.x + self.vx * t.low_move_factor * dt);
            return;
        }

        // Steering
        match (self.mode, self.target) {
            (Mode::Chase, Some(target)) => {
                let pull =
                    ((target - self.pos.x) * t.chase_gain).clamp(-t.chase_accel, t.chase_accel);
                self.vx = (self.vx + pull * dt).clamp(-t.max_chase_speed, t.max_chase_speed);
            }
            _ => {
                let jitter = rand_range(rng, -t.wander_jitter, t.wander_jitter);
                self.vx = (self.vx + jitter * dt).clamp(-t.max_roam_speed, t.max_roam_speed);
            }
        }

        // Prop avoidance + hop
        let body = self.body_rect();
        if let Some((prop, dist_sq)) = nearest_prop(&body, ctx.props) {
            if dist_sq < t.avoid_radius * t.avoid_radius {
                let away = body.center().x - prop.center().x;
                self.vx += (away * t.avoid_strength).clamp(-t.avoid_max, t.avoid_max) * dt;

                let [l, top, r, b] = HOP_INSET;
                let cap = prop.inset(l, top, r, b);
                let cooled = self
                    .last_hop_at
                    .map_or(true, |at| ctx.now - at >= t.hop_cooldown);
                if cooled && body.intersects(&cap) {
                    self.last_hop_at = Some(ctx.now);
                    self.hop_started_at = Some(ctx.now);
                    self.vx += if away >= 0.0 { t.hop_impulse } else { -t.hop_impulse };
                }
            }
        }

        // Integrate
        let speed = self.vx * traits.speed_mul;
        self.pos.x += speed * dt * t.move_scale;

        // Bounce off container edges
        if self.pos.x < bounds.left {
            self.pos.x = bounds.left;
            self.vx = -self.vx;
        }
        if self.pos.x > bounds.max_x() {
            self.pos.x = bounds.max_x();
            self.vx = -self.vx;
        }

        self.facing = if speed >= 0.0 { 1.0 } else { -1.0 };
        debug_assert!(bounds.contains(self.pos.x), "x = {} escaped", self.pos.x);
    }
}

/// Nearest prop to `body` by squared center distance.
fn nearest_prop(body: &Rect, props: &[Prop]) -> Option<(Rect, f32)> {
    props
        .iter()
        .map(|p| {
            let rect = p.rect();
            (rect, body.center_distance_sq(&rect))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Spawn the fixed roster at its starting lanes.
pub fn spawn_roster(
    container: Container,
    tuning: &AgentTuning,
    rng: &mut fastrand::Rng,
) -> Vec<Agent> {
    AgentKind::ROSTER
        .iter()
        .map(|&kind| Agent::spawn(kind, container, tuning, rng))
        .collect()
}
