pub mod agent;
pub mod chase;
pub mod props;

use crate::config::SceneConfig;
use crate::geometry::Container;

use self::agent::{spawn_roster, Agent, AgentKind, AgentView, StepContext};
use self::chase::ChaseDirector;
use self::props::Prop;

/// Result of a ready signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStatus {
    Started,
    /// Already running; nothing was rebuilt.
    AlreadyRunning,
    /// Container had no measurable size yet. Call `boot` again later.
    Deferred,
}

/// One meadow: its mushrooms, its cats, and the frame loop that drives them.
///
/// The scene is its own handle. `boot` starts it, `on_frame` is the callback
/// the host runs once per paint, and `stop` makes the next callback a no-op.
pub struct Scene {
    config: SceneConfig,
    rng: fastrand::Rng,
    running: bool,
    container: Container,
    props: Vec<Prop>,
    agents: Vec<Agent>,
    chase: Option<ChaseDirector>,
    /// Host timestamp of the previous frame (ms).
    last_frame_at: Option<f64>,
    /// Sum of clamped frame deltas since the scene was created (ms).
    clock: f64,
    frames: u64,
    builds: u64,
}

impl Scene {
    pub fn new(config: SceneConfig, rng: fastrand::Rng) -> Self {
        Self {
            config,
            rng,
            running: false,
            container: Container::new(0.0, 0.0),
            props: Vec::new(),
            agents: Vec::new(),
            chase: None,
            last_frame_at: None,
            clock: 0.0,
            frames: 0,
            builds: 0,
        }
    }

    /// Start the scene in a container of the given size.
    pub fn boot(&mut self, container: Container) -> BootStatus {
        if self.running {
            return BootStatus::AlreadyRunning;
        }
        if !container.is_measurable() {
            log::debug!(
                "boot deferred: container is {}x{}",
                container.width,
                container.height
            );
            return BootStatus::Deferred;
        }

        self.running = true;
        self.last_frame_at = None;
        self.rebuild(container);
        log::info!(
            "Meadow booted at {:.0}x{:.0}: {} mushrooms, {} cats",
            container.width,
            container.height,
            self.props.len(),
            self.agents.len()
        );
        BootStatus::Started
    }

    /// Stop scheduling. Takes effect at the next `on_frame`.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Meadow stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replant everything for a new container size. Returns true if a
    /// rebuild happened.
    pub fn resize(&mut self, container: Container) -> bool {
        if !self.running || !container.is_measurable() || container == self.container {
            return false;
        }
        self.rebuild(container);
        log::info!(
            "Meadow rebuilt at {:.0}x{:.0}",
            container.width,
            container.height
        );
        true
    }

    /// Frame callback. `timestamp` is the host's monotonic clock in ms.
    /// Returns true while the scene wants another frame.
    pub fn on_frame(&mut self, timestamp: f64) -> bool {
        if !self.running {
            return false;
        }

        let dt = self.frame_dt(timestamp);
        self.last_frame_at = Some(timestamp);
        self.clock += dt as f64;
        self.frames += 1;

        if let Some(chase) = &mut self.chase {
            chase.update(&mut self.agents, dt, &self.config.chase, &mut self.rng);
        }

        let ctx = StepContext {
            dt,
            now: self.clock,
            container: self.container,
            props: &self.props,
            tuning: &self.config.agents,
        };
        for agent in &mut self.agents {
            agent.update(&ctx, &mut self.rng);
        }

        true
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    #[cfg(test)]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Kinds of the (chaser, quarry) pair while a chase is running.
    pub fn chase_pair(&self) -> Option<(AgentKind, AgentKind)> {
        let (chaser, quarry) = self.chase.as_ref()?.active_pair()?;
        Some((self.agents.get(chaser)?.kind, self.agents.get(quarry)?.kind))
    }

    /// Per-agent render state for the current frame, in roster order.
    pub fn agent_views(&self) -> impl Iterator<Item = AgentView> + '_ {
        self.agents
            .iter()
            .map(|a| a.view(self.clock, &self.config.agents))
    }

    pub fn container(&self) -> Container {
        self.container
    }

    /// Scene time in ms.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// How many times props and agents have been (re)built.
    pub fn build_count(&self) -> u64 {
        self.builds
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    fn frame_dt(&self, timestamp: f64) -> f32 {
        let raw = self
            .last_frame_at
            .map(|last| (timestamp - last) as f32)
            .filter(|gap| *gap > 0.0)
            .unwrap_or(self.config.nominal_dt);
        raw.min(self.config.max_dt)
    }

    /// Clear and replant props, then respawn the roster. Placement always
    /// happens before any agent exists.
    fn rebuild(&mut self, container: Container) {
        self.container = container;
        self.props.clear();
        self.agents.clear();

        let count = self.config.prop_count.count_for(container.width);
        let placement = props::place(
            count,
            container.width,
            container.height,
            &self.config.placement,
            &mut self.rng,
        );
        if placement.exhausted > 0 {
            log::debug!(
                "{} of {} mushrooms overlap after exhausting placement tries",
                placement.exhausted,
                count
            );
        }
        self.props = placement.props;
        self.agents = spawn_roster(container, &self.config.agents, &mut self.rng);
        self.chase = Some(ChaseDirector::new(&self.config.chase, &mut self.rng));
        self.builds += 1;
    }
}
