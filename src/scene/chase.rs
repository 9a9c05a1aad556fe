use crate::config::ChaseConfig;
use crate::scene::agent::{Agent, Mode};

/// Pairs two roaming agents for a short chase now and then.
///
/// Holds indices into the scene's roster; the scene drops the director on
/// rebuild so stale indices never outlive the roster they point into.
#[derive(Debug)]
pub struct ChaseDirector {
    /// Time until the next chase may start (ms).
    cooldown: f32,
    /// (chaser, quarry) while a chase is running.
    pair: Option<(usize, usize)>,
}

impl ChaseDirector {
    pub fn new(cfg: &ChaseConfig, rng: &mut fastrand::Rng) -> Self {
        Self {
            cooldown: cfg.cooldown.pick(rng),
            pair: None,
        }
    }

    pub fn active_pair(&self) -> Option<(usize, usize)> {
        self.pair
    }

    /// Run before the agents update. Keeps the chaser's target on the quarry
    /// and may start a new chase.
    pub fn update(
        &mut self,
        agents: &mut [Agent],
        dt: f32,
        cfg: &ChaseConfig,
        rng: &mut fastrand::Rng,
    ) {
        if !cfg.enabled {
            return;
        }

        if let Some((chaser, quarry)) = self.pair {
            let still_chasing = agents.get(chaser).is_some_and(|a| a.mode == Mode::Chase);
            match agents.get(quarry).map(|a| a.pos.x) {
                Some(target) if still_chasing => agents[chaser].retarget(target),
                _ => self.pair = None,
            }
            return;
        }

        self.cooldown -= dt;
        if self.cooldown > 0.0 || rng.f32() >= cfg.chance {
            return;
        }

        let roaming: Vec<usize> = agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.mode == Mode::Roam)
            .map(|(i, _)| i)
            .collect();
        if roaming.len() < 2 {
            return;
        }

        let chaser = roaming[rng.usize(0..roaming.len())];
        let quarry = loop {
            let pick = roaming[rng.usize(0..roaming.len())];
            if pick != chaser {
                break pick;
            }
        };

        let target = agents[quarry].pos.x;
        if agents[chaser].start_chase(target, cfg.duration.pick(rng)) {
            log::debug!(
                "{} cat chasing {} cat",
                agents[chaser].kind.label(),
                agents[quarry].kind.label()
            );
            self.pair = Some((chaser, quarry));
            self.cooldown = cfg.cooldown.pick(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentTuning, Range};
    use crate::geometry::Container;
    use crate::scene::agent::spawn_roster;

    fn roster(rng: &mut fastrand::Rng) -> Vec<Agent> {
        spawn_roster(Container::new(800.0, 600.0), &AgentTuning::default(), rng)
    }

    fn eager() -> ChaseConfig {
        ChaseConfig {
            enabled: true,
            chance: 1.0,
            cooldown: Range::new(0.0, 0.0),
            duration: Range::new(1_000.0, 1_000.0),
        }
    }

    #[test]
    fn starts_chase_between_two_roaming_agents() {
        let cfg = eager();
        let mut rng = fastrand::Rng::with_seed(21);
        let mut agents = roster(&mut rng);
        let mut director = ChaseDirector::new(&cfg, &mut rng);

        director.update(&mut agents, 16.0, &cfg, &mut rng);
        let (chaser, quarry) = director.active_pair().expect("chase should start");
        assert_ne!(chaser, quarry);
        // Grey starts sulking, so only orange and black can pair up.
        assert!(chaser < 2 && quarry < 2);
        assert_eq!(agents[chaser].mode, Mode::Chase);
        assert_eq!(agents[chaser].target, Some(agents[quarry].pos.x));
    }

    #[test]
    fn tracks_quarry_and_releases_when_chase_ends() {
        let cfg = eager();
        let mut rng = fastrand::Rng::with_seed(22);
        let mut agents = roster(&mut rng);
        let mut director = ChaseDirector::new(&cfg, &mut rng);
        director.update(&mut agents, 16.0, &cfg, &mut rng);
        let (chaser, quarry) = director.active_pair().expect("chase should start");

        agents[quarry].pos.x = 555.0;
        director.update(&mut agents, 16.0, &cfg, &mut rng);
        assert_eq!(agents[chaser].target, Some(555.0));

        agents[chaser].mode = Mode::Roam;
        director.update(&mut agents, 16.0, &cfg, &mut rng);
        assert_eq!(director.active_pair(), None);
    }

    #[test]
    fn disabled_director_never_pairs() {
        let cfg = ChaseConfig {
            enabled: false,
            ..eager()
        };
        let mut rng = fastrand::Rng::with_seed(23);
        let mut agents = roster(&mut rng);
        let mut director = ChaseDirector::new(&cfg, &mut rng);
        for _ in 0..100 {
            director.update(&mut agents, 16.0, &cfg, &mut rng);
        }
        assert_eq!(director.active_pair(), None);
        assert!(agents.iter().all(|a| a.mode != Mode::Chase));
    }
}
