//! Dragon treat mini-game: pick a dragon, feed it a treat, see what happens.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dragon {
    Ember,
    Storm,
    Moss,
}

impl Dragon {
    pub const ALL: [Dragon; 3] = [Self::Ember, Self::Storm, Self::Moss];

    pub fn key(self) -> &'static str {
        match self {
            Self::Ember => "ember",
            Self::Storm => "storm",
            Self::Moss => "moss",
        }
    }

    pub fn asset(self) -> &'static str {
        match self {
            Self::Ember => "assets/dragons/ember.png",
            Self::Storm => "assets/dragons/storm.png",
            Self::Moss => "assets/dragons/moss.png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treat {
    SpicyJerky,
    StardustBerry,
    Marshmallow,
}

impl Treat {
    pub const ALL: [Treat; 3] = [Self::SpicyJerky, Self::StardustBerry, Self::Marshmallow];

    pub fn key(self) -> &'static str {
        match self {
            Self::SpicyJerky => "spicyJerky",
            Self::StardustBerry => "stardustBerry",
            Self::Marshmallow => "marshmallow",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SpicyJerky => "Spicy jerky",
            Self::StardustBerry => "Stardust berry",
            Self::Marshmallow => "Marshmallow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Fire,
    Wings,
    Bite,
}

impl Outcome {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Wings => "wings",
            Self::Bite => "bite",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Fire => {
                "Your dragon learns FIRE BREATH 🔥 (it's a little dramatic but we love that)."
            }
            Self::Wings => "Your dragon grows WINGS 🪽. Congratulations: you may now ride.",
            Self::Bite => "Your dragon BITES you. Not hard. Just… disrespectfully.",
        }
    }

    /// Only winged dragons can be ridden.
    pub fn allows_ride(self) -> bool {
        self == Self::Wings
    }
}

/// Which screen the game is on. Derived from the selections, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ChoosingDragon,
    ChoosingTreat,
    ShowingResult,
}

/// Treat lookup. The dragon only changes the text, never the outcome.
pub fn resolve_outcome(_dragon: Dragon, treat: Treat) -> Outcome {
    match treat {
        Treat::SpicyJerky => Outcome::Fire,
        Treat::StardustBerry => Outcome::Wings,
        _ => Outcome::Bite,
    }
}

/// Optional lucky break: a specific dragon + treat pair that would bite gets
/// a chance to turn into a better outcome.
#[derive(Debug, Clone, Copy)]
pub struct UpgradeRule {
    pub dragon: Dragon,
    pub treat: Treat,
    pub upgrade_to: Outcome,
    /// Probability in [0, 1].
    pub chance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    /// Empty by default: outcomes are the plain lookup.
    pub upgrades: Vec<UpgradeRule>,
}

/// Everything the result screen shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultView {
    pub dragon: Dragon,
    pub treat: Treat,
    pub outcome: Outcome,
    pub show_ride: bool,
}

impl ResultView {
    pub fn headline(&self) -> String {
        format!("{} dragon chosen.", self.dragon.key().to_uppercase())
    }

    pub fn message(&self) -> &'static str {
        self.outcome.message()
    }

    /// Picture shown next to the result: the chosen dragon.
    pub fn asset(&self) -> &'static str {
        self.dragon.asset()
    }
}

const RIDE_TEXT: &str = "You ride into the night sky like a tiny legendary icon. ✨🪽🐉";

/// One play-through of the dragon game.
#[derive(Debug, Default)]
pub struct DragonGame {
    config: GameConfig,
    dragon: Option<Dragon>,
    treat: Option<Treat>,
    /// Set together with `treat`.
    outcome: Option<Outcome>,
    rode: bool,
}

impl DragonGame {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn step(&self) -> Step {
        match (self.dragon, self.treat) {
            (Some(_), Some(_)) => Step::ShowingResult,
            (Some(_), None) => Step::ChoosingTreat,
            _ => Step::ChoosingDragon,
        }
    }

    pub fn dragon(&self) -> Option<Dragon> {
        self.dragon
    }

    /// Pick a dragon. Ignored unless the game is on the dragon screen.
    pub fn select_dragon(&mut self, dragon: Dragon) -> bool {
        if self.step() != Step::ChoosingDragon {
            return false;
        }
        self.dragon = Some(dragon);
        true
    }

    /// Feed the chosen dragon. Ignored unless the game is on the treat
    /// screen. Returns the outcome when accepted.
    pub fn select_treat(&mut self, treat: Treat, rng: &mut fastrand::Rng) -> Option<Outcome> {
        if self.step() != Step::ChoosingTreat {
            return None;
        }
        let dragon = self.dragon?;

        let mut outcome = resolve_outcome(dragon, treat);
        if outcome == Outcome::Bite {
            if let Some(rule) = self
                .config
                .upgrades
                .iter()
                .find(|r| r.dragon == dragon && r.treat == treat)
            {
                if rng.f32() < rule.chance {
                    outcome = rule.upgrade_to;
                }
            }
        }

        self.treat = Some(treat);
        self.outcome = Some(outcome);
        log::info!(
            "{} dragon ate {}: {}",
            dragon.key(),
            treat.key(),
            outcome.tag()
        );
        Some(outcome)
    }

    /// Back to the first screen, from anywhere.
    pub fn reset(&mut self) {
        self.dragon = None;
        self.treat = None;
        self.outcome = None;
        self.rode = false;
    }

    pub fn result(&self) -> Option<ResultView> {
        match (self.dragon, self.treat, self.outcome) {
            (Some(dragon), Some(treat), Some(outcome)) => Some(ResultView {
                dragon,
                treat,
                outcome,
                show_ride: outcome.allows_ride(),
            }),
            _ => None,
        }
    }

    /// Take the winged dragon for a spin. Returns the flourish text, or
    /// `None` when there is nothing to ride.
    pub fn ride(&mut self) -> Option<&'static str> {
        let result = self.result()?;
        if !result.show_ride {
            return None;
        }
        self.rode = true;
        Some(RIDE_TEXT)
    }

    /// Flourish text once the dragon has been ridden, until the next reset.
    pub fn ride_text(&self) -> Option<&'static str> {
        self.rode.then_some(RIDE_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> fastrand::Rng {
        fastrand::Rng::with_seed(99)
    }

    #[test]
    fn outcome_ignores_dragon() {
        for dragon in Dragon::ALL {
            assert_eq!(resolve_outcome(dragon, Treat::SpicyJerky), Outcome::Fire);
            assert_eq!(resolve_outcome(dragon, Treat::StardustBerry), Outcome::Wings);
            assert_eq!(resolve_outcome(dragon, Treat::Marshmallow), Outcome::Bite);
        }
    }

    #[test]
    fn keyed_scenarios() {
        let cases = [
            (Dragon::Ember, Treat::SpicyJerky, "ember", "spicyJerky", "fire"),
            (Dragon::Moss, Treat::StardustBerry, "moss", "stardustBerry", "wings"),
            (Dragon::Storm, Treat::Marshmallow, "storm", "marshmallow", "bite"),
        ];
        for (dragon, treat, dragon_key, treat_key, expected) in cases {
            assert_eq!(dragon.key(), dragon_key);
            assert_eq!(treat.key(), treat_key);

            let mut game = DragonGame::default();
            assert!(game.select_dragon(dragon));
            let outcome = game.select_treat(treat, &mut rng()).unwrap();
            assert_eq!(outcome.tag(), expected);
            assert_eq!(game.step(), Step::ShowingResult);
        }
    }

    #[test]
    fn treat_before_dragon_is_ignored() {
        let mut game = DragonGame::default();
        assert_eq!(game.select_treat(Treat::SpicyJerky, &mut rng()), None);
        assert_eq!(game.step(), Step::ChoosingDragon);
        assert!(game.result().is_none());
    }

    #[test]
    fn out_of_order_selections_are_ignored() {
        let mut game = DragonGame::default();
        assert!(game.select_dragon(Dragon::Storm));
        assert!(!game.select_dragon(Dragon::Ember));
        assert_eq!(game.dragon(), Some(Dragon::Storm));

        game.select_treat(Treat::Marshmallow, &mut rng());
        assert_eq!(game.select_treat(Treat::SpicyJerky, &mut rng()), None);
        assert_eq!(game.result().unwrap().outcome, Outcome::Bite);
    }

    #[test]
    fn reset_from_every_step() {
        let mut game = DragonGame::default();
        game.reset();
        assert_eq!(game.step(), Step::ChoosingDragon);

        game.select_dragon(Dragon::Moss);
        game.reset();
        assert_eq!(game.step(), Step::ChoosingDragon);
        assert_eq!(game.dragon(), None);

        game.select_dragon(Dragon::Moss);
        game.select_treat(Treat::StardustBerry, &mut rng());
        game.ride();
        game.reset();
        assert_eq!(game.step(), Step::ChoosingDragon);
        assert!(game.result().is_none());
        assert_eq!(game.ride_text(), None);
    }

    #[test]
    fn ride_only_with_wings() {
        let mut game = DragonGame::default();
        game.select_dragon(Dragon::Ember);
        game.select_treat(Treat::SpicyJerky, &mut rng());
        assert!(!game.result().unwrap().show_ride);
        assert_eq!(game.ride(), None);

        game.reset();
        game.select_dragon(Dragon::Ember);
        game.select_treat(Treat::StardustBerry, &mut rng());
        let result = game.result().unwrap();
        assert!(result.show_ride);
        assert_eq!(result.headline(), "EMBER dragon chosen.");
        assert_eq!(result.asset(), "assets/dragons/ember.png");
        assert!(result.message().contains("WINGS"));
        assert_eq!(game.ride_text(), None);
        let text = game.ride().unwrap();
        assert_eq!(game.ride_text(), Some(text));
    }

    #[test]
    fn upgrade_rule_applies_only_to_its_pair() {
        let config = GameConfig {
            upgrades: vec![UpgradeRule {
                dragon: Dragon::Storm,
                treat: Treat::Marshmallow,
                upgrade_to: Outcome::Wings,
                chance: 1.0,
            }],
        };

        let mut game = DragonGame::new(config.clone());
        game.select_dragon(Dragon::Storm);
        assert_eq!(game.select_treat(Treat::Marshmallow, &mut rng()), Some(Outcome::Wings));

        let mut game = DragonGame::new(config.clone());
        game.select_dragon(Dragon::Moss);
        assert_eq!(game.select_treat(Treat::Marshmallow, &mut rng()), Some(Outcome::Bite));

        let mut never = config;
        never.upgrades[0].chance = 0.0;
        let mut game = DragonGame::new(never);
        game.select_dragon(Dragon::Storm);
        assert_eq!(game.select_treat(Treat::Marshmallow, &mut rng()), Some(Outcome::Bite));
    }
}
