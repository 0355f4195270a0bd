use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound for a single action weight after mutation.
pub const WEIGHT_MAX: f64 = 100.0;
/// Mutation perturbs each weight by up to this much, either way.
pub const MUTATION_DELTA: f64 = 5.0;

/// What occupies the cell directly in front of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Nothing,
    Agent,
    Food,
    Wall,
}

impl Env {
    pub const ALL: [Env; 4] = [Env::Nothing, Env::Agent, Env::Food, Env::Wall];

    pub const fn label(self) -> &'static str {
        match self {
            Env::Nothing => "nothing",
            Env::Agent => "agent",
            Env::Food => "food",
            Env::Wall => "wall",
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Sleep,
    Step,
    Eat,
    Attack,
    TurnLeft,
    TurnRight,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Sleep,
        Action::Step,
        Action::Eat,
        Action::Attack,
        Action::TurnLeft,
        Action::TurnRight,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Action::Sleep => "sleep",
            Action::Step => "step",
            Action::Eat => "eat",
            Action::Attack => "attack",
            Action::TurnLeft => "turn_left",
            Action::TurnRight => "turn_right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Weighted action distribution for one environment reading.
///
/// Backed by a `BTreeMap`, so entries always iterate in `Action`
/// declaration order. Sampling depends on that order being fixed.
pub type Weights = BTreeMap<Action, f64>;

/// Per-agent table from environment reading to action weights.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    table: BTreeMap<Env, Weights>,
}

impl Brain {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The starting brain every first-generation agent receives: each
    /// environment gets the actions that make sense there, all at weight 1.
    pub fn initial() -> Self {
        let mut brain = Brain::empty();
        let seed: [(Env, &[Action]); 4] = [
            (
                Env::Nothing,
                &[Action::Step, Action::Sleep, Action::TurnLeft, Action::TurnRight],
            ),
            (
                Env::Agent,
                &[Action::Sleep, Action::Attack, Action::TurnLeft, Action::TurnRight],
            ),
            (
                Env::Food,
                &[Action::Eat, Action::Sleep, Action::TurnLeft, Action::TurnRight],
            ),
            (
                Env::Wall,
                &[Action::Sleep, Action::TurnLeft, Action::TurnRight],
            ),
        ];
        for (env, actions) in seed {
            for action in actions {
                brain.set_weight(env, *action, 1.0);
            }
        }
        brain
    }

    /// Store a weight for `action` under `env`. Negative and NaN weights
    /// are stored as 0 so sampling never sees them.
    pub fn set_weight(&mut self, env: Env, action: Action, weight: f64) {
        let weight = if weight.is_nan() { 0.0 } else { weight.max(0.0) };
        self.table.entry(env).or_default().insert(action, weight);
    }

    pub fn weight(&self, env: Env, action: Action) -> Option<f64> {
        self.table.get(&env)?.get(&action).copied()
    }

    pub fn weights(&self, env: Env) -> Option<&Weights> {
        self.table.get(&env)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Env, Action, f64)> + '_ {
        self.table
            .iter()
            .flat_map(|(env, weights)| weights.iter().map(move |(a, w)| (*env, *a, *w)))
    }

    pub fn len(&self) -> usize {
        self.table.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Roulette-wheel sample from the distribution for `env`.
    ///
    /// Entries are visited in `Action` order; a running remainder starts at
    /// the total and each entry subtracts its weight, returning as soon as
    /// the draw reaches the remainder. Missing, empty or zero-total
    /// distributions yield `Sleep`.
    pub fn choose_action(&self, env: Env, rng: &mut impl Rng) -> Action {
        let Some(weights) = self.table.get(&env) else {
            return Action::Sleep;
        };

        let total: f64 = weights.values().sum();
        if !(total > 0.0 && total.is_finite()) {
            return Action::Sleep;
        }

        let r = rng.gen_range(0.0..total);
        let mut remaining = total;
        let mut last = Action::Sleep;
        for (action, weight) in weights {
            remaining -= weight;
            last = *action;
            if r >= remaining {
                return *action;
            }
        }

        // Float rounding can leave the draw above every remainder.
        last
    }

    /// Copy of this brain with every existing weight nudged by a uniform
    /// amount in `[0, delta)` in a random direction, clamped to
    /// `[0, weight_max]`. No entries are added or removed.
    pub fn mutate(&self, rng: &mut impl Rng, delta: f64, weight_max: f64) -> Brain {
        let mut table = self.table.clone();
        for weights in table.values_mut() {
            for weight in weights.values_mut() {
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                let step = if delta > 0.0 {
                    rng.gen_range(0.0..delta)
                } else {
                    0.0
                };
                *weight = (*weight + sign * step).clamp(0.0, weight_max);
            }
        }
        Brain { table }
    }
}
