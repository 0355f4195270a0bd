use serde::{Deserialize, Serialize};

use crate::modules::brain::Action;
use crate::modules::sim::Event;

/// How often each action was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStats {
    pub sleep_count: u64,
    pub step_count: u64,
    pub eat_count: u64,
    pub attack_count: u64,
    pub turn_left_count: u64,
    pub turn_right_count: u64,
}

impl ActionStats {
    pub fn record(&mut self, action: Action) {
        let counter = match action {
            Action::Sleep => &mut self.sleep_count,
            Action::Step => &mut self.step_count,
            Action::Eat => &mut self.eat_count,
            Action::Attack => &mut self.attack_count,
            Action::TurnLeft => &mut self.turn_left_count,
            Action::TurnRight => &mut self.turn_right_count,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn record_events(&mut self, events: &[Event]) {
        for event in events {
            if let Event::ActionTaken { action, .. } = event {
                self.record(*action);
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.sleep_count
            + self.step_count
            + self.eat_count
            + self.attack_count
            + self.turn_left_count
            + self.turn_right_count
    }
}

/// Outcome of one generation turnover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Number of the generation that just ended.
    pub generation: u64,
    pub ticks: u64,
    pub population: usize,
    pub survivors: usize,
    pub mean_health: f64,
    pub food_eaten: usize,
    /// True when nobody survived and the next population started from scratch.
    pub reseeded: bool,
}
