use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::brain::{MUTATION_DELTA, WEIGHT_MAX};
use crate::modules::coord::Board;

pub const BOARD_WIDTH: i32 = 10;
pub const BOARD_HEIGHT: i32 = 10;
pub const AGENTS_COUNT: usize = 4;
pub const FOOD_COUNT: usize = 4;
pub const WALLS_COUNT: usize = 4;
pub const HEALTH_MAX: i32 = 100;
/// Hit points restored by eating one food item.
pub const FOOD_HEALTH_RECOVERY: i32 = 10;
pub const ATTACK_DAMAGE: i32 = 10;
/// Ticks per generation before survivors are bred.
pub const GENERATION_TICKS: u64 = 100;

/// Errors raised while validating a configuration or building a world.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board must be at least 1x1 (got {width}x{height})")]
    EmptyBoard { width: i32, height: i32 },
    #[error(
        "{agents} agents + {food} food + {walls} walls = {requested} entities do not fit on a {width}x{height} board ({cells} cells)"
    )]
    OverCapacity {
        agents: usize,
        food: usize,
        walls: usize,
        requested: u64,
        width: i32,
        height: i32,
        cells: i64,
    },
    #[error("health_max must be positive (got {0})")]
    HealthMax(i32),
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidFloat { field: &'static str, value: f64 },
    #[error("failed to read config {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("failed to parse config {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Static configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub board_width: i32,
    pub board_height: i32,
    pub agents: usize,
    pub food: usize,
    pub walls: usize,
    pub health_max: i32,
    pub food_recovery: i32,
    pub attack_damage: i32,
    /// Health every living agent loses at the end of a tick; 0 disables hunger.
    pub hunger_damage: i32,
    /// Ticks per generation; 0 only turns over once everyone is dead.
    pub generation_ticks: u64,
    pub mutation_delta: f64,
    pub weight_max: f64,
    /// Optional RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            agents: AGENTS_COUNT,
            food: FOOD_COUNT,
            walls: WALLS_COUNT,
            health_max: HEALTH_MAX,
            food_recovery: FOOD_HEALTH_RECOVERY,
            attack_damage: ATTACK_DAMAGE,
            hunger_damage: 0,
            generation_ticks: GENERATION_TICKS,
            mutation_delta: MUTATION_DELTA,
            weight_max: WEIGHT_MAX,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn board(&self) -> Board {
        Board::new(self.board_width, self.board_height)
    }

    pub fn entity_count(&self) -> u64 {
        self.agents as u64 + self.food as u64 + self.walls as u64
    }

    /// Read a JSON config file; missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width <= 0 || self.board_height <= 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.board_width,
                height: self.board_height,
            });
        }

        let cells = self.board().cells();
        let requested = self.entity_count();
        if requested > cells as u64 {
            return Err(ConfigError::OverCapacity {
                agents: self.agents,
                food: self.food,
                walls: self.walls,
                requested,
                width: self.board_width,
                height: self.board_height,
                cells,
            });
        }

        if self.health_max <= 0 {
            return Err(ConfigError::HealthMax(self.health_max));
        }
        for (field, value) in [
            ("food_recovery", self.food_recovery),
            ("attack_damage", self.attack_damage),
            ("hunger_damage", self.hunger_damage),
        ] {
            if value < 0 {
                return Err(ConfigError::Negative {
                    field,
                    value: value as i64,
                });
            }
        }
        for (field, value) in [
            ("mutation_delta", self.mutation_delta),
            ("weight_max", self.weight_max),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidFloat { field, value });
            }
        }

        Ok(())
    }
}
