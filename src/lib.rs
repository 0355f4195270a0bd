pub mod modules;

pub use modules::brain::{self, Action, Brain, Env, MUTATION_DELTA, WEIGHT_MAX, Weights};
pub use modules::config::{
    self, ATTACK_DAMAGE, ConfigError, FOOD_HEALTH_RECOVERY, HEALTH_MAX, SimConfig,
};
pub use modules::coord::{Board, Coord, Direction};
pub use modules::execute::apply;
pub use modules::perception::perceive;
pub use modules::sim::{Event, Simulation, StepReport, TickReport};
pub use modules::stats::{ActionStats, GenerationSummary};
pub use modules::view::{AgentSnapshot, FoodSnapshot, WallSnapshot, WorldSnapshot};
pub use modules::world::{self, Agent, Food, Wall, World};
