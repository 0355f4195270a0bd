use std::collections::HashSet;

use rand::Rng;
use tracing::info;

use crate::modules::brain::Brain;
use crate::modules::config::{ConfigError, SimConfig};
use crate::modules::coord::{Board, Coord, Direction};

#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub position: Coord,
    pub facing: Direction,
    /// Hit points. Attacks may push this below zero.
    pub health: i32,
    pub brain: Brain,
}

impl Agent {
    pub fn new(position: Coord, facing: Direction, health: i32, brain: Brain) -> Self {
        Self {
            position,
            facing,
            health,
            brain,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    pub position: Coord,
    pub eaten: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wall {
    pub position: Coord,
}

/// The board and everything on it. Agents, food and walls are addressed
/// by their index in the owning collection.
#[derive(Clone, Debug)]
pub struct World {
    pub(crate) config: SimConfig,
    pub(crate) tick: u64,
    pub(crate) generation: u64,
    pub(crate) generation_tick: u64,
    pub(crate) agents: Vec<Agent>,
    pub(crate) food: Vec<Food>,
    pub(crate) walls: Vec<Wall>,
}

impl World {
    /// Validate `config` and populate a fresh board: agents first, then
    /// food, then walls, each on a distinct random cell.
    pub fn new(config: SimConfig, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World {
            agents: Vec::with_capacity(config.agents),
            food: Vec::with_capacity(config.food),
            walls: Vec::with_capacity(config.walls),
            tick: 0,
            generation: 0,
            generation_tick: 0,
            config,
        };

        for _ in 0..world.config.agents {
            let agent = world.random_agent(Brain::initial(), rng);
            world.agents.push(agent);
        }
        for _ in 0..world.config.food {
            let position = world.place(rng);
            world.food.push(Food {
                position,
                eaten: false,
            });
        }
        for _ in 0..world.config.walls {
            let position = world.place(rng);
            world.walls.push(Wall { position });
        }

        info!(
            width = world.config.board_width,
            height = world.config.board_height,
            agents = world.agents.len(),
            food = world.food.len(),
            walls = world.walls.len(),
            "world initialized"
        );
        Ok(world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn board(&self) -> Board {
        self.config.board()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticks lived by the current generation.
    pub fn generation_tick(&self) -> u64 {
        self.generation_tick
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// Index of the uneaten food at `coord`, if any.
    pub fn food_at(&self, coord: Coord) -> Option<usize> {
        self.food
            .iter()
            .position(|f| !f.eaten && f.position == coord)
    }

    pub fn wall_at(&self, coord: Coord) -> bool {
        self.walls.iter().any(|w| w.position == coord)
    }

    /// Lowest-index living agent at `coord`, skipping `exclude`.
    pub fn agent_at(&self, coord: Coord, exclude: Option<usize>) -> Option<usize> {
        self.agents
            .iter()
            .enumerate()
            .find(|(idx, a)| Some(*idx) != exclude && a.is_alive() && a.position == coord)
            .map(|(idx, _)| idx)
    }

    /// Cells that block placement: every agent, uneaten food and walls.
    fn occupied_cells(&self) -> HashSet<Coord> {
        self.agents
            .iter()
            .map(|a| a.position)
            .chain(self.food.iter().filter(|f| !f.eaten).map(|f| f.position))
            .chain(self.walls.iter().map(|w| w.position))
            .collect()
    }

    /// Uniform draw over the board, resampled until it lands on a free
    /// cell. `None` when the board is already full.
    pub fn random_empty_coord(&self, rng: &mut impl Rng) -> Option<Coord> {
        let board = self.board();
        let occupied = self.occupied_cells();
        if occupied.len() as i64 >= board.cells() {
            return None;
        }

        loop {
            let coord = board.random_coord(rng);
            if !occupied.contains(&coord) {
                return Some(coord);
            }
        }
    }

    fn place(&self, rng: &mut impl Rng) -> Coord {
        // Capacity is validated before any placement, so the fallback only
        // fires if callers bypass SimConfig::validate.
        match self.random_empty_coord(rng) {
            Some(coord) => coord,
            None => self.board().random_coord(rng),
        }
    }

    /// A full-health agent with the given brain on a free cell, facing a
    /// random direction.
    pub(crate) fn random_agent(&self, brain: Brain, rng: &mut impl Rng) -> Agent {
        let position = self.place(rng);
        let facing = Direction::random(rng);
        Agent::new(position, facing, self.config.health_max, brain)
    }
}
