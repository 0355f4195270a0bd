use serde::{Deserialize, Serialize};

use crate::modules::brain::Brain;
use crate::modules::coord::{Board, Coord, Direction};
use crate::modules::world::World;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub index: usize,
    pub position: Coord,
    pub facing: Direction,
    pub health: i32,
    pub alive: bool,
    pub brain: Brain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodSnapshot {
    pub position: Coord,
    pub eaten: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSnapshot {
    pub position: Coord,
}

/// Read-only copy of a world between ticks, for whatever draws it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub generation: u64,
    pub width: i32,
    pub height: i32,
    pub agents: Vec<AgentSnapshot>,
    pub food: Vec<FoodSnapshot>,
    pub walls: Vec<WallSnapshot>,
}

impl WorldSnapshot {
    pub fn from_world(world: &World) -> Self {
        let board = world.board();
        let agents = world
            .agents()
            .iter()
            .enumerate()
            .map(|(index, a)| AgentSnapshot {
                index,
                position: a.position,
                facing: a.facing,
                health: a.health,
                alive: a.is_alive(),
                brain: a.brain.clone(),
            })
            .collect();
        let food = world
            .food()
            .iter()
            .map(|f| FoodSnapshot {
                position: f.position,
                eaten: f.eaten,
            })
            .collect();
        let walls = world
            .walls()
            .iter()
            .map(|w| WallSnapshot {
                position: w.position,
            })
            .collect();

        WorldSnapshot {
            tick: world.tick(),
            generation: world.generation(),
            width: board.width,
            height: board.height,
            agents,
            food,
            walls,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// One character per cell, one line per row. Living agents show their
    /// facing and cover anything beneath them; then food, walls, and dead
    /// agents as `x`.
    pub fn render_text(&self) -> String {
        let board = Board::new(self.width, self.height);
        let width = self.width.max(0) as usize;
        let height = self.height.max(0) as usize;
        let mut cells = vec!['.'; width * height];
        let mut paint = |pos: Coord, glyph: char| {
            if board.contains(pos) {
                cells[pos.y as usize * width + pos.x as usize] = glyph;
            }
        };

        for agent in self.agents.iter().filter(|a| !a.alive) {
            paint(agent.position, 'x');
        }
        for wall in &self.walls {
            paint(wall.position, '#');
        }
        for food in self.food.iter().filter(|f| !f.eaten) {
            paint(food.position, '*');
        }
        for agent in self.agents.iter().filter(|a| a.alive) {
            paint(agent.position, agent.facing.glyph());
        }

        let mut out = String::with_capacity((width + 1) * height);
        for row in cells.chunks(width.max(1)) {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}
