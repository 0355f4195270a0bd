use crate::modules::brain::Env;
use crate::modules::world::World;

/// Classify the cell in front of agent `index`.
///
/// When several kinds share that cell, food wins over walls and walls win
/// over agents. Eaten food and dead agents are invisible. An unknown index
/// reads as `Nothing`.
pub fn perceive(world: &World, index: usize) -> Env {
    let Some(agent) = world.agent(index) else {
        return Env::Nothing;
    };

    let ahead = world.board().cell_in_front(agent.position, agent.facing);
    if world.food_at(ahead).is_some() {
        Env::Food
    } else if world.wall_at(ahead) {
        Env::Wall
    } else if world.agent_at(ahead, Some(index)).is_some() {
        Env::Agent
    } else {
        Env::Nothing
    }
}
