use crate::modules::brain::Action;
use crate::modules::sim::Event;
use crate::modules::world::World;

/// Apply `action` for agent `index` and report what changed.
///
/// Misses are no-ops: eating with no food ahead, attacking an empty cell,
/// or an index past the end of the agent list.
pub fn apply(world: &mut World, index: usize, action: Action) -> Vec<Event> {
    let mut events = Vec::new();
    let board = world.board();
    let Some(agent) = world.agents.get(index) else {
        return events;
    };
    let ahead = board.cell_in_front(agent.position, agent.facing);

    match action {
        Action::Sleep => {}
        Action::Step => {
            let agent = &mut world.agents[index];
            let from = agent.position;
            agent.position = ahead;
            events.push(Event::AgentMoved {
                agent: index,
                from,
                to: ahead,
            });
        }
        Action::Eat => {
            if let Some(food) = world.food_at(ahead) {
                world.food[food].eaten = true;
                let max = world.config.health_max;
                let recovery = world.config.food_recovery;
                let agent = &mut world.agents[index];
                agent.health = agent.health.saturating_add(recovery).min(max);
                events.push(Event::FoodEaten {
                    agent: index,
                    food,
                    position: ahead,
                });
            }
        }
        Action::Attack => {
            if let Some(target) = world.agent_at(ahead, Some(index)) {
                let damage = world.config.attack_damage;
                let victim = &mut world.agents[target];
                victim.health = victim.health.saturating_sub(damage);
                let remaining = victim.health;
                events.push(Event::AgentAttacked {
                    attacker: index,
                    target,
                    damage,
                    remaining,
                });
                if remaining <= 0 {
                    events.push(Event::AgentDied { agent: target });
                }
            }
        }
        Action::TurnLeft => {
            let agent = &mut world.agents[index];
            agent.facing = agent.facing.turn(-1);
        }
        Action::TurnRight => {
            let agent = &mut world.agents[index];
            agent.facing = agent.facing.turn(1);
        }
    }

    events
}
