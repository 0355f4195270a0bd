use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::modules::brain::{Action, Brain, Env};
use crate::modules::config::{ConfigError, SimConfig};
use crate::modules::coord::Coord;
use crate::modules::execute::apply;
use crate::modules::perception::perceive;
use crate::modules::stats::{ActionStats, GenerationSummary};
use crate::modules::view::WorldSnapshot;
use crate::modules::world::{Agent, World};

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    ActionTaken {
        agent: usize,
        env: Env,
        action: Action,
    },
    AgentMoved {
        agent: usize,
        from: Coord,
        to: Coord,
    },
    FoodEaten {
        agent: usize,
        food: usize,
        position: Coord,
    },
    AgentAttacked {
        attacker: usize,
        target: usize,
        damage: i32,
        remaining: i32,
    },
    AgentDied {
        agent: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub tick: TickReport,
    pub generation: Option<GenerationSummary>,
}

/// Drives a world: owns it together with the only random source used to
/// decide and breed.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    rng: StdRng,
    stats: ActionStats,
}

impl Simulation {
    /// Build a world from `config`, seeding the RNG from `config.seed` when
    /// present and from entropy otherwise.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: SimConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        let world = World::new(config, &mut rng)?;
        Ok(Self {
            world,
            rng,
            stats: ActionStats::default(),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn stats(&self) -> &ActionStats {
        &self.stats
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::from_world(&self.world)
    }

    /// One pass over every living agent in index order: perceive, choose,
    /// act. Later agents see the effects of earlier ones within the same
    /// tick. Hunger is applied once everyone has acted.
    pub fn tick(&mut self) -> TickReport {
        let tick = self.world.tick + 1;
        let mut events = Vec::new();

        for index in 0..self.world.agents.len() {
            if !self.world.agents[index].is_alive() {
                continue;
            }

            let env = perceive(&self.world, index);
            let action = self.world.agents[index]
                .brain
                .choose_action(env, &mut self.rng);
            trace!(tick, agent = index, %env, %action, "agent acts");
            events.push(Event::ActionTaken {
                agent: index,
                env,
                action,
            });
            events.extend(apply(&mut self.world, index, action));
        }

        events.extend(self.apply_hunger());

        self.world.tick = tick;
        self.world.generation_tick += 1;
        self.stats.record_events(&events);

        debug!(
            tick,
            alive = self.world.alive_count(),
            events = events.len(),
            "tick completed"
        );

        TickReport { tick, events }
    }

    fn apply_hunger(&mut self) -> Vec<Event> {
        let hunger = self.world.config.hunger_damage;
        let mut events = Vec::new();
        if hunger == 0 {
            return events;
        }

        for (index, agent) in self.world.agents.iter_mut().enumerate() {
            if !agent.is_alive() {
                continue;
            }
            agent.health = agent.health.saturating_sub(hunger);
            if !agent.is_alive() {
                events.push(Event::AgentDied { agent: index });
            }
        }
        events
    }

    /// Tick once, then turn the generation over when it has lived
    /// `generation_ticks` ticks or nobody is left alive.
    pub fn step(&mut self) -> StepReport {
        let tick = self.tick();

        let period = self.world.config.generation_ticks;
        let expired = period > 0 && self.world.generation_tick >= period;
        let extinct = !self.world.agents.is_empty() && self.world.alive_count() == 0;
        let generation = (expired || extinct).then(|| self.advance_generation());

        StepReport { tick, generation }
    }

    /// Breed the next generation from agents that are still alive.
    pub fn advance_generation(&mut self) -> GenerationSummary {
        self.advance_generation_with(Agent::is_alive)
    }

    /// Replace the population with mutated copies of the agents matching
    /// `fitness`, cycling through them in index order until the configured
    /// population size is reached. Every child gets full health and a fresh
    /// position and facing. With no survivors the population restarts from
    /// the initial brain. Eaten food is restocked in place.
    pub fn advance_generation_with<F>(&mut self, fitness: F) -> GenerationSummary
    where
        F: Fn(&Agent) -> bool,
    {
        let outgoing = &self.world.agents;
        let survivors: Vec<Brain> = outgoing
            .iter()
            .filter(|a| fitness(a))
            .map(|a| a.brain.clone())
            .collect();
        let mean_health = if outgoing.is_empty() {
            0.0
        } else {
            outgoing.iter().map(|a| a.health as f64).sum::<f64>() / outgoing.len() as f64
        };
        let food_eaten = self.world.food.iter().filter(|f| f.eaten).count();

        let summary = GenerationSummary {
            generation: self.world.generation,
            ticks: self.world.generation_tick,
            population: outgoing.len(),
            survivors: survivors.len(),
            mean_health,
            food_eaten,
            reseeded: survivors.is_empty(),
        };

        for food in &mut self.world.food {
            food.eaten = false;
        }
        self.world.agents.clear();

        let population = self.world.config.agents;
        let delta = self.world.config.mutation_delta;
        let weight_max = self.world.config.weight_max;
        for slot in 0..population {
            let brain = if survivors.is_empty() {
                Brain::initial()
            } else {
                survivors[slot % survivors.len()].mutate(&mut self.rng, delta, weight_max)
            };
            let child = self.world.random_agent(brain, &mut self.rng);
            self.world.agents.push(child);
        }

        self.world.generation += 1;
        self.world.generation_tick = 0;

        info!(
            generation = summary.generation,
            ticks = summary.ticks,
            survivors = summary.survivors,
            population = summary.population,
            mean_health = summary.mean_health,
            food_eaten = summary.food_eaten,
            reseeded = summary.reseeded,
            "generation advanced"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::coord::Direction;
    use crate::modules::world::Food;
    use std::collections::HashSet;

    fn seeded(seed: u64) -> Simulation {
        let config = SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        };
        Simulation::new(config).unwrap()
    }

    fn agent_states(sim: &Simulation) -> Vec<(Coord, Direction, i32)> {
        sim.world()
            .agents()
            .iter()
            .map(|a| (a.position, a.facing, a.health))
            .collect()
    }

    #[test]
    fn thousand_ticks_are_reproducible() {
        let mut a = seeded(1234);
        let mut b = seeded(1234);

        for _ in 0..1000 {
            let ta = a.tick();
            let tb = b.tick();
            assert_eq!(ta, tb);
            assert_eq!(agent_states(&a), agent_states(&b));
        }
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn stepping_with_generations_is_reproducible() {
        let mut a = seeded(99);
        let mut b = seeded(99);

        for _ in 0..1000 {
            assert_eq!(a.step(), b.step());
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.world().generation(), 10);
    }

    #[test]
    fn every_living_agent_acts_once_per_tick() {
        let mut sim = seeded(5);
        sim.world_mut().agents[2].health = 0;

        let report = sim.tick();

        let actors: Vec<usize> = report
            .events
            .iter()
            .filter_map(|e| match e {
                Event::ActionTaken { agent, .. } => Some(*agent),
                _ => None,
            })
            .collect();
        assert_eq!(actors, vec![0, 1, 3]);
        assert_eq!(report.tick, 1);
        assert_eq!(sim.world().tick(), 1);
        assert_eq!(sim.stats().total(), 3);
    }

    #[test]
    fn later_agents_see_moves_made_earlier_in_the_tick() {
        let mut sim = seeded(21);
        let mut walker = Brain::empty();
        walker.set_weight(Env::Nothing, Action::Step, 1.0);
        let mut fighter = Brain::empty();
        fighter.set_weight(Env::Agent, Action::Attack, 1.0);
        {
            let world = sim.world_mut();
            world.agents.truncate(2);
            world.food.clear();
            world.walls.clear();
            world.agents[0].position = Coord::new(0, 0);
            world.agents[0].facing = Direction::Right;
            world.agents[0].brain = walker;
            world.agents[1].position = Coord::new(1, 1);
            world.agents[1].facing = Direction::Up;
            world.agents[1].brain = fighter;
        }

        let report = sim.tick();

        let world = sim.world();
        assert_eq!(world.agents()[0].position, Coord::new(1, 0));
        assert_eq!(
            world.agents()[0].health,
            world.config().health_max - world.config().attack_damage
        );
        assert!(report.events.contains(&Event::ActionTaken {
            agent: 1,
            env: Env::Agent,
            action: Action::Attack,
        }));
    }

    #[test]
    fn brain_with_only_eat_consumes_food_ahead() {
        let mut sim = seeded(8);
        let mut glutton = Brain::empty();
        glutton.set_weight(Env::Food, Action::Eat, 1.0);
        {
            let world = sim.world_mut();
            world.agents.truncate(1);
            world.agents[0].brain = glutton;
            world.agents[0].health = 50;
            let ahead = world
                .board()
                .cell_in_front(world.agents[0].position, world.agents[0].facing);
            world.walls.clear();
            world.food = vec![Food {
                position: ahead,
                eaten: false,
            }];
        }

        let report = sim.tick();

        assert!(sim.world().food()[0].eaten);
        assert_eq!(sim.world().agents()[0].health, 60);
        assert!(report.events.contains(&Event::ActionTaken {
            agent: 0,
            env: Env::Food,
            action: Action::Eat,
        }));
    }

    #[test]
    fn hunger_drains_and_kills() {
        let config = SimConfig {
            hunger_damage: 30,
            generation_ticks: 0,
            seed: Some(3),
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        for agent in &mut sim.world_mut().agents {
            agent.brain = Brain::empty();
        }

        for _ in 0..3 {
            sim.tick();
        }
        assert!(sim.world().agents().iter().all(|a| a.health == 10));

        let report = sim.tick();
        assert_eq!(sim.world().alive_count(), 0);
        let deaths = report
            .events
            .iter()
            .filter(|e| matches!(e, Event::AgentDied { .. }))
            .count();
        assert_eq!(deaths, 4);
    }

    #[test]
    fn generation_breeds_from_survivors() {
        let mut sim = seeded(21);
        let mut marked = Brain::initial();
        marked.set_weight(Env::Wall, Action::TurnLeft, 50.0);
        {
            let world = sim.world_mut();
            world.agents[0].brain = marked.clone();
            world.agents[0].health = 40;
            for agent in world.agents.iter_mut().skip(1) {
                agent.health = -10;
            }
            world.food[0].eaten = true;
            world.generation_tick = 17;
        }

        let summary = sim.advance_generation();

        assert_eq!(summary.generation, 0);
        assert_eq!(summary.ticks, 17);
        assert_eq!(summary.survivors, 1);
        assert_eq!(summary.population, 4);
        assert_eq!(summary.food_eaten, 1);
        assert!(!summary.reseeded);
        assert!((summary.mean_health - 10.0 / 4.0).abs() < 1e-9);

        let world = sim.world();
        assert_eq!(world.generation(), 1);
        assert_eq!(world.generation_tick(), 0);
        assert_eq!(world.agents().len(), 4);
        assert!(world.food().iter().all(|f| !f.eaten));
        for child in world.agents() {
            assert_eq!(child.health, world.config().health_max);
            let weight = child.brain.weight(Env::Wall, Action::TurnLeft).unwrap();
            assert!((weight - 50.0).abs() < world.config().mutation_delta);
            assert_eq!(child.brain.weight(Env::Wall, Action::Step), None);
        }

        let cells: HashSet<Coord> = world
            .agents()
            .iter()
            .map(|a| a.position)
            .chain(world.food().iter().map(|f| f.position))
            .chain(world.walls().iter().map(|w| w.position))
            .collect();
        assert_eq!(cells.len(), 12);
    }

    #[test]
    fn survivors_are_cycled_round_robin() {
        let config = SimConfig {
            agents: 5,
            mutation_delta: 0.0,
            seed: Some(4),
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        {
            let world = sim.world_mut();
            for (i, agent) in world.agents.iter_mut().enumerate() {
                agent.brain = Brain::empty();
                agent.brain.set_weight(Env::Nothing, Action::Step, i as f64);
                agent.health = if i == 1 || i == 3 { 100 } else { 0 };
            }
        }

        sim.advance_generation();

        let weights: Vec<f64> = sim
            .world()
            .agents()
            .iter()
            .map(|a| a.brain.weight(Env::Nothing, Action::Step).unwrap())
            .collect();
        assert_eq!(weights, vec![1.0, 3.0, 1.0, 3.0, 1.0]);
    }

    #[test]
    fn extinction_reseeds_from_initial_brain() {
        let mut sim = seeded(13);
        for agent in &mut sim.world_mut().agents {
            agent.health = 0;
        }

        let report = sim.step();

        let summary = report.generation.expect("extinct world must turn over");
        assert!(summary.reseeded);
        assert_eq!(summary.survivors, 0);
        assert_eq!(sim.world().alive_count(), 4);
        assert!(sim
            .world()
            .agents()
            .iter()
            .all(|a| a.brain == Brain::initial()));
    }

    #[test]
    fn custom_fitness_selects_survivors() {
        let mut sim = seeded(17);
        sim.world_mut().agents[3].health = 77;

        let summary = sim.advance_generation_with(|a| a.health == 77);

        assert_eq!(summary.survivors, 1);
        assert_eq!(sim.world().agents().len(), 4);
    }

    #[test]
    fn step_turns_over_on_schedule() {
        let config = SimConfig {
            generation_ticks: 3,
            seed: Some(2),
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();

        assert!(sim.step().generation.is_none());
        assert!(sim.step().generation.is_none());
        let summary = sim.step().generation.expect("third tick ends generation");
        assert_eq!(summary.ticks, 3);
        assert_eq!(sim.world().generation(), 1);
        assert_eq!(sim.world().tick(), 3);
    }
}
