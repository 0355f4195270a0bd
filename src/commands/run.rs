use std::time::Duration;

use chrono::Utc;
use clap::{ArgAction, Args};
use gridlife::{ActionStats, GenerationSummary, SimConfig, Simulation};

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Number of ticks to run
    #[arg(short = 't', long, default_value_t = 1000)]
    pub ticks: u64,
    /// Print the final world snapshot as JSON
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    pub json: bool,
    /// Print the final board as text
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    pub board: bool,
    /// Delay between ticks in milliseconds
    #[arg(short = 'd', long, default_value_t = 0)]
    pub delay_ms: u64,
}

pub(super) fn run_sim(mut config: SimConfig, args: RunArgs) -> Result<(), String> {
    // Always run seeded so the printed seed reproduces this run.
    let seed = *config.seed.get_or_insert_with(rand::random::<u64>);
    let mut sim = Simulation::new(config.clone()).map_err(|e| e.to_string())?;

    println!(
        "Run started {} | seed={} | board {}x{} | agents={} food={} walls={} | generation every {} tick(s)",
        Utc::now().to_rfc3339(),
        seed,
        config.board_width,
        config.board_height,
        config.agents,
        config.food,
        config.walls,
        config.generation_ticks
    );

    let delay = Duration::from_millis(args.delay_ms);
    for _ in 0..args.ticks {
        let report = sim.step();
        if let Some(summary) = report.generation {
            print_generation(&summary);
        }

        if delay > Duration::ZERO {
            std::thread::sleep(delay);
        }
    }

    let world = sim.world();
    println!(
        "Finished at tick {} | generation {} | alive {}/{}",
        world.tick(),
        world.generation(),
        world.alive_count(),
        world.agents().len()
    );
    print_action_summary(sim.stats());

    let snapshot = sim.snapshot();
    if args.board {
        print!("{}", snapshot.render_text());
    }
    if args.json {
        let json = snapshot.to_json().map_err(|e| e.to_string())?;
        println!("{}", json);
    }

    Ok(())
}

fn print_generation(summary: &GenerationSummary) {
    println!(
        "Generation {} | ticks={} survivors={}/{} mean_health={:.1} food_eaten={}{}",
        summary.generation,
        summary.ticks,
        summary.survivors,
        summary.population,
        summary.mean_health,
        summary.food_eaten,
        if summary.reseeded { " (reseeded)" } else { "" }
    );
}

fn print_action_summary(stats: &ActionStats) {
    if stats.total() == 0 {
        println!("No actions recorded.");
        return;
    }

    println!(
        "Actions | sleep={} step={} eat={} attack={} turn_left={} turn_right={}",
        stats.sleep_count,
        stats.step_count,
        stats.eat_count,
        stats.attack_count,
        stats.turn_left_count,
        stats.turn_right_count
    );
}
