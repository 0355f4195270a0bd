use clap::{ArgAction, Subcommand};
use gridlife::Simulation;

use super::ConfigArgs;

#[derive(Subcommand)]
pub enum WorldCommand {
    /// Initialize a world and print it without running any ticks
    Init {
        #[command(flatten)]
        config: ConfigArgs,
        /// Print the snapshot JSON instead of the text board
        #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
        json: bool,
    },
    /// Print the effective configuration as JSON
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

pub(super) fn run_world(cmd: WorldCommand) -> Result<(), String> {
    match cmd {
        WorldCommand::Init { config, json } => {
            let config = config.resolve()?;
            let sim = Simulation::new(config).map_err(|e| e.to_string())?;
            let snapshot = sim.snapshot();

            if json {
                let json_str = snapshot.to_json().map_err(|e| e.to_string())?;
                println!("{}", json_str);
            } else {
                println!(
                    "World {}x{} | agents={} | food={} | walls={}",
                    snapshot.width,
                    snapshot.height,
                    snapshot.agents.len(),
                    snapshot.food.len(),
                    snapshot.walls.len()
                );
                print!("{}", snapshot.render_text());
            }
        }
        WorldCommand::Config { config } => {
            let config = config.resolve()?;
            let json_str = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
            println!("{}", json_str);
        }
    }

    Ok(())
}
