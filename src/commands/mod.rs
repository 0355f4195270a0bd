use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use gridlife::SimConfig;

mod run;
mod world;

use run::{RunArgs, run_sim};
use world::{WorldCommand, run_world};

#[derive(Parser)]
#[command(
    name = "gridlife",
    version,
    about = "Grid-world agents with weighted brains, bred generation after generation",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the simulation headless for a number of ticks
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Inspect a freshly initialized world or the effective configuration
    World {
        #[command(subcommand)]
        command: WorldCommand,
    },
}

/// Configuration sources shared by every command. Flags override the JSON
/// file, which overrides the built-in defaults.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// JSON config file (missing fields use defaults)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Board size as WIDTHxHEIGHT (default 10x10)
    #[arg(long, value_name = "WxH")]
    pub size: Option<SizeArg>,
    /// Number of agents per generation
    #[arg(long)]
    pub agents: Option<usize>,
    /// Number of food items
    #[arg(long)]
    pub food: Option<usize>,
    /// Number of walls
    #[arg(long)]
    pub walls: Option<usize>,
    /// Ticks per generation (0 turns over only on extinction)
    #[arg(long)]
    pub generation_ticks: Option<u64>,
    /// Health every living agent loses per tick
    #[arg(long)]
    pub hunger_damage: Option<i32>,
    /// RNG seed for a reproducible run
    #[arg(short = 's', long)]
    pub seed: Option<u64>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<SimConfig, String> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path).map_err(|e| e.to_string())?,
            None => SimConfig::default(),
        };

        if let Some(SizeArg(width, height)) = self.size {
            config.board_width = width;
            config.board_height = height;
        }
        if let Some(agents) = self.agents {
            config.agents = agents;
        }
        if let Some(food) = self.food {
            config.food = food;
        }
        if let Some(walls) = self.walls {
            config.walls = walls;
        }
        if let Some(ticks) = self.generation_ticks {
            config.generation_ticks = ticks;
        }
        if let Some(hunger) = self.hunger_damage {
            config.hunger_damage = hunger;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeArg(pub i32, pub i32);

impl FromStr for SizeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .to_lowercase()
            .split_once('x')
            .map(|(w, h)| (w.to_string(), h.to_string()))
            .ok_or("size must be formatted as WIDTHxHEIGHT, e.g. 10x10")?;

        let width = w
            .trim()
            .parse::<i32>()
            .map_err(|_| "width must be an integer")?;
        let height = h
            .trim()
            .parse::<i32>()
            .map_err(|_| "height must be an integer")?;
        if width <= 0 || height <= 0 {
            return Err("width and height must be positive".into());
        }

        Ok(SizeArg(width, height))
    }
}

pub fn run() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli.command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(command: Command) -> Result<(), String> {
    match command {
        Command::Run { config, run } => run_sim(config.resolve()?, run),
        Command::World { command } => run_world(command),
    }
}
