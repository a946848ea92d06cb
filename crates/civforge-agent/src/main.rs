//! civforge-agent: run a CivForge agent from the command line
//!
//! Observes the configured world and submits one action for the agent's unit.

use anyhow::{Context, Result};
use civforge_core::{AgentClient, AgentConfig, ConfigSource};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "civforge-agent")]
#[command(about = "Observe and act in a CivForge world", version)]
struct Args {
    /// World service base URL
    #[arg(long, env = "CIVFORGE_HTTP", global = true)]
    http: Option<String>,

    #[arg(long, env = "AGENT_ID", global = true)]
    agent_id: Option<String>,

    #[arg(long, env = "AGENT_KEY", hide_env_values = true, global = true)]
    agent_key: Option<String>,

    /// World to observe and act in [default: public]
    #[arg(long, env = "CIVFORGE_WORLD", global = true)]
    world: Option<String>,

    /// Path to civforge.toml (searched for in parent directories otherwise)
    #[arg(long, env = "CIVFORGE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

const DEFAULT_ACTION: &str = "gather";
const DEFAULT_PAYLOAD: &str = "{}";

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Observe, then submit one action for the observed unit (default)
    Step {
        /// Action type
        #[arg(long, default_value = DEFAULT_ACTION)]
        action: String,

        /// Action payload as a JSON object
        #[arg(long, default_value = DEFAULT_PAYLOAD)]
        payload: String,
    },

    /// Print the current observation
    Observe,
}

impl Commands {
    /// What runs when no subcommand is given
    fn default_step() -> Self {
        Commands::Step {
            action: DEFAULT_ACTION.to_string(),
            payload: DEFAULT_PAYLOAD.to_string(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&args)?;
    let world_id = config.world_id().to_string();
    let client = AgentClient::new(config)?;

    match args.command.unwrap_or_else(Commands::default_step) {
        Commands::Observe => run_observe(&client, &world_id),
        Commands::Step { action, payload } => run_step(&client, &world_id, &action, &payload),
    }
}

fn resolve_config(args: &Args) -> Result<AgentConfig> {
    let overrides = ConfigSource {
        http: args.http.clone(),
        agent_id: args.agent_id.clone(),
        agent_key: args.agent_key.clone(),
        world_id: args.world.clone(),
    };

    let file = match args.config.clone().or_else(ConfigSource::find_config_path) {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            ConfigSource::load_from(&path)?
        }
        None => ConfigSource::default(),
    };

    let config = overrides.or(file).resolve()?;
    info!(
        base_url = config.base_url(),
        agent_id = config.agent_id(),
        world_id = config.world_id(),
        "configuration resolved"
    );
    Ok(config)
}

fn run_observe(client: &AgentClient, world_id: &str) -> Result<()> {
    let observation = client
        .observe(world_id)
        .context("failed to fetch observation")?;

    println!("{}", serde_json::to_string_pretty(&observation)?);
    Ok(())
}

fn run_step(client: &AgentClient, world_id: &str, action: &str, payload: &str) -> Result<()> {
    let payload: Map<String, Value> =
        serde_json::from_str(payload).context("--payload must be a JSON object")?;

    let result = client
        .step(world_id, action, payload)
        .with_context(|| format!("{action} step failed"))?;

    println!("{result}");
    Ok(())
}
