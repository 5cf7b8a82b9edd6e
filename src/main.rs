//! Tactical Sim - Entry Point
//!
//! Builds the configuration from an optional TOML file plus command-line
//! overrides, connects the decision service, and runs the simulation loop,
//! printing the raw and DDIL-degraded feed after every tick.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tactical_sim::core::error::Result;
use tactical_sim::core::SimulationConfig;
use tactical_sim::llm::{DecisionService, LlmClient, LlmDecisionService, UnavailableService};
use tactical_sim::render::{display_feed, roster_table};
use tactical_sim::simulation::{Coordinator, SimulationDriver};

/// Generative tactical simulation with DDIL feed emulation
#[derive(Parser, Debug)]
#[command(name = "tactical-sim")]
#[command(about = "Run a red-vs-blue tactical simulation driven by LLM decisions")]
struct Args {
    /// TOML configuration file (defaults are used for anything missing)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario name
    #[arg(long)]
    scenario: Option<String>,

    /// Location (coordinates or place name)
    #[arg(long)]
    location: Option<String>,

    /// Initial situation description
    #[arg(long)]
    situation: Option<String>,

    /// Subordinate units per side
    #[arg(long)]
    units: Option<usize>,

    /// Number of ticks to run
    #[arg(long)]
    ticks: Option<u64>,

    /// DDIL severity (0 = clean link, 5+ = 50% loss)
    #[arg(long)]
    ddil_level: Option<i32>,

    /// Random seed for reproducible placement and movement
    #[arg(long)]
    seed: Option<u64>,

    /// Dispatch each side's squad decisions concurrently
    #[arg(long)]
    parallel: bool,

    /// Pause between ticks in milliseconds
    #[arg(long)]
    tick_delay_ms: Option<u64>,

    /// Read operator commands between ticks
    #[arg(long, short = 'i')]
    interactive: bool,

    /// Print unit positions after every tick
    #[arg(long)]
    show_roster: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tactical_sim=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let service = build_service(&config);
    let coordinator = Coordinator::from_config(&config, service);
    let mut driver = SimulationDriver::from_config(coordinator, &config);

    println!("==============================================");
    println!("  Generative AI Tactical Simulation");
    println!("==============================================");
    let scenario = driver.coordinator().scenario();
    println!("Scenario:  {}", scenario.scenario);
    println!("Location:  {}", scenario.location);
    println!("Situation: {}", scenario.situation);
    println!(
        "Units per side: {}, DDIL level: {}, ticks: {}",
        config.num_units, config.ddil_level, config.num_ticks
    );
    if args.interactive {
        println!();
        println!("Between ticks, enter commands (pause, rewind, fast forward,");
        println!("redirect <red|blue> force: <order>). Empty line continues, 'quit' stops.");
    }
    println!();

    let executed = driver.run(config.num_ticks, |driver, output| {
        if let Err(e) = render_step(driver, output, args.show_roster) {
            tracing::warn!(error = %e, "failed to render feed");
        }
        if !args.interactive {
            return true;
        }
        match read_commands(driver) {
            Ok(keep_going) => keep_going,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read command input");
                false
            }
        }
    });

    println!("\nSimulation completed after {} ticks.", executed);
    Ok(())
}

/// Merge the config file (if any) with command-line overrides
fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(name) = &args.scenario {
        config.scenario.name = name.clone();
    }
    if let Some(location) = &args.location {
        config.scenario.location = location.clone();
    }
    if let Some(situation) = &args.situation {
        config.scenario.situation = situation.clone();
    }
    if let Some(units) = args.units {
        config.num_units = units;
    }
    if let Some(ticks) = args.ticks {
        config.num_ticks = ticks;
    }
    if let Some(level) = args.ddil_level {
        config.ddil_level = level;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.parallel {
        config.parallel_decisions = true;
    }
    if let Some(delay) = args.tick_delay_ms {
        config.tick_duration_ms = delay;
    }

    config.validate()?;
    Ok(config)
}

/// Live LLM backend when credentials exist, otherwise a failing stub
fn build_service(config: &SimulationConfig) -> Arc<dyn DecisionService> {
    let client = match LlmClient::from_env(&config.llm) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("{} - every decision will be an error placeholder", e);
            return Arc::new(UnavailableService::new(e.to_string()));
        }
    };

    tracing::info!(model = client.model(), "using live decision service");
    match LlmDecisionService::new(client) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            tracing::warn!(error = %e, "could not start async runtime for LLM calls");
            Arc::new(UnavailableService::new(e.to_string()))
        }
    }
}

fn render_step(
    driver: &SimulationDriver,
    output: &tactical_sim::simulation::StepOutput,
    show_roster: bool,
) -> io::Result<()> {
    display_feed(&format!("Raw Feed - Tick {}", output.tick), &output.raw_feed)?;
    display_feed(
        &format!("DDIL Feed - Level {}", driver.ddil_level()),
        &output.degraded_feed,
    )?;
    if show_roster {
        println!("{}", roster_table(&driver.coordinator().forces()));
    }
    Ok(())
}

/// Returns `false` when the operator asks to stop
fn read_commands(driver: &mut SimulationDriver) -> io::Result<bool> {
    let stdin = io::stdin();
    loop {
        print!("command> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            return Ok(false);
        }
        let input = input.trim();

        match input {
            "" => return Ok(true),
            "quit" | "q" => return Ok(false),
            _ => {
                let coordinator = driver.coordinator_mut();
                coordinator.handle_command(input);
                if let Some(entry) = coordinator.log().last() {
                    println!("  {}", entry);
                }
            }
        }
    }
}
