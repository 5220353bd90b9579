//! CLI entrypoint for standup
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use standup_application::ports::chat_events::ChatEventSink;
use standup_application::ports::memory_store::MemoryStore;
use standup_application::{NoChatEvents, SprintController};
use standup_domain::team::roles;
use standup_domain::{DEFAULT_COMPLETION_MARKER, SprintConfig, SprintStatus, Team};
use standup_infrastructure::{
    ConfigLoader, InMemoryStore, JsonFileStore, JsonlEventLog, ScriptedProvider, SprintExporter,
    ToolRegistry,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "standup", version, about = "Turn-based multi-agent sprint orchestration")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one sprint toward a goal
    Run {
        /// The sprint goal the team pursues
        #[arg(long)]
        goal: String,

        /// Team preset to assemble
        #[arg(long, value_enum, default_value_t = TeamPreset::Agile)]
        team: TeamPreset,

        /// Explicit config file (merged over project and global config)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the finished sprint result as JSON to this path
        #[arg(long)]
        export: Option<PathBuf>,

        /// Append structured run events to this JSONL file
        #[arg(long)]
        events: Option<PathBuf>,

        /// Override the execution iteration ceiling
        #[arg(long)]
        max_iterations: Option<u32>,

        /// Persist shared agent memory to this JSON file
        #[arg(long)]
        memory_file: Option<PathBuf>,

        /// Use the canned offline provider instead of a real backend
        #[arg(long)]
        offline: bool,
    },
    /// List the preset team roles
    Roles,
}

#[derive(Clone, Copy, ValueEnum)]
enum TeamPreset {
    Agile,
    SelfImproving,
}

/// Assemble the preset team on top of the configured sprint tuning
fn build_team(preset: TeamPreset, sprint: SprintConfig) -> Result<Team> {
    Ok(match preset {
        TeamPreset::Agile => Team::agile(sprint)?,
        TeamPreset::SelfImproving => Team::self_improving(sprint)?,
    })
}

#[allow(clippy::too_many_arguments)]
async fn run_sprint(
    goal: String,
    preset: TeamPreset,
    config_path: Option<PathBuf>,
    export: Option<PathBuf>,
    events: Option<PathBuf>,
    max_iterations: Option<u32>,
    memory_file: Option<PathBuf>,
    offline: bool,
) -> Result<()> {
    let config = ConfigLoader::load(config_path.as_ref())?;
    config.validate()?;

    let mut sprint_config = config.sprint.clone();
    if let Some(limit) = max_iterations {
        sprint_config = sprint_config.with_max_iterations(limit);
    }
    let team = build_team(preset, sprint_config)?;

    if !offline {
        bail!("no inference backend is configured yet; run with --offline");
    }
    let provider = Arc::new(ScriptedProvider::sprint_demo(&team.sprint.completion_marker));

    let memory: Arc<dyn MemoryStore> = match &memory_file {
        Some(path) => Arc::new(JsonFileStore::open(path)?),
        None => Arc::new(InMemoryStore::new()),
    };
    let tools = Arc::new(ToolRegistry::new(memory, team.name.clone()));

    let events_path = events.or(config.log.events_file.clone());
    let events_sink: Arc<dyn ChatEventSink> = match &events_path {
        Some(path) => match JsonlEventLog::new(path) {
            Some(log) => Arc::new(log),
            None => bail!("could not open events file {}", path.display()),
        },
        None => Arc::new(NoChatEvents),
    };

    // Ctrl-C aborts the sprint gracefully; partial results still come back.
    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, aborting sprint");
            ctrl_c_token.cancel();
        }
    });

    println!();
    println!("Sprint goal: {goal}");
    println!(
        "Team: {} ({} agents, capacity {} points, at most {} iterations)",
        team.name,
        team.roster.len(),
        team.sprint.capacity_points,
        team.sprint.max_iterations,
    );
    println!();

    let controller = SprintController::new(team, provider)
        .with_tools(tools)
        .with_events(events_sink)
        .with_params(config.turn.turn_params())
        .with_cancellation(cancellation);

    let result = controller.run(&goal).await?;

    println!("Sprint {} finished: {}", result.sprint_id, result.status);
    println!();
    for item in &result.backlog_snapshot {
        println!(
            "  {}  [{:<11}]  p{} {}pt  {}",
            item.id, item.status, item.priority, item.estimate, item.description
        );
    }
    if !result.blocked_items.is_empty() {
        println!();
        println!("Blocked: {}", result.blocked_items.join(", "));
    }
    if let Some(retrospective) = &result.retrospective {
        println!();
        println!("Retrospective: {retrospective}");
    }

    if let Some(path) = &export {
        SprintExporter::write(&result, path)?;
        println!();
        println!("Result exported to {}", path.display());
    }

    if result.status != SprintStatus::Completed {
        std::process::exit(1);
    }
    Ok(())
}

fn print_roles() {
    println!("Preset roles (speaking order):");
    println!();
    for agent in roles::standard_roster(DEFAULT_COMPLETION_MARKER) {
        println!("  {}", agent.id());
        println!("      {}", agent.role_description());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Command::Run {
            goal,
            team,
            config,
            export,
            events,
            max_iterations,
            memory_file,
            offline,
        } => {
            run_sprint(
                goal,
                team,
                config,
                export,
                events,
                max_iterations,
                memory_file,
                offline,
            )
            .await
        }
        Command::Roles => {
            print_roles();
            Ok(())
        }
    }
}
