use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value, json};
use tracing::info;

use cogflow_builder::{GraphName, WorkflowBuilder};
use cogflow_config::{DeployConfig, Environment};
use cogflow_registry::{FsStateMachineRegistry, StateMachineRegistry, register_all};

/// cogflow - builds and registers the discovery, cogify and publication state machines
#[derive(Parser)]
#[command(name = "cogflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the deployment config file (JSON)
  #[arg(long, global = true, env = "COGFLOW_CONFIG", default_value = "cogflow.json")]
  config: PathBuf,

  /// Override the config file's environment (dev, stage, prod)
  #[arg(long = "env", global = true, env = "COGFLOW_ENV")]
  environment: Option<Environment>,

  /// Increase log verbosity (-v debug, -vv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Log output format
  #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
  log_format: LogFormat,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
  Text,
  Json,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the rendered state machine definitions
  Synth {
    /// Only print one graph (discovery, cogify, publication)
    #[arg(long)]
    graph: Option<GraphName>,
  },

  /// Register all state machines
  Deploy {
    /// Registry directory (default: ~/.cogflow/state-machines)
    #[arg(long, env = "COGFLOW_REGISTRY_DIR")]
    registry_dir: Option<PathBuf>,
  },

  /// Print the cogify and publication state machine ARNs
  Arns,

  /// List registered state machines
  List {
    /// Registry directory (default: ~/.cogflow/state-machines)
    #[arg(long, env = "COGFLOW_REGISTRY_DIR")]
    registry_dir: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose, cli.log_format);

  let Some(command) = cli.command else {
    println!("cogflow - use --help to see available commands");
    return Ok(());
  };

  let config = load_config(&cli.config, cli.environment)?;

  match command {
    Commands::Synth { graph } => synth(&config, graph)?,
    Commands::Deploy { registry_dir } => deploy(&config, registry_dir).await?,
    Commands::Arns => arns(&config)?,
    Commands::List { registry_dir } => list(&config, registry_dir).await?,
  }

  Ok(())
}

/// Logs go to stderr; command output goes to stdout.
fn init_tracing(verbose: u8, format: LogFormat) {
  use tracing_subscriber::{EnvFilter, fmt};

  let filter = match verbose {
    0 => "cogflow=info,cogflow_builder=info,cogflow_registry=info",
    1 => "cogflow=debug,cogflow_builder=debug,cogflow_registry=debug",
    _ => "trace",
  };

  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  match format {
    LogFormat::Text => fmt()
      .with_env_filter(env_filter)
      .with_writer(std::io::stderr)
      .with_target(false)
      .init(),
    LogFormat::Json => fmt()
      .json()
      .with_env_filter(env_filter)
      .with_writer(std::io::stderr)
      .init(),
  }
}

fn load_config(path: &Path, environment: Option<Environment>) -> Result<DeployConfig> {
  let config = DeployConfig::load(path)
    .with_context(|| format!("failed to load config: {}", path.display()))?;

  let config = match environment {
    Some(environment) => config.with_environment(environment),
    None => config,
  };

  info!(
    stack_id = %config.stack_id,
    environment = %config.environment,
    region = %config.region,
    "loaded config"
  );
  Ok(config)
}

fn registry_dir(registry_dir: Option<PathBuf>) -> Result<PathBuf> {
  match registry_dir {
    Some(dir) => Ok(dir),
    None => Ok(
      dirs::home_dir()
        .context("could not determine home directory")?
        .join(".cogflow")
        .join("state-machines"),
    ),
  }
}

fn synth(config: &DeployConfig, graph: Option<GraphName>) -> Result<()> {
  let workflows = WorkflowBuilder::from_config(config)
    .build_all()
    .context("failed to build workflows")?;

  let output = match graph {
    Some(graph) => workflows.get(graph).to_asl()?,
    None => {
      let mut definitions = Map::new();
      for (graph, machine) in workflows.iter() {
        definitions.insert(graph.key().to_string(), machine.to_asl()?);
      }
      Value::Object(definitions)
    }
  };

  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}

async fn deploy(config: &DeployConfig, dir: Option<PathBuf>) -> Result<()> {
  let workflows = WorkflowBuilder::from_config(config)
    .build_all()
    .context("failed to build workflows")?;

  let dir = registry_dir(dir)?;
  let registry = FsStateMachineRegistry::new(&dir, &config.region, &config.account_id);
  let registrations = register_all(&registry, &workflows)
    .await
    .with_context(|| format!("failed to register state machines in {}", dir.display()))?;

  let output: Map<String, Value> = registrations
    .into_iter()
    .map(|(graph, registration)| {
      let record = registration.state_machine;
      (
        graph.key().to_string(),
        json!({
          "name": record.name,
          "arn": record.arn,
          "construct_id": graph.construct_id(&config.stack_id),
          "digest": record.digest,
          "outcome": registration.outcome,
        }),
      )
    })
    .collect();

  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}

fn arns(config: &DeployConfig) -> Result<()> {
  let (cogify, publication) =
    WorkflowBuilder::from_config(config).get_arns(&config.account_id, &config.region);

  let output = json!({
    "cogify": cogify,
    "publication": publication,
  });
  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}

async fn list(config: &DeployConfig, dir: Option<PathBuf>) -> Result<()> {
  let dir = registry_dir(dir)?;
  let registry = FsStateMachineRegistry::new(&dir, &config.region, &config.account_id);

  let records = registry
    .list()
    .await
    .with_context(|| format!("failed to list state machines in {}", dir.display()))?;

  for record in records {
    println!("{}\t{}\t{}", record.name, record.arn, record.digest);
  }
  Ok(())
}
