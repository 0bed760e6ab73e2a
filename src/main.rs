//! Command-line driver for the graphrun engine.

use argh::FromArgs;
use graphrun::GraphService;
use graphrun_engine::EngineConfig;
use graphrun_ir::{Graph, RunConfig};
use graphrun_utils::RunResult;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(FromArgs)]
/// Persistent data-flow graph engine
pub struct Opts {
    /// path to the graph JSON file
    #[argh(option, short = 'g', long = "graph")]
    pub graph: PathBuf,

    /// refuse runs whose projection is not a single component
    #[argh(switch, long = "require-connected")]
    require_connected: bool,

    /// log level: error, warn, info, debug, trace. default = warn
    #[argh(option, long = "log-level", default = "String::from(\"warn\")")]
    log_level: String,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Run(RunCommand),
    Islands(IslandsCommand),
    NodeValue(NodeValueCommand),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
/// Execute a run configuration and print the committed summary
struct RunCommand {
    /// path to the run configuration JSON file
    #[argh(positional)]
    config: PathBuf,

    /// also print the recorded data_out of these nodes
    #[argh(option, long = "node")]
    nodes: Vec<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "islands")]
/// Print the weakly connected components of the projection
struct IslandsCommand {
    /// path to the run configuration JSON file
    #[argh(positional)]
    config: PathBuf,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "node-value")]
/// Print a node's recorded data_out at a committed run
struct NodeValueCommand {
    /// node name
    #[argh(positional)]
    node: String,

    /// run identifier returned by `run`
    #[argh(positional)]
    run_id: Uuid,
}

fn load_config(path: &PathBuf) -> RunResult<RunConfig> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn run(opts: Opts) -> RunResult<()> {
    let text = std::fs::read_to_string(&opts.graph)?;
    let graph: Graph = serde_json::from_str(&text)?;
    let service = GraphService::with_engine(
        graph,
        EngineConfig {
            require_connected: opts.require_connected,
        },
    );

    match opts.command {
        Command::Run(cmd) => {
            let config = load_config(&cmd.config)?;
            let summary = service.run_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            for node in cmd.nodes {
                let out =
                    service.node_value(node.as_str().into(), summary.run_id)?;
                println!("{node}: {}", serde_json::to_string(&out)?);
            }
        }
        Command::Islands(cmd) => {
            let config = load_config(&cmd.config)?;
            let islands = service.fetch_islands(&config)?;
            println!("{}", serde_json::to_string_pretty(&islands)?);
        }
        Command::NodeValue(cmd) => {
            let out =
                service.node_value(cmd.node.as_str().into(), cmd.run_id)?;
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn main() {
    let opts: Opts = argh::from_env();
    let level = opts
        .log_level
        .parse()
        .unwrap_or(log::LevelFilter::Warn);
    env_logger::Builder::new().filter_level(level).init();

    if let Err(err) = run(opts) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
