use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use rackhd_cpi::Cpi;
use rackhd_cpi::api::workflow_dto::{RunWorkflowRequest, WorkflowDefinition};
use rackhd_cpi::domain::rackhd::rackhd_endpoint::LibraryKind;
use rackhd_cpi::domain::utils::id::NodeId;
use rackhd_cpi::loader::parser::{parse_json_file, read_file_bytes};
use rackhd_cpi::logger;

/// Select RackHD nodes and run provisioning workflows against them
#[derive(Parser)]
#[command(name = "rackhd-cpi")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the id of a randomly chosen free node
    SelectNode {
        /// Skip nodes that already carry this persistent disk
        #[arg(long)]
        disk_cid: Option<String>,
    },

    /// Upload a workflow or task definition and verify it is listed
    Publish {
        #[arg(long, value_enum, default_value_t = Kind::Workflow)]
        kind: Kind,

        definition_file: PathBuf,
    },

    /// Run an already published workflow on a node
    Run {
        #[arg(long)]
        node: String,

        #[arg(long)]
        workflow: String,

        /// Workflow options as a JSON object
        #[arg(long)]
        options: Option<String>,

        /// Overrides run_workflow_timeout_seconds from the config
        #[arg(long)]
        timeout_seconds: Option<u64>,
    },

    /// Select a node, publish the definition under a unique name and run it
    Provision {
        #[arg(long)]
        definition: PathBuf,

        #[arg(long)]
        options: Option<String>,

        #[arg(long)]
        disk_cid: Option<String>,

        #[arg(long)]
        timeout_seconds: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Workflow,
    Task,
}

impl From<Kind> for LibraryKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Workflow => LibraryKind::Workflow,
            Kind::Task => LibraryKind::Task,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();
    let config_path = cli.config.to_string_lossy().to_string();
    let cpi = Cpi::from_config_file(&config_path).with_context(|| format!("failed to load config: {}", config_path))?;

    match cli.command {
        Commands::SelectNode { disk_cid } => {
            let node_id = cpi.selector.select_node_seeded_from_clock(disk_cid.as_deref()).await.context("failed to select node")?;
            println!("{}", node_id);
        }
        Commands::Publish { kind, definition_file } => {
            let path = definition_file.to_string_lossy().to_string();
            let definition = read_file_bytes(&path).with_context(|| format!("failed to read definition file: {}", path))?;
            cpi.publisher.publish(kind.into(), &definition).await.context("failed to publish definition")?;
        }
        Commands::Run { node, workflow, options, timeout_seconds } => {
            let request = RunWorkflowRequest::new(workflow).with_options(parse_options(options.as_deref())?);
            let timeout = timeout_seconds.map(Duration::from_secs).unwrap_or_else(|| cpi.config.run_workflow_timeout());

            let completion = cpi.runner.run_workflow(&NodeId::new(node), &request, timeout).await.context("failed to run workflow")?;
            println!("{:?}", completion);
        }
        Commands::Provision { definition, options, disk_cid, timeout_seconds } => {
            let path = definition.to_string_lossy().to_string();
            let definition: WorkflowDefinition = parse_json_file(&path).with_context(|| format!("failed to read definition file: {}", path))?;
            let definition = definition.with_unique_name();
            let timeout = timeout_seconds.map(Duration::from_secs).unwrap_or_else(|| cpi.config.run_workflow_timeout());

            let node_id = cpi.selector.select_node_seeded_from_clock(disk_cid.as_deref()).await.context("failed to select node")?;
            let completion = cpi
                .runner
                .publish_and_run(&node_id, &definition, parse_options(options.as_deref())?, timeout)
                .await
                .with_context(|| format!("failed to provision node {}", node_id))?;
            println!("{} {:?}", node_id, completion);
        }
    }

    Ok(())
}

fn parse_options(options: Option<&str>) -> Result<HashMap<String, serde_json::Value>> {
    match options {
        Some(raw) => serde_json::from_str(raw).context("options must be a JSON object"),
        None => Ok(HashMap::new()),
    }
}
