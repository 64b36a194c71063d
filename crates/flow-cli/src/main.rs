mod cmd;
mod output;
mod render;
mod root;
mod tools;

use clap::{CommandFactory, Parser, Subcommand};
use cmd::{
    agents::AgentsSubcommand, config::ConfigSubcommand, context::ContextSubcommand,
    create::CreateOptions,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "flow",
    about = "Structured task contexts for AI-assisted development",
    long_about = "Create numbered task folders under .flow/ with business context, \
                  technical approach and completion report documents.\n\n\
                  Run `flow <NAME>` to create a task, or use a subcommand.",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .flow/ or .git/)
    #[arg(long, global = true, env = "FLOW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Name of the task to create
    #[arg(value_name = "NAME")]
    task_name: Option<String>,

    /// Task type: feature, bug, improvement or research
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    task_type: Option<String>,

    /// Short description used in the generated documents
    #[arg(long, short = 'd')]
    description: Option<String>,

    /// Synthesize the documents from the description instead of the templates
    #[arg(long)]
    auto: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks in numeric order
    List,

    /// Check a task's documents for missing content and leftover placeholders
    Validate {
        /// Task name (without the NN_ prefix)
        name: String,
    },

    /// Show a task's details and the first lines of each document
    Info {
        /// Task name (without the NN_ prefix)
        name: String,
    },

    /// Summarize task counts by status and type
    Status,

    /// Initialize Flow in the current project
    Init {
        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,
        /// Mission statement
        #[arg(long)]
        mission: Option<String>,
        /// Long-term goal (repeatable)
        #[arg(long = "goal")]
        goals: Vec<String>,
    },

    /// Manage .flow/PROJECT_CONTEXT.md
    Context {
        #[command(subcommand)]
        subcommand: ContextSubcommand,
    },

    /// Manage the Flow section of AGENTS.md
    Agents {
        #[command(subcommand)]
        subcommand: AgentsSubcommand,
    },

    /// Summarize a codebase: manifests, tree, config files, file types
    Analyze {
        /// Directory to analyze (default: project root)
        path: Option<PathBuf>,
        /// Directory to skip (repeatable, e.g. --exclude vendor)
        #[arg(long)]
        exclude: Vec<String>,
        /// Tree depth
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the MCP server on stdio
    Mcp,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Some(Commands::Mcp) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    // stdout belongs to command output and the MCP channel.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Some(Commands::List) => cmd::list::run(&root, cli.json),
        Some(Commands::Validate { name }) => cmd::validate::run(&root, &name, cli.json),
        Some(Commands::Info { name }) => cmd::info::run(&root, &name, cli.json),
        Some(Commands::Status) => cmd::status::run(&root, cli.json),
        Some(Commands::Init {
            name,
            mission,
            goals,
        }) => cmd::init::run(&root, name, mission, goals, cli.json),
        Some(Commands::Context { subcommand }) => cmd::context::run(&root, subcommand, cli.json),
        Some(Commands::Agents { subcommand }) => cmd::agents::run(&root, subcommand, cli.json),
        Some(Commands::Analyze {
            path,
            exclude,
            depth,
        }) => cmd::analyze::run(&root, path.as_deref(), &exclude, depth, cli.json),
        Some(Commands::Config { subcommand }) => cmd::config::run(&root, subcommand, cli.json),
        Some(Commands::Mcp) => cmd::mcp::run(&root),
        None => match cli.task_name.as_deref() {
            Some(name) => cmd::create::run(
                &root,
                CreateOptions {
                    name,
                    task_type: cli.task_type.as_deref(),
                    description: cli.description.as_deref(),
                    auto_generate: cli.auto,
                },
                cli.json,
            ),
            None => Cli::command()
                .error(
                    clap::error::ErrorKind::MissingRequiredArgument,
                    "a task name or a subcommand is required",
                )
                .exit(),
        },
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
