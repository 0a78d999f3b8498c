mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use agent_core::{builtin_loader, default_config_path, TypedSpiRegistry};

#[derive(Parser, Debug)]
#[command(name = "agent-spi", about = "Inspect and boot registered agent plugins")]
struct Args {
    /// Agent config file (defaults to ~/.agent-spi/agent.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the type of every registered plugin
    Plugins,
    /// Resolve one plugin by type, ignoring case
    Resolve {
        #[arg(value_name = "TYPE")]
        plugin_type: String,
    },
    /// Start the plugins named in the config, then close them
    Boot,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "Parsed arguments");
    let registry = TypedSpiRegistry::new(builtin_loader().build());

    match args.command {
        Command::Plugins => commands::plugins(&registry),
        Command::Resolve { plugin_type } => commands::resolve(&registry, &plugin_type),
        Command::Boot => {
            let path = args.config.unwrap_or_else(default_config_path);
            commands::boot(&registry, &path)
        }
    }
}
