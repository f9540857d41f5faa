mod config_cmd;
mod convert_cmd;
mod doctor_cmd;
mod push_cmd;
mod serve_cmd;
mod setup;
mod status_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notionforge")]
#[command(about = "notionforge: send chat markdown to Notion as native blocks")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.notionforge/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the Notion block JSON for a markdown file (or stdin)
    Convert { file: Option<PathBuf> },
    /// Convert markdown and create a Notion page directly
    Push {
        /// Page title (defaults to server.defaultTitle)
        #[arg(short, long)]
        title: Option<String>,
        file: Option<PathBuf>,
    },
    /// Ask a running gateway for its health
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the effective config with secrets masked
    Config,
    /// Validate the config and check Notion connectivity
    Doctor {
        /// Skip the Notion API call
        #[arg(long)]
        offline: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = setup::load(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { port } => serve_cmd::run(config, port).await?,
        Commands::Convert { file } => {
            convert_cmd::run(&setup::converter(&config), file.as_deref()).await?
        }
        Commands::Push { title, file } => push_cmd::run(&config, title, file.as_deref()).await?,
        Commands::Status { port } => status_cmd::run(port.unwrap_or(config.server.port)).await?,
        Commands::Config => config_cmd::run(&config)?,
        Commands::Doctor { offline } => {
            if !doctor_cmd::run(&config, offline).await? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
