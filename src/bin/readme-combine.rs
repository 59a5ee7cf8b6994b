use std::path::PathBuf;

use clap::{Parser, Subcommand};

use reactive_cell::config::validation::validate_config;
use reactive_cell::config::{load_or_default, ConfigError, DocsConfig};
use reactive_cell::docs::{combine_readmes, DocsWatcher};
use reactive_cell::lifecycle::{signals, Shutdown};
use reactive_cell::observability::logging;

#[derive(Parser)]
#[command(name = "readme-combine")]
#[command(about = "Combine every README.md under a directory into one document", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root (section headings are relative to it)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Directory searched for README files
    #[arg(long)]
    app_dir: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title of the combined document
    #[arg(long)]
    title: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine once and exit (default)
    Combine {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Combine, then rebuild whenever a README changes
    Watch,
}

impl Cli {
    fn apply_overrides(&self, docs: &mut DocsConfig) {
        if let Some(root) = &self.root {
            docs.root = root.clone();
        }
        if let Some(app_dir) = &self.app_dir {
            docs.app_dir = app_dir.clone();
        }
        if let Some(output) = &self.output {
            docs.output = output.clone();
        }
        if let Some(title) = &self.title {
            docs.title = title.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config.docs);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(config.observability.log_filter.as_deref());

    match cli.command.unwrap_or(Commands::Combine { json: false }) {
        Commands::Combine { json } => {
            let report = combine_readmes(&config.docs)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "All {} README files have been combined into {}",
                    report.files.len(),
                    report.output.display()
                );
            }
        }
        Commands::Watch => {
            let shutdown = Shutdown::new();
            let watcher_shutdown = shutdown.subscribe();
            let _signal_task = signals::spawn_ctrl_c_handler(shutdown.clone());

            let rebuilds = DocsWatcher::new(config.docs).run(watcher_shutdown).await?;
            tracing::info!(rebuilds, "Docs watcher stopped");
        }
    }

    Ok(())
}
