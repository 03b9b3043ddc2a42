use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use berthplan_core::BerthplanConfig;
use berthplan_core::config::DEFAULT_CONFIG_FILE;

mod commands;

#[derive(Parser)]
#[command(
    name = "berthplan",
    about = "berthplan — optimal berth assignment planner",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Config file (default: berthplan.toml in the data directory, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Directory relative store paths resolve against
    #[arg(short, long, global = true, default_value = ".")]
    data_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a fresh assignment plan and persist it.
    ///
    /// Replaces the previous plan as a whole. On failure the previous plan
    /// is left untouched and the command exits non-zero.
    Run,
    /// Print the persisted assignment plan
    Show {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Load applications, berths and leases from a JSON file into the store
    Import {
        /// JSON file with `applications`, `berths` and `leases` arrays
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.data_dir)?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log.filter)
            .with_context(|| format!("invalid log filter '{}'", config.log.filter))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run => {
            let store = commands::open_store(&config, &cli.data_dir)?;
            commands::run::run(store, &config)
        }
        Commands::Show { format } => {
            let store = commands::open_existing_store(&config, &cli.data_dir)?;
            commands::show::show(&store, &format)
        }
        Commands::Import { file } => {
            let store = commands::open_store(&config, &cli.data_dir)?;
            commands::import::import(&store, &file)
        }
    }
}

/// An explicit `--config` must exist; the implicit one is optional.
fn load_config(explicit: Option<&Path>, data_dir: &Path) -> anyhow::Result<BerthplanConfig> {
    match explicit {
        Some(path) => BerthplanConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let path = data_dir.join(DEFAULT_CONFIG_FILE);
            BerthplanConfig::load_or_default(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
    }
}
