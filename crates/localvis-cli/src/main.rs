mod analyze;
mod catalog;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "localvis")]
#[command(about = "Local visibility score and lost-revenue audit")]
struct Cli {
    /// Engine configuration file (overrides `LOCALVIS_ENGINE_CONFIG_PATH`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score one listing from a JSON file of raw fields
    Analyze {
        /// Path to the JSON input, or `-` for stdin
        #[arg(long, short)]
        input: String,
        /// ISO country code for market assumptions (e.g., AR)
        #[arg(long)]
        country: Option<String>,
        /// Weight table to score with (defaults to the configured table)
        #[arg(long)]
        table: Option<String>,
        /// Print the result as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
    /// List configured weight tables
    Tables,
    /// List configured market profiles
    Markets,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app_config = localvis_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| app_config.engine_config_path.clone());
    let engine_config = Arc::new(
        localvis_core::load_engine_config(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to load engine config from {}: {e}",
                config_path.display()
            )
        })?,
    );

    match cli.command {
        Commands::Analyze {
            input,
            country,
            table,
            json,
        } => {
            let default_table = table.or(app_config.default_weight_table);
            analyze::run_analyze(
                engine_config,
                &input,
                country.as_deref(),
                default_table.as_deref(),
                json,
            )?;
        }
        Commands::Tables => print!("{}", catalog::render_tables(&engine_config)?),
        Commands::Markets => print!("{}", catalog::render_markets(&engine_config)?),
    }

    Ok(())
}
