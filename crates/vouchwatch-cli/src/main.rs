mod diff;
mod output;
mod run;
mod show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vouchwatch")]
#[command(about = "Watch a vendor page for new promo codes")]
struct Cli {
    /// Watch configuration file (JSON, or YAML by extension).
    #[arg(long, global = true, default_value = "./config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract the current codes, replace the snapshot and alert on new ones.
    Run {
        /// JSON file overriding the built-in page selectors.
        #[arg(long)]
        selectors: Option<PathBuf>,
    },
    /// Print the stored snapshot for a vendor.
    Show {
        /// Vendor display name, as it appears on the page.
        vendor: String,
    },
    /// Compare two snapshot files offline.
    Diff {
        current: PathBuf,
        previous: PathBuf,
        /// Minimum discount percentage for a code to count as new.
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: u8,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let app_config = vouchwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(app_config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Run { selectors: None }) {
        Commands::Run { selectors } => {
            run::run_watch(&cli.config, selectors.as_deref(), &app_config).await?;
        }
        Commands::Show { vendor } => show::run_show(&cli.config, &vendor)?,
        Commands::Diff {
            current,
            previous,
            threshold,
        } => diff::run_diff(&current, &previous, threshold)?,
    }

    Ok(())
}
