//! Offline jobs for the AgriVerse ML API: model training and weather averages

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agriverse_backend::training::{generate_weather_averages, trainer};
use agriverse_backend::Config;

#[derive(Parser)]
#[command(name = "agriverse-cli")]
#[command(about = "Train AgriVerse models and precompute weather averages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the yield and revenue models from a crop CSV export
    Train {
        #[arg(long)]
        source: PathBuf,
        /// Directory for the model artifacts; defaults to the configured artifact paths
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Write per-state, per-season weather averages
    AvgWeather {
        #[arg(long)]
        source: PathBuf,
        /// Output CSV; defaults to the configured avg_weather path
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agriverse_cli=info,agriverse_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;

    match cli.command {
        Commands::Train { source, out_dir } => {
            let (yield_out, revenue_out) = match out_dir {
                Some(dir) => (
                    dir.join(&config.artifacts.yield_model),
                    dir.join(&config.artifacts.revenue_model),
                ),
                None => (
                    config.artifacts.yield_model_path(),
                    config.artifacts.revenue_model_path(),
                ),
            };
            let summary = trainer::run(&source, &yield_out, &revenue_out, &config.training)
                .with_context(|| format!("training from {} failed", source.display()))?;
            println!(
                "Trained on {} of {} cleaned rows ({} loaded). Models saved to {} and {}.",
                summary.train_rows,
                summary.rows_cleaned,
                summary.rows_loaded,
                yield_out.display(),
                revenue_out.display()
            );
        }
        Commands::AvgWeather { source, out } => {
            let out = out.unwrap_or_else(|| config.artifacts.avg_weather_path());
            let summary = generate_weather_averages(&source, &out)
                .with_context(|| format!("averaging weather from {} failed", source.display()))?;
            println!("Wrote {} rows: {} (sha256 {})", out.display(), summary.rows, summary.sha256);
        }
    }

    Ok(())
}
