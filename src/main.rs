use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod chart;
mod config;
mod dashboard;
mod dataset;
mod error;
mod models;
mod range;
mod report;
mod tiles;

use config::Config;
use dashboard::Dashboard;
use models::Statistic;

#[derive(Parser)]
#[command(name = "home-value-trends")]
#[command(about = "Indexed home value trends for a community and its comparison geographies", long_about = None)]
struct Cli {
    /// Community observations CSV
    #[arg(long, global = true, env = "HOME_VALUES_COMMUNITY_CSV")]
    community: Option<PathBuf>,
    /// Neighborhood, city and state observations CSV
    #[arg(long, global = true, env = "HOME_VALUES_REFERENCE_CSV")]
    reference: Option<PathBuf>,
    /// TOML file with input paths and geography labels
    #[arg(long, global = true, env = "HOME_VALUES_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the latest-period summary tiles
    Tiles {
        #[arg(long, value_enum, default_value = "avg")]
        statistic: Statistic,
        #[arg(long)]
        json: bool,
    },
    /// Write the indexed line chart for a range as JSON
    Chart {
        /// One of 3M, 6M, 1Y, 3Y, ALL
        #[arg(long, default_value = "ALL")]
        range: String,
        #[arg(long, value_enum, default_value = "avg")]
        statistic: Statistic,
        /// Defaults to stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown dashboard report
    Report {
        #[arg(long, default_value = "ALL")]
        range: String,
        #[arg(long, value_enum, default_value = "avg")]
        statistic: Statistic,
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
    },
    /// Write the combined, indexed dataset as CSV
    Export {
        #[arg(long, default_value = "combined.csv")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let community_path = cli
        .community
        .or(config.community_csv)
        .context("no community data: pass --community or set community_csv in the config")?;
    let reference_path = cli
        .reference
        .or(config.reference_csv)
        .context("no reference data: pass --reference or set reference_csv in the config")?;

    let community = dataset::load_observations(&community_path)?;
    let reference = dataset::load_observations(&reference_path)?;
    let combined = dataset::build_combined_dataset(&community, &reference)
        .context("failed to build the combined dataset")?;
    let dashboard = Dashboard::new(combined, config.labels);

    match cli.command {
        Commands::Tiles { statistic, json } => {
            let tiles = dashboard.tiles(statistic);
            if json {
                println!("{}", serde_json::to_string_pretty(&tiles)?);
            } else {
                print!("{}", report::render_tiles(&tiles));
            }
        }
        Commands::Chart {
            range,
            statistic,
            out,
        } => {
            let view = dashboard.chart(&range, statistic);
            let json = serde_json::to_string_pretty(&view.chart)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!(
                        "Chart with {} series from {} written to {}.",
                        view.chart.data.len(),
                        view.start,
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }
        Commands::Report {
            range,
            statistic,
            out,
        } => {
            let report = report::build_report(&dashboard, &range, statistic);
            std::fs::write(&out, report)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { out } => {
            dataset::write_combined_csv(dashboard.dataset(), &out)?;
            info!(rows = dashboard.dataset().len(), "exported combined dataset");
            println!("Combined dataset written to {}.", out.display());
        }
    }

    Ok(())
}
