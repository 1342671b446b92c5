use anyhow::Context;
use bridge::server::DashboardServer;
use clap::Parser;
use dashboard::app::DashboardApp;
use dashboard::config::DashboardConfig;
use detectcore::prelude::ALL_CATEGORIES;
use detectcore::DetectionFeed;
use generator::sample::{generate_records, write_csv, SampleConfig};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod bridge;
mod dashboard;
mod generator;

/// Every flag is optional. Without any, the dashboard polls
/// `./detection_data.csv` and listens on `0.0.0.0:8050` with info-level logging.
#[derive(Parser)]
#[command(author, version, about = "Object detection dashboard host")]
struct Args {
    /// Load dashboard settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Detection log to poll (defaults to ./detection_data.csv)
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long)]
    host: Option<IpAddr>,
    #[arg(long)]
    port: Option<u16>,
    /// Write this many synthetic detections to the log before serving
    #[arg(long)]
    generate: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Print the dropdown options and chart for `--object` once, then exit
    #[arg(long, default_value_t = false)]
    once: bool,
    #[arg(long, default_value = ALL_CATEGORIES)]
    object: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    }
    .with_overrides(args.data.clone(), args.host, args.port);

    if let Some(rows) = args.generate {
        let sample = SampleConfig {
            rows,
            seed: args.seed,
            ..Default::default()
        };
        let records = generate_records(&sample)?;
        write_csv(&config.data_path, &records)?;
        log::info!(
            "wrote {} synthetic detections to {}",
            records.len(),
            config.data_path.display()
        );
    }

    let feed = DetectionFeed::new(config.data_path.clone());
    let data_path = feed.path().display().to_string();
    let app = Arc::new(DashboardApp::new(Arc::new(feed)));

    if args.once {
        let options = app.dropdown_options()?;
        let chart = app.figure(&args.object)?;
        let snapshot = serde_json::json!({
            "options": options,
            "figure": chart,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("encoding snapshot")?
        );
        return Ok(());
    }

    let server = DashboardServer::new(app, config.bind_address());
    log::info!(
        "serving {} on {} (Ctrl+C to stop)",
        data_path,
        server.address()
    );
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the dashboard server")?;
    runtime.block_on(server.run_until(async {
        if let Err(err) = signal::ctrl_c().await {
            log::warn!("awaiting Ctrl+C failed: {}", err);
        }
    }))
}
