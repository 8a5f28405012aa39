//! Comprar CLI: run the storefront BDD scenarios against a real browser.
//!
//! ```bash
//! comprar                            # run features/ with comprar.toml
//! comprar --headless --features bdd  # headless, custom feature dir
//! ```
//!
//! Exit status reflects overall pass/fail; pending scenarios are reported
//! but do not fail the run.

// Step definitions assert by panicking; that is the cucumber convention.
#![allow(clippy::expect_used)]

mod steps;
mod world;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use cucumber::World as _;
use futures::FutureExt;
use tracing_subscriber::EnvFilter;

use comprar::config::DEFAULT_CONFIG_FILE;
use comprar::{ComprarResult, Settings};
use world::StorefrontWorld;

#[derive(Parser, Debug)]
#[command(name = "comprar", version, about = "Storefront e2e scenario runner")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory of .feature files
    #[arg(long, default_value = "features")]
    features: PathBuf,

    /// Run the browser headless regardless of configuration
    #[arg(long)]
    headless: bool,

    /// Report output directory (overrides configuration)
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Number of scenarios run concurrently (overrides configuration)
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ComprarResult<bool> {
    let mut settings = Settings::load(&cli.config)?;
    if cli.headless {
        settings.set("headless", "true");
    }
    if let Some(dir) = &cli.report_dir {
        settings.set("report_dir", dir.display().to_string());
    }
    if let Some(n) = cli.concurrency {
        settings.set("parallel_scenarios", n.to_string());
    }
    world::publish_settings(settings);

    let settings = world::settings();
    let concurrency = settings.parallel_scenarios();
    tracing::info!(
        features = %cli.features.display(),
        concurrency,
        "starting scenario run"
    );

    StorefrontWorld::cucumber()
        .max_concurrent_scenarios(concurrency)
        .after(|feature, _rule, scenario, ev, world| {
            let feature = feature.name.clone();
            async move {
                world::record_outcome(feature, scenario, ev, world).await;
            }
            .boxed_local()
        })
        .run(&cli.features)
        .await;

    let report = world::take_report();
    let (json_path, html_path) = report.write_to(Path::new(settings.report_dir()))?;
    println!("{}", report.summary());
    println!("reports: {} {}", json_path.display(), html_path.display());

    Ok(report.all_passed())
}
