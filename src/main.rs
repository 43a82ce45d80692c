//! `catalog-harvester` command line entry point

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use catalog_harvester::application::{CatalogWalker, export_records};
use catalog_harvester::domain::run_context::RunContext;
use catalog_harvester::domain::url_classifier::UrlClassifier;
use catalog_harvester::infrastructure::logging::{init_logging_with_config, log_system_info};
use catalog_harvester::infrastructure::{AppConfig, ConfigManager, HttpPageFetcher, exporters_for};

#[derive(Parser, Debug)]
#[command(name = "catalog-harvester")]
#[command(about = "Harvest product pages from a retailer catalog into import-ready CSV and JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON); defaults to the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Category page path or URL; repeat to replace the configured list
    #[arg(long = "category", global = true)]
    categories: Vec<String>,

    /// Directory for CSV, JSON and summary output
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk the catalog and export every extracted record
    Run,
    /// Print the accepted product URLs without extracting them
    Discover,
    /// Write the default configuration file
    InitConfig {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}

impl Cli {
    fn config_manager(&self) -> Result<ConfigManager> {
        match &self.config {
            Some(path) => Ok(ConfigManager::with_path(path)),
            None => ConfigManager::new(),
        }
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if !self.categories.is_empty() {
            config.site.category_paths.clone_from(&self.categories);
        }
        if let Some(dir) = &self.output_dir {
            config.export.output_dir.clone_from(dir);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("💥 {:#}", e);
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let manager = cli.config_manager()?;

    if let Commands::InitConfig { force } = cli.command {
        if manager.initialize(force).await? {
            println!("Wrote default configuration to {}", manager.config_path().display());
        } else {
            println!(
                "Configuration already exists at {} (use --force to overwrite)",
                manager.config_path().display()
            );
        }
        return Ok(());
    }

    let mut config = manager.load_config()?;
    cli.apply_overrides(&mut config);

    init_logging_with_config(&config.logging)?;
    log_system_info(&config.logging);
    config.validate().context("Invalid configuration")?;

    let category_urls = config.category_urls()?;
    let fetcher = Arc::new(HttpPageFetcher::new(&config.http)?);
    let walker = CatalogWalker::new(
        fetcher,
        UrlClassifier::new(config.classifier.clone()),
        config.parsing.clone(),
    );

    match cli.command {
        Commands::Discover => {
            let urls = walker.discover(&category_urls).await?;
            for url in &urls {
                println!("{url}");
            }
        }
        Commands::Run => {
            let mut ctx = RunContext::new(config.conversion_rate()?);
            let records = walker.run(&category_urls, &mut ctx).await?;
            if records.is_empty() {
                bail!("No records harvested");
            }

            let exporters = exporters_for(&config.export);
            let batch = export_records(records, &ctx, &exporters)?;
            info!(
                "🎯 Run {} completed: {} records, {} specification columns",
                batch.run_id(),
                batch.len(),
                batch.spec_keys().len()
            );
        }
        Commands::InitConfig { .. } => {}
    }
    Ok(())
}
