use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use s3_fast_upload::cli::Args;
use s3_fast_upload::cloud::client::create_s3_client;
use s3_fast_upload::cloud::store::S3Store;
use s3_fast_upload::config::UploadConfig;
use s3_fast_upload::models::PoolReport;
use s3_fast_upload::pipeline::pool::UploadPool;
use s3_fast_upload::reporter::LogReporter;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Validate configuration before anything starts
    let config = UploadConfig::from_args(&args).context("Invalid configuration")?;
    if args.verbose {
        log_options(&config);
    }

    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = runtime.block_on(run_upload(&config))?;

    if let Some(path) = &config.report_path {
        write_report(path, &report)?;
    }

    if report.has_failures() {
        warn!(
            "{} files failed to upload, {} workers terminated abnormally",
            report.failed, report.crashed_workers
        );
        if config.strict {
            bail!("{} uploads failed", report.failed + report.crashed_workers as u64);
        }
    }

    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let config = ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("rusoto_core")
        .build();
    TermLogger::init(log_level, config, TerminalMode::Mixed, ColorChoice::Auto)
        .context("Failed to initialize logger")?;
    Ok(())
}

fn log_options(config: &UploadConfig) {
    info!("Using options:");
    info!("  bucket: {}", config.target.bucket);
    info!("  subfolder: {}", config.target.prefix);
    info!("  workers: {}", config.workers);
    info!("  region: {}", config.region.name());
    info!("  acl: {}", config.target.acl);
    info!("  source dir: {}", config.target.source_root.display());
    info!("  queue capacity: {}", config.queue_capacity);
    info!("  credentials: {:?}", config.credentials);
}

/// Build the S3 client and run the pool to completion
async fn run_upload(config: &UploadConfig) -> Result<PoolReport> {
    let client = create_s3_client(config.region.clone(), &config.credentials)?;
    let store = Arc::new(S3Store::new(client));
    UploadPool::from_config(config, store, Arc::new(LogReporter)).run().await
}

fn write_report(path: &Path, report: &PoolReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    fs::write(path, json).context(format!("Failed to write run report to {}", path.display()))?;
    info!("Run report written to {}", path.display());
    Ok(())
}
