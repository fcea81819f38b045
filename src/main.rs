//! Address-Scout main entry point
//!
//! This is the command-line interface for the Address-Scout address harvester.

use address_scout::config::{load_config_with_hash, Config};
use address_scout::input::read_domains;
use address_scout::pipeline;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Address-Scout: a postal address harvester for company websites
///
/// Address-Scout visits each domain in a list, crawls the site's same-origin pages,
/// extracts US and UK postal addresses, optionally validates them with a geocoder,
/// and keeps a resumable log of per-domain results.
#[derive(Parser, Debug)]
#[command(name = "address-scout")]
#[command(version)]
#[command(about = "A postal address harvester for company websites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume an unfinished run (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a new run, ignoring any unfinished one
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and input, show what would be processed, and exit
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics of the latest run and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Generate the markdown summary of the latest run and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        handle_run(&config, &config_hash, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("address_scout=info,warn"),
            1 => EnvFilter::new("address_scout=debug,info"),
            2 => EnvFilter::new("address_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and input, shows what would be processed
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Address-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Request timeout: {}s", config.crawler.timeout_seconds);
    println!("  Max depth: {}", config.crawler.max_depth);
    match config.crawler.max_pages_per_domain {
        Some(pages) => println!("  Max pages per domain: {}", pages),
        None => println!("  Max pages per domain: unlimited"),
    }
    match config.crawler.domain_budget_seconds {
        Some(seconds) => println!("  Domain budget: {}s", seconds),
        None => println!("  Domain budget: unlimited"),
    }
    println!("  Workers: {}", config.crawler.workers);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nGeocoder:");
    if config.geocoder.enabled {
        println!("  Endpoint: {}", config.geocoder.endpoint);
        println!("  Timeout: {}s", config.geocoder.timeout_seconds);
    } else {
        println!("  Disabled (every domain will be reported as not validated)");
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Results: {}", config.output.results_path);
    println!("  Summary: {}", config.output.summary_path);

    let domains = read_domains(Path::new(&config.input.domains_path))?;
    println!(
        "\nDomains ({} from {}):",
        domains.len(),
        config.input.domains_path
    );
    for domain in domains.iter().take(20) {
        println!("  - {}", domain);
    }
    if domains.len() > 20 {
        println!("  ... and {} more", domains.len() - 20);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would process {} domains", domains.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics of the latest run
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use address_scout::output::{load_statistics, print_statistics};
    use address_scout::storage::{SqliteStorage, Storage};

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    let Some(run) = storage.get_latest_run()? else {
        println!("No runs recorded yet");
        return Ok(());
    };
    println!("Run {} ({})\n", run.id, run.status.to_db_string());

    let stats = load_statistics(&storage, run.id)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use address_scout::output::{generate_markdown_summary, generate_summary};
    use address_scout::storage::SqliteStorage;

    println!("=== Exporting Run Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    tracing::info!("Loading run data from database...");
    let summary = generate_summary(&storage)?;

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main batch run
async fn handle_run(
    config: &Config,
    config_hash: &str,
    fresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !fresh {
        tracing::info!("Starting run (will resume an unfinished run if one exists)");
    }

    match pipeline::run(config, config_hash, fresh).await {
        Ok(report) => {
            if report.interrupted {
                tracing::warn!("Run interrupted: {}", report.statistics);
            } else {
                tracing::info!(
                    "Run completed: {} recorded, {} already recorded",
                    report.recorded,
                    report.already_recorded
                );
                tracing::info!("{}", report.statistics);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
