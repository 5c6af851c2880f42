//! Nearby address finder.
//!
//! Loads the configured school and address datasets, picks a school, and
//! exports every address within the chosen radius as CSV (plus an optional
//! GeoJSON preview for map rendering).

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use radius::config::Config;
use radius::dataset::{DatasetCache, DatasetLoader};
use radius::export::{export_file_name, preview, write_csv};
use radius::normalize::Normalized;
use radius::proximity::{parse_radius, query_with_order, ResultOrder, DEFAULT_RADIUS_MILES};
use radius::shard::load_candidates;
use radius::Role;

#[derive(Parser, Debug)]
#[command(name = "nearby")]
#[command(about = "Find addresses within a radius of a school")]
struct Args {
    /// Config file with dataset locations and region shards
    #[arg(short, long, default_value = "radius.toml")]
    config: PathBuf,

    /// School label to search around
    #[arg(short, long, required_unless_present = "list")]
    school: Option<String>,

    /// Radius in miles
    #[arg(short, long, default_value_t = DEFAULT_RADIUS_MILES.to_string())]
    radius: String,

    /// Sort results nearest first instead of dataset order
    #[arg(long)]
    sort_by_distance: bool,

    /// CSV output path (defaults to <school>_<radius>mi.csv in --out-dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the default CSV output name
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write a GeoJSON preview to this path
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// List the available schools and exit
    #[arg(long)]
    list: bool,

    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

/// `RUST_LOG` wins; otherwise info, or debug with `--verbose`.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(rust_log.as_deref(), args.verbose))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    let registry = config.shard_registry()?;

    let loader = DatasetLoader::new(config.http_timeout())?;
    let cache = DatasetCache::new();

    let schools = cache
        .get_or_load(&loader, &config.global.schools, Role::Reference)
        .await
        .context("Failed to load schools")?;

    if args.list {
        for label in schools.table.labels() {
            println!("{}", label);
        }
        return Ok(());
    }

    let school_name = args
        .school
        .as_deref()
        .context("--school is required")?;
    let radius = parse_radius(&args.radius)?;
    let school = schools.table.find(school_name)?;

    let addresses: Arc<Normalized> = if registry.is_empty() {
        let locator = config
            .global
            .addresses
            .as_ref()
            .context("Config needs either global.addresses or [[regions]]")?;
        cache
            .get_or_load(&loader, locator, Role::Candidate)
            .await
            .context("Failed to load addresses")?
    } else {
        load_candidates(school, &registry, &loader, &cache)
            .await
            .context("Failed to load address shard")?
    };

    if !addresses.rejected.is_empty() {
        warn!(
            "{} address rows were dropped during normalization",
            addresses.rejected.len()
        );
    }

    let order = if args.sort_by_distance {
        ResultOrder::Distance
    } else {
        ResultOrder::Input
    };
    let within = query_with_order(&school.site, &addresses.table, radius, order);

    info!(
        "Found {} addresses within {} miles of {}.",
        within.len(),
        radius,
        school_name
    );

    let output = args
        .output
        .unwrap_or_else(|| args.out_dir.join(export_file_name(school_name, radius)));
    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_csv(&within, BufWriter::new(file))?;
    info!("Wrote {}", output.display());

    if let Some(path) = args.geojson {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(
            BufWriter::new(file),
            &preview(&school.site, radius, &within),
        )?;
        info!("Wrote preview {}", path.display());
    }

    Ok(())
}
