//! # Listing Matcher Main Driver
//!
//! ## Purpose
//! Command-line entry point. Reads a product catalog, builds the matching
//! index, streams listings through the resolution pipeline, and writes the
//! results as JSON lines.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging
//! 3. Read the catalog and build the vocabulary tries
//! 4. Read listings and resolve them against the index
//! 5. Write results and report run statistics

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use listing_matcher::config::Config;
use listing_matcher::indexing::ProductIndexer;
use listing_matcher::ingestion::{self, ResultWriter};
use listing_matcher::pipeline::{PipelineStats, ResolutionPipeline};
use listing_matcher::utils::Timer;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let matches = Command::new("listing-matcher")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Product Matching Team")
        .about("Matches product listings against a catalog of known products")
        .arg(
            Arg::new("products")
                .value_name("PRODUCTS_FILE")
                .required(true)
                .help("Catalog products formatted as JSON objects, one per line"),
        )
        .arg(
            Arg::new("listings")
                .value_name("LISTINGS_FILE")
                .default_value("-")
                .help("Listings formatted as JSON objects, one per line; '-' reads stdin"),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT_FILE")
                .default_value("-")
                .help("File to write results to; '-' writes stdout"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .default_value("config.toml")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("emit-unmatched")
                .long("emit-unmatched")
                .action(ArgAction::SetTrue)
                .help("Pass unmatched listings through to the output unchanged"),
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .action(ArgAction::SetTrue)
                .help("Match listings on a single thread"),
        )
        .get_matches();

    // Load configuration and apply flag overrides
    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;
    if matches.get_flag("emit-unmatched") {
        config.output.emit_unmatched = true;
    }
    if matches.get_flag("sequential") {
        config.matching.parallel = false;
    }

    init_logging(&config)?;
    info!("configuration loaded from: {}", config_path);

    if config.matching.parallel && config.matching.threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(config.matching.threads)
            .build_global()
        {
            warn!("could not size the thread pool: {e}");
        }
    }

    // Read the catalog and build the index
    let products_path = matches.get_one::<String>("products").unwrap();
    let products_file = File::open(products_path)
        .with_context(|| format!("opening products file {products_path}"))?;
    let build_timer = Timer::new("index-build");
    let catalog = ingestion::read_catalog(BufReader::new(products_file))?;
    let mut indexer = ProductIndexer::new();
    for product in &catalog.products {
        indexer.index(product);
    }
    let build_ms = build_timer.stop();
    info!(
        products = catalog.products.len(),
        nodes = indexer.node_count(),
        elapsed_ms = build_ms,
        "catalog indexed"
    );

    // Read the listings
    let listings_arg = matches.get_one::<String>("listings").unwrap();
    let listings_reader: Box<dyn BufRead> = if listings_arg == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(listings_arg).with_context(
            || format!("opening listings file {listings_arg}"),
        )?))
    };
    let listings = ingestion::read_listings(listings_reader)?;

    // Resolve and write results
    let output_arg = matches.get_one::<String>("output").unwrap();
    let output: Box<dyn Write> = if output_arg == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        Box::new(BufWriter::new(File::create(output_arg).with_context(
            || format!("creating output file {output_arg}"),
        )?))
    };
    let mut writer = ResultWriter::new(output, config.output.emit_unmatched);

    let pipeline = ResolutionPipeline::new(indexer, config.matching.clone());
    let match_timer = Timer::new("matching");
    let resolved = pipeline.resolve_all(&listings.listings);
    let elapsed_ms = match_timer.stop();

    let mut stats = PipelineStats {
        listings_total: listings.listings.len(),
        malformed: catalog.malformed + listings.malformed,
        elapsed_ms,
        ..PipelineStats::default()
    };
    for (listing, outcome) in listings.listings.iter().zip(&resolved) {
        let product = outcome.as_deref();
        if product.is_some() {
            stats.matched += 1;
        } else {
            stats.unmatched += 1;
        }
        writer.write(listing, product)?;
    }
    writer.flush()?;

    info!(
        total = stats.listings_total,
        matched = stats.matched,
        unmatched = stats.unmatched,
        malformed = stats.malformed,
        elapsed_ms = stats.elapsed_ms,
        rate_per_second = stats.listings_per_second(),
        "matching complete"
    );

    Ok(())
}

/// Initialize logging on stderr, keeping stdout free for results
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.logging.level)
        .with_context(|| format!("invalid log filter {:?}", config.logging.level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if config.logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
