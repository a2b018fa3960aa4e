use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use url::Url;

use wishlist_scraper::diagnostics::DirectorySink;
use wishlist_scraper::fetch::Unavailable;
use wishlist_scraper::{Extractor, ExtractorConfig, ProductData};

#[derive(Parser, Debug)]
#[command(name = "wishlist-scrape")]
#[command(about = "Extract product name, price, image and description from a product page")]
#[command(version)]
struct Args {
    /// Product page URL
    url: String,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the page from this HTML file instead of fetching it
    #[arg(long)]
    html: Option<PathBuf>,

    /// Save every fetched page into this directory
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ExtractorConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ExtractorConfig::default(),
    };

    let product = match &args.html {
        Some(path) => extract_local(&args.url, path, config),
        None => extract_remote(&args, config),
    };

    let product = match product {
        Some(product) => product,
        None => return ExitCode::FAILURE,
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&product)
    } else {
        serde_json::to_string(&product)
    };
    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize result: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn extract_remote(args: &Args, config: ExtractorConfig) -> Option<ProductData> {
    let mut extractor = match Extractor::new(config.clone()) {
        Ok(extractor) => extractor,
        Err(e) => {
            log::warn!("{}", e);
            Extractor::with_fetcher(config, Unavailable)
        }
    };
    if let Some(dir) = &args.dump_dir {
        extractor = extractor.with_diagnostics(DirectorySink::new(dir));
    }

    log::info!("Extracting product details from {}", args.url);
    match extractor.extract(&args.url) {
        Ok(product) => Some(product),
        Err(e) => {
            log::error!("{}", e);
            None
        }
    }
}

fn extract_local(url: &str, path: &Path, config: ExtractorConfig) -> Option<ProductData> {
    let url = match Url::parse(url) {
        Ok(url) => url,
        Err(e) => {
            log::error!("Invalid URL {}: {}", url, e);
            return None;
        }
    };
    let html = match std::fs::read_to_string(path) {
        Ok(html) => html,
        Err(e) => {
            log::error!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    let extractor = Extractor::with_fetcher(config, Unavailable);
    Some(extractor.extract_from_html(&url, &html))
}
