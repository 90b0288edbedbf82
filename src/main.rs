use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dualorm::app;
use dualorm::config::AppConfig;
use dualorm::domain::{Product, Supplier};

/// Dual-container demo: two persistence engines, one bridge, shared caches.
#[derive(Parser)]
#[command(name = "dualorm", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Clear both engines' caches after the demo run
    #[arg(long)]
    clear_caches: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let app = app::bootstrap(&config).context("assembling the application")?;

    let products = app.product_service()?;
    let suppliers = app.supplier_service()?;

    // seed the catalog engine (primary side)
    let mug = products.create(Product::new("mug", "ceramic, 350ml", 8.50, "kitchen"));
    products.create(Product::new("pan", "stainless steel", 24.90, "kitchen"));
    products.create(Product::new("lamp", "led desk lamp", 39.99, "lighting"));

    // seed the directory engine
    suppliers.create(Supplier::new(
        "acme kitchenware",
        "1 main st",
        "lyon",
        "+33-555-0101",
        "kitchen",
    ));
    suppliers.create(Supplier::new(
        "brightlight co",
        "9 glow ave",
        "nice",
        "+33-555-0102",
        "lighting",
    ));

    // forward direction: a secondary-bound service writes through the
    // bridged primary singletons
    let cross = app.cross_product_service()?;
    let kettle = cross.create_product(Product::new("kettle", "electric, 1.7l", 32.00, "kitchen"));
    println!("cross-container summary: {}", cross.summary());
    println!(
        "kettle visible on the primary side: {}",
        products.get(kettle.id).is_some()
    );

    // reverse direction: the pricing service runs on a calculator the
    // secondary injector produced
    let pricing = app.pricing_service()?;
    println!("calculator in use: {}", pricing.calculator_info());
    println!("catalog total value: {:.2}", pricing.total_value()?);
    if let Some(discounted) = pricing.apply_discount(mug.id, 15.0)? {
        println!("mug at 15% off: {:.2}", discounted);
    }

    let cache_manager = app.cache_manager()?;
    println!("{}", cache_manager.statistics());

    let metrics = app.metrics()?;
    let export = serde_json::to_string_pretty(&metrics.export())
        .context("serializing the metrics export")?;
    println!("{}", export);

    if cli.clear_caches {
        cache_manager.clear_all();
        println!("caches cleared: {}", cache_manager.statistics());
    }

    Ok(())
}
