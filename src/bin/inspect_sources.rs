//! Offline load report for the configured sources.
//!
//! Runs the same loaders the service runs at startup and prints what was
//! admitted, what was rejected and how the admitted readings distribute
//! across AQI bands and pollutants. Useful before pointing the service at a
//! new export.
//!
//! Usage:
//!   cargo run --bin inspect_sources                 # aqmon.toml
//!   cargo run --bin inspect_sources -- other.toml

use aqmon_service::analysis::groupings::{count_by_pollutant, group_by_band, worst_reading};
use aqmon_service::config;
use aqmon_service::model::PollutantFilter;
use aqmon_service::query::QueryService;
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let loaded = match env::args().nth(1) {
        Some(path) => config::load_config_from(Path::new(&path)),
        None => config::load_config(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let service = QueryService::new(&config);

    println!("📥 Sources");
    println!("   monitors   {}", config.sources.monitors.display());
    println!("   facilities {}", config.sources.facilities.display());
    println!("   footprints {}\n", config.sources.footprints.display());

    println!("📋 Load results");
    for report in service.load_all() {
        println!(
            "   {:<10} {:>7} admitted {:>7} rejected",
            report.dataset, report.admitted, report.rejected
        );
    }

    let readings = service.query(PollutantFilter::All);
    if readings.is_empty() {
        println!("\nNo monitor readings admitted.");
        return;
    }

    println!("\n🎨 AQI bands");
    for (band, count) in group_by_band(&readings) {
        println!("   {:<20} {:>7}  ({})", band.as_str(), count, band.color());
    }

    println!("\n🧪 Pollutants");
    for (pollutant, count) in count_by_pollutant(&readings) {
        println!("   {:<40} {:>7}", pollutant, count);
    }

    println!(
        "\n   ozone family: {}   particulate family: {}",
        service.query(PollutantFilter::OzoneFamily).len(),
        service.query(PollutantFilter::ParticulateFamily).len()
    );

    if let Some(worst) = worst_reading(&readings) {
        println!(
            "\n⚠️  Worst reading: {} ({}) AQI {} {}",
            worst.reading.site_name,
            worst.reading.pollutant_kind,
            worst.classification.index,
            worst.classification.band.as_str()
        );
    }
}
