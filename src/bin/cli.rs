//! tripmatch CLI - Report tool for trip analytics
//!
//! Usage:
//!   tripmatch-cli group <trips.csv> [--all] [--strict]
//!   tripmatch-cli weekly <trips.csv> [--bbox <min_lat,max_lat,min_lon,max_lon>]
//!                                    [--region <name>] [--filter <origin|destination|both>]
//!
//! Loads trip records from a CSV file and prints the likely-same-trip
//! groups or a weekly-average summary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use tripmatch::{
    group_trips, load_trips, report, weekly_average, BoundingBox, LocationFilter, ParsePolicy,
    TripError, WeeklyQuery,
};

#[derive(Parser)]
#[command(name = "tripmatch-cli")]
#[command(about = "Trip deduplication and weekly-average reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (repeat for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Group trips that share region, time of day and origin/destination cells
    Group {
        /// CSV file of trip records
        file: PathBuf,

        /// Print every group, not just those reported more than once
        #[arg(long)]
        all: bool,

        /// Abort on the first malformed record instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Average trips per week, optionally filtered by bounding box and region
    Weekly {
        /// CSV file of trip records
        file: PathBuf,

        /// Bounding box as min_lat,max_lat,min_lon,max_lon
        #[arg(short, long)]
        bbox: Option<String>,

        /// Exact region name, e.g. "Prague"
        #[arg(short, long)]
        region: Option<String>,

        /// Which trip endpoint the box applies to: origin, destination or both
        #[arg(short, long, default_value = "origin")]
        filter: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> tripmatch::Result<()> {
    match command {
        Commands::Group { file, all, strict } => {
            let policy = if strict {
                ParsePolicy::Strict
            } else {
                ParsePolicy::Skip
            };
            let records = load_trips(&file, policy)?;
            let result = group_trips(&records, policy)?;

            if all {
                println!("{} groups from {} trips:\n", result.groups.len(), result.total_trips());
                print!("{}", report::grouped_trips_table(&result));
            } else {
                println!("Trips with similar origin, destination and time of day:\n");
                print!("{}", report::duplicate_trips_table(&result));
            }
            if result.skipped > 0 {
                println!("\n{} records skipped for malformed coordinates", result.skipped);
            }
            Ok(())
        }

        Commands::Weekly {
            file,
            bbox,
            region,
            filter,
        } => {
            // validate arguments before touching the data
            let location_filter = LocationFilter::from_str(&filter)?;
            let mut query = WeeklyQuery::new().with_location_filter(location_filter);
            if let Some(bbox) = bbox {
                query = query.with_bounding_box(parse_bbox(&bbox)?);
            }
            if let Some(region) = region {
                query = query.with_region(region);
            }

            let records = load_trips(&file, ParsePolicy::Skip)?;
            let result = weekly_average(&records, &query)?;

            println!("{}", report::weekly_summary(&query, &result));
            Ok(())
        }
    }
}

/// Parse "min_lat,max_lat,min_lon,max_lon".
fn parse_bbox(value: &str) -> tripmatch::Result<BoundingBox> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| TripError::InvalidBoundingBox {
            value: value.to_string(),
        })?;

    if parts.len() != 4 {
        return Err(TripError::InvalidBoundingBox {
            value: value.to_string(),
        });
    }

    Ok(BoundingBox::new(parts[0], parts[1], parts[2], parts[3]))
}
