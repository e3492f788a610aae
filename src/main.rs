use std::{path::PathBuf, time::Instant};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use itertools::Itertools;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cif_packed::{
    journey::{self, JourneyQuery},
    packed,
    timetable::{StationPolicy, Timetable, TimetableConfig},
};

#[derive(Parser)]
struct Args {
    /// Directory holding the .MSN and .MCA files
    timetable_path: String,
    /// Public code of origin station
    origin: String,
    /// Public code of destination station
    destination: String,
    /// Travel date
    date: NaiveDate,
    /// Date that packed day offsets count from
    #[arg(long, default_value = "2018-01-01")]
    epoch: NaiveDate,
    /// Give every station master entry its own id instead of merging by code
    #[arg(long)]
    append_stations: bool,
    /// Write the packed routes to this directory
    #[arg(long)]
    packed_out: Option<PathBuf>,
    /// Print journeys as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = TimetableConfig {
        epoch: args.epoch,
        station_policy: if args.append_stations {
            StationPolicy::Append
        } else {
            StationPolicy::UniqueCode
        },
        ..Default::default()
    };

    let now = Instant::now();
    let timetable = Timetable::read(&args.timetable_path, &config)
        .with_context(|| format!("Failed to read timetable from {}", args.timetable_path))?;
    info!("Read timetable in {:?}", now.elapsed());

    let now = Instant::now();
    let packed = packed::encode(&timetable.routes).context("Failed to pack routes")?;
    info!(
        "Packed {} routes into {} bytes in {:?}",
        timetable.routes.len(),
        packed.len_bytes(),
        now.elapsed()
    );
    if let Some(dir) = &args.packed_out {
        packed
            .save(dir)
            .with_context(|| format!("Failed to write packed routes to {}", dir.display()))?;
    }

    let origin = timetable
        .stations
        .by_public_code(&args.origin)
        .with_context(|| format!("Unknown station {}", args.origin))?;
    let destination = timetable
        .stations
        .by_public_code(&args.destination)
        .with_context(|| format!("Unknown station {}", args.destination))?;
    let query = JourneyQuery::on(origin.id, destination.id, args.date, &timetable.dates);

    let now = Instant::now();
    let packed_matches = packed.find(&query);
    info!(
        "Packed scan found {} routes in {:?}",
        packed_matches.len(),
        now.elapsed()
    );

    let now = Instant::now();
    let object_matches = journey::find_routes(&timetable.routes, &query);
    info!(
        "Object scan found {} routes in {:?}",
        object_matches.len(),
        now.elapsed()
    );

    if !packed_matches.keys().eq(object_matches.keys()) {
        bail!("Packed and object scans disagree");
    }

    let journeys = packed_matches
        .values()
        .filter_map(|offset| packed.journey_at(*offset, &query))
        .sorted_by_key(|j| j.departure)
        .collect::<Vec<_>>();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&journeys)?);
        return Ok(());
    }

    println!(
        "Direct services from {} to {} on {}",
        origin.name, destination.name, args.date
    );
    for j in &journeys {
        println!("{} {} platform {}", j.uid, j.summary(), j.departure_platform);
    }

    Ok(())
}
