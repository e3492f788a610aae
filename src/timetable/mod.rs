pub mod assembler;
pub mod config;
pub mod error;
pub mod io;
pub mod lines;
pub mod record;
pub mod route;
pub mod station;
pub mod stop;

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use tracing::info;

pub use crate::timetable::{
    assembler::AssemblyStats,
    config::{StationOrder, StationPolicy, TimetableConfig},
    error::Error,
    record::DateCodec,
    route::{Route, ServiceType},
    station::{Station, StationTable},
    stop::Stop,
};

fn find_first_file_with_extension<P: AsRef<Path>>(dir: P, extension: &str) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
}

/// Stations and routes from one station-master and schedule extract.
pub struct Timetable {
    pub stations: StationTable,
    pub routes: Vec<Route>,
    pub stats: AssemblyStats,
    pub dates: DateCodec,
}

impl Timetable {
    /// Reads the first `.msn` and `.mca` files found in `path`.
    pub fn read<P: AsRef<Path>>(path: P, config: &TimetableConfig) -> Result<Self, Error> {
        let msn_path =
            find_first_file_with_extension(&path, "msn").ok_or(Error::MissingFile("MSN"))?;
        let mca_path =
            find_first_file_with_extension(&path, "mca").ok_or(Error::MissingFile("MCA"))?;

        let stations = io::read_msn(msn_path, config)?;
        let (routes, stats) = io::read_mca(mca_path, &stations, config)?;
        Ok(Self::new(stations, routes, stats, config))
    }

    pub fn from_readers<M: Read, S: Read>(
        msn: M,
        mca: S,
        config: &TimetableConfig,
    ) -> Result<Self, Error> {
        let stations = io::stations_from_reader(msn, config)?;
        let (routes, stats) = io::routes_from_reader(mca, &stations, config)?;
        Ok(Self::new(stations, routes, stats, config))
    }

    fn new(
        stations: StationTable,
        routes: Vec<Route>,
        stats: AssemblyStats,
        config: &TimetableConfig,
    ) -> Self {
        info!(
            "Read {} stations and {} routes ({} routes discarded, {} stops unresolved)",
            stations.len(),
            routes.len(),
            stats.discarded_routes,
            stats.unresolved_stops
        );
        Self {
            stations,
            routes,
            stats,
            dates: config.date_codec(),
        }
    }
}
