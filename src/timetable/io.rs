use std::{fs::File, io::Read, path::Path, time::Instant};

use tracing::debug;

use crate::timetable::{
    assembler::{AssemblyStats, ScheduleAssembler},
    config::TimetableConfig,
    error::Error,
    lines::read_lines,
    route::Route,
    station::StationTable,
};

pub fn read_msn<P: AsRef<Path>>(path: P, config: &TimetableConfig) -> Result<StationTable, Error> {
    let f = File::open(path)?;
    stations_from_reader(f, config)
}

pub fn stations_from_reader<R: Read>(
    rdr: R,
    config: &TimetableConfig,
) -> Result<StationTable, Error> {
    debug!("Loading stations...");
    let now = Instant::now();

    let mut builder = StationTable::builder(config.station_policy, config.station_order);
    for l in read_lines(rdr) {
        let line = l?;
        builder.push_line(&line);
    }
    let stations = builder.build();

    debug!(
        "Loading {} stations took {:?}",
        stations.len(),
        now.elapsed()
    );
    Ok(stations)
}

pub fn read_mca<P: AsRef<Path>>(
    path: P,
    stations: &StationTable,
    config: &TimetableConfig,
) -> Result<(Vec<Route>, AssemblyStats), Error> {
    let f = File::open(path)?;
    routes_from_reader(f, stations, config)
}

pub fn routes_from_reader<R: Read>(
    rdr: R,
    stations: &StationTable,
    config: &TimetableConfig,
) -> Result<(Vec<Route>, AssemblyStats), Error> {
    debug!("Loading schedules...");
    let now = Instant::now();

    let assembler = ScheduleAssembler::new(read_lines(rdr), stations, config.date_codec());
    let (routes, stats) = assembler.collect_routes()?;

    debug!("Loading {} routes took {:?}", routes.len(), now.elapsed());
    Ok((routes, stats))
}
