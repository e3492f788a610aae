//! Groups schedule lines into routes.
//!
//! A `BS` header for a new schedule opens a route, `LO`/`LI`/`LT` lines add its
//! calls and a resolved `LT` closes and yields it. Anything else while a route
//! is open throws that route away. Routes still open when the input ends are
//! dropped as well, since extracts often end in a truncated record.

use std::{collections::HashMap, io};

use tracing::{debug, warn};

use crate::timetable::{
    error::Error,
    record::{decode_stop, DateCodec, RecordKind, ScheduleHeader, StopRecord, Transaction},
    route::Route,
    station::StationTable,
    stop::Stop,
};

/// What the assembler kept and threw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub routes: usize,
    /// Amended or deleted schedule headers.
    pub revisions: usize,
    pub discarded_routes: usize,
    pub skipped_headers: usize,
    pub unresolved_stops: usize,
    pub passes: usize,
    pub malformed_stops: usize,
}

pub struct ScheduleAssembler<'a, I> {
    lines: I,
    stations: &'a StationTable,
    dates: DateCodec,
    route_ids: HashMap<String, u32>,
    current: Option<Route>,
    stats: AssemblyStats,
    finished: bool,
}

impl<'a, I, S> ScheduleAssembler<'a, I>
where
    I: Iterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    pub fn new(lines: I, stations: &'a StationTable, dates: DateCodec) -> Self {
        Self {
            lines,
            stations,
            dates,
            route_ids: HashMap::new(),
            current: None,
            stats: AssemblyStats::default(),
            finished: false,
        }
    }

    pub fn stats(&self) -> AssemblyStats {
        self.stats
    }

    /// Drains the input, returning every completed route.
    pub fn collect_routes(mut self) -> Result<(Vec<Route>, AssemblyStats), Error> {
        let mut routes = vec![];
        for route in self.by_ref() {
            routes.push(route?);
        }
        Ok((routes, self.stats))
    }

    fn route_id(&mut self, uid: &str) -> u32 {
        let next = self.route_ids.len() as u32;
        *self.route_ids.entry(uid.to_owned()).or_insert(next)
    }

    fn discard_current(&mut self) {
        if self.current.take().is_some() {
            self.stats.discarded_routes += 1;
        }
    }

    fn process(&mut self, line: &str) -> Result<Option<Route>, Error> {
        match RecordKind::of(line) {
            RecordKind::Schedule => match Transaction::of(line)? {
                Transaction::New => {
                    self.discard_current();
                    match ScheduleHeader::parse(line, &self.dates)? {
                        Some(header) => {
                            let id = self.route_id(&header.uid);
                            self.current = Some(Route::new(id, header));
                        }
                        None => {
                            warn!("Skipping schedule with unreadable dates: {}", line.trim_end());
                            self.stats.skipped_headers += 1;
                        }
                    }
                }
                Transaction::Delete | Transaction::Revise => {
                    self.stats.revisions += 1;
                    self.discard_current();
                }
            },
            RecordKind::ScheduleDetails => {}
            kind if kind.is_stop() => {
                if self.current.is_none() {
                    return Ok(None);
                }
                match decode_stop(line)? {
                    StopRecord::Call(call) => match self.stations.resolve(call.location) {
                        Some(station_id) => {
                            if let Some(route) = self.current.as_mut() {
                                route.add_stop(Stop::new(
                                    station_id,
                                    call.arrival,
                                    call.departure,
                                    call.platform,
                                ));
                            }
                            if call.terminal {
                                self.stats.routes += 1;
                                return Ok(self.current.take());
                            }
                        }
                        None => self.stats.unresolved_stops += 1,
                    },
                    StopRecord::Pass => self.stats.passes += 1,
                    StopRecord::Malformed => self.stats.malformed_stops += 1,
                }
            }
            _ => self.discard_current(),
        }
        Ok(None)
    }
}

impl<I, S> Iterator for ScheduleAssembler<'_, I>
where
    I: Iterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    type Item = Result<Route, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.finished = true;
                    self.discard_current();
                    debug!("Assembled schedules: {:?}", self.stats);
                    if self.stats.revisions > 0 {
                        return Some(Err(Error::UnsupportedRevision {
                            count: self.stats.revisions,
                        }));
                    }
                    return None;
                }
            };
            match self.process(line.as_ref()) {
                Ok(Some(route)) => return Some(Ok(route)),
                Ok(None) => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Assembler over in-memory lines.
pub fn assemble<'a, J, S>(
    lines: J,
    stations: &'a StationTable,
    dates: DateCodec,
) -> ScheduleAssembler<'a, impl Iterator<Item = io::Result<S>>>
where
    J: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ScheduleAssembler::new(lines.into_iter().map(Ok::<S, io::Error>), stations, dates)
}
