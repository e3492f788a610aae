//! Direct journey queries and the scan over materialised routes.
//!
//! [`find_routes`] is the straightforward reference for the packed scanner in
//! [`crate::packed::scanner`]; both must report the same route ids.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::timetable::{
    record::{format_minutes, weekday_bit},
    DateCodec, Route, Stop,
};

/// A station pair on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyQuery {
    pub origin: u32,
    pub destination: u32,
    /// Weekday bits to accept, Monday is bit 6.
    pub day_mask: u8,
    /// Days since the timetable epoch.
    pub date: i32,
}

impl JourneyQuery {
    pub fn new(origin: u32, destination: u32, day_mask: u8, date: i32) -> Self {
        Self {
            origin,
            destination,
            day_mask,
            date,
        }
    }

    /// Query for a calendar date, matching only that date's weekday.
    pub fn on(origin: u32, destination: u32, date: NaiveDate, dates: &DateCodec) -> Self {
        Self::new(
            origin,
            destination,
            weekday_bit(date.weekday()),
            dates.encode(date),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journey {
    pub route_id: u32,
    pub uid: String,
    pub departure: u16,
    pub arrival: u16,
    /// Arrival minus departure; negative when the service crosses midnight.
    pub duration: i32,
    pub departure_platform: String,
    pub arrival_platform: String,
}

impl Journey {
    pub fn new(route: &Route, from: &Stop, to: &Stop) -> Self {
        Self {
            route_id: route.id,
            uid: route.uid.clone(),
            departure: from.departure,
            arrival: to.arrival,
            duration: to.arrival as i32 - from.departure as i32,
            departure_platform: from.platform.clone(),
            arrival_platform: to.platform.clone(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} -> {} ({} min)",
            format_minutes(self.departure),
            format_minutes(self.arrival),
            self.duration
        )
    }
}

/// Route ids running from origin to destination, each mapped to the index of
/// its first matching route in `routes`.
pub fn find_routes(routes: &[Route], query: &JourneyQuery) -> BTreeMap<u32, usize> {
    let mut matches = BTreeMap::new();
    for (i, route) in routes.iter().enumerate() {
        if !route.runs_on(query.day_mask, query.date) {
            continue;
        }
        if route
            .legs_between(query.origin, query.destination)
            .is_some()
        {
            matches.entry(route.id).or_insert(i);
        }
    }
    matches
}

pub fn journey(route: &Route, query: &JourneyQuery) -> Option<Journey> {
    let (from, to) = route.legs_between(query.origin, query.destination)?;
    Some(Journey::new(route, &route.stops[from], &route.stops[to]))
}
