//! Journey lookups straight off the packed words.

use std::collections::BTreeMap;

use crate::{
    journey::{Journey, JourneyQuery},
    packed::{
        PackedTimetable, ARRIVAL, DEPARTURE, HEADER_WORDS, OPERATING_DAYS, PLATFORM, ROUTE_ID,
        STATION_ID, STOP_COUNT, STOP_WORDS, VALID_FROM, VALID_TO,
    },
};

/// Route ids running from origin to destination, each mapped to the header
/// offset of its first matching route.
///
/// Every route costs one header read; stop words are only read for routes
/// whose days and dates match, and the walk always resumes at the header
/// found from the stop count.
pub fn find(words: &[u32], query: &JourneyQuery) -> BTreeMap<u32, usize> {
    let mut matches = BTreeMap::new();
    let mut i = 0;
    while i + HEADER_WORDS <= words.len() {
        let header = words[i];
        let dates = words[i + 1];
        let next = i + HEADER_WORDS + STOP_COUNT.get(header) as usize * STOP_WORDS;
        let Some(stops) = words.get(i + HEADER_WORDS..next) else {
            break;
        };

        if OPERATING_DAYS.get(dates) as u8 & query.day_mask != 0
            && VALID_FROM.get(dates) as i64 <= query.date as i64
            && VALID_TO.get(dates) as i64 >= query.date as i64
            && legs_between(stops, query.origin, query.destination).is_some()
        {
            matches.entry(ROUTE_ID.get(header)).or_insert(i);
        }

        i = next;
    }
    matches
}

/// Stop indexes of the first call at `origin` and the first later call at
/// `destination`, read from a route's stop words.
fn legs_between(stops: &[u32], origin: u32, destination: u32) -> Option<(usize, usize)> {
    let mut pairs = stops.chunks_exact(STOP_WORDS).map(|w| STATION_ID.get(w[0]));
    let from = pairs.position(|station| station == origin)?;
    let to = pairs.position(|station| station == destination)?;
    Some((from, from + 1 + to))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedStop {
    pub station_id: u32,
    pub platform: u32,
    pub arrival: u16,
    pub departure: u16,
}

impl PackedStop {
    fn read(words: &[u32]) -> Self {
        Self {
            station_id: STATION_ID.get(words[0]),
            platform: PLATFORM.get(words[0]),
            arrival: ARRIVAL.get(words[1]) as u16,
            departure: DEPARTURE.get(words[1]) as u16,
        }
    }
}

/// One route read in place from the packed words.
#[derive(Debug, Clone, Copy)]
pub struct RouteView<'a> {
    offset: usize,
    header: u32,
    dates: u32,
    stops: &'a [u32],
}

impl<'a> RouteView<'a> {
    pub fn at(words: &'a [u32], offset: usize) -> Option<Self> {
        let header = *words.get(offset)?;
        let dates = *words.get(offset + 1)?;
        let start = offset + HEADER_WORDS;
        let end = start + STOP_COUNT.get(header) as usize * STOP_WORDS;
        Some(Self {
            offset,
            header,
            dates,
            stops: words.get(start..end)?,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset of the following route's header.
    pub fn next_offset(&self) -> usize {
        self.offset + HEADER_WORDS + self.stops.len()
    }

    pub fn id(&self) -> u32 {
        ROUTE_ID.get(self.header)
    }

    pub fn stop_count(&self) -> usize {
        STOP_COUNT.get(self.header) as usize
    }

    pub fn operating_days(&self) -> u8 {
        OPERATING_DAYS.get(self.dates) as u8
    }

    pub fn valid_from(&self) -> i32 {
        VALID_FROM.get(self.dates) as i32
    }

    pub fn valid_to(&self) -> i32 {
        VALID_TO.get(self.dates) as i32
    }

    pub fn stops(&self) -> impl Iterator<Item = PackedStop> + 'a {
        self.stops.chunks_exact(STOP_WORDS).map(PackedStop::read)
    }

    pub fn stop(&self, index: usize) -> Option<PackedStop> {
        self.stops
            .get(index * STOP_WORDS..(index + 1) * STOP_WORDS)
            .map(PackedStop::read)
    }

    pub fn legs_between(&self, origin: u32, destination: u32) -> Option<(usize, usize)> {
        legs_between(self.stops, origin, destination)
    }
}

/// Every route in `words`, in buffer order.
pub fn routes(words: &[u32]) -> impl Iterator<Item = RouteView<'_>> {
    let mut offset = 0;
    std::iter::from_fn(move || {
        let view = RouteView::at(words, offset)?;
        offset = view.next_offset();
        Some(view)
    })
}

impl PackedTimetable {
    pub fn find(&self, query: &JourneyQuery) -> BTreeMap<u32, usize> {
        find(&self.words, query)
    }

    /// Re-reads the route at `offset` for the journey `query` asks about.
    pub fn journey_at(&self, offset: usize, query: &JourneyQuery) -> Option<Journey> {
        let route = self.route_at(offset)?;
        let (from, to) = route.legs_between(query.origin, query.destination)?;
        let from = route.stop(from)?;
        let to = route.stop(to)?;
        Some(Journey {
            route_id: route.id(),
            uid: self.uid(route.id()).unwrap_or_default(),
            departure: from.departure,
            arrival: to.arrival,
            duration: to.arrival as i32 - from.departure as i32,
            departure_platform: self.platform(from.platform).unwrap_or_default().to_owned(),
            arrival_platform: self.platform(to.platform).unwrap_or_default().to_owned(),
        })
    }
}
