use std::{collections::HashMap, time::Instant};

use tracing::debug;

use crate::{
    packed::{
        Error, PackedTimetable, ARRIVAL, DEPARTURE, HEADER_WORDS, NO_UID, OPERATING_DAYS,
        PLATFORM, ROUTE_ID, STATION_ID, STOP_COUNT, STOP_MARKER, STOP_WORDS, VALID_FROM,
        VALID_TO,
    },
    timetable::{record::encode_uid, Route},
};

/// Distinct platform names in order of first appearance.
///
/// Index 0 is always the empty platform.
#[derive(Debug, Clone)]
pub struct PlatformTable {
    values: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl Default for PlatformTable {
    fn default() -> Self {
        Self {
            values: vec![String::new()],
            lookup: HashMap::from([(String::new(), 0)]),
        }
    }
}

impl PlatformTable {
    pub fn index(&mut self, platform: &str) -> u32 {
        if let Some(index) = self.lookup.get(platform) {
            return *index;
        }
        let index = self.values.len() as u32;
        self.values.push(platform.to_owned());
        self.lookup.insert(platform.to_owned(), index);
        index
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

/// Words needed for `routes`.
pub fn packed_len(routes: &[Route]) -> usize {
    routes
        .iter()
        .map(|route| HEADER_WORDS + route.stops.len() * STOP_WORDS)
        .sum()
}

/// Packs `routes` into one buffer, sized once up front.
///
/// Any value too wide for its field aborts the whole encode.
pub fn encode(routes: &[Route]) -> Result<PackedTimetable, Error> {
    let now = Instant::now();
    let mut words = vec![0u32; packed_len(routes)];
    let mut platforms = PlatformTable::default();
    let mut uids: Vec<u32> = vec![];
    let mut cursor = 0;

    for route in routes {
        words[cursor] =
            ROUTE_ID.pack(route.id as i64)? | STOP_COUNT.pack(route.stops.len() as i64)?;
        words[cursor + 1] = VALID_FROM.pack(route.valid_from as i64)?
            | VALID_TO.pack(route.valid_to as i64)?
            | OPERATING_DAYS.pack(route.operating_days as i64)?;
        cursor += HEADER_WORDS;

        let id = route.id as usize;
        if uids.len() <= id {
            uids.resize(id + 1, NO_UID);
        }
        if uids[id] == NO_UID {
            uids[id] = encode_uid(&route.uid).unwrap_or(NO_UID);
        }

        for stop in &route.stops {
            let platform = platforms.index(&stop.platform);
            words[cursor] = STOP_MARKER
                | STATION_ID.pack(stop.station_id as i64)?
                | PLATFORM.pack(platform as i64)?;
            words[cursor + 1] = STOP_MARKER
                | ARRIVAL.pack(stop.arrival as i64)?
                | DEPARTURE.pack(stop.departure as i64)?;
            cursor += STOP_WORDS;
        }
    }
    debug_assert_eq!(cursor, words.len());

    debug!(
        "Packed {} routes into {} words in {:?}",
        routes.len(),
        words.len(),
        now.elapsed()
    );
    Ok(PackedTimetable {
        words,
        platforms: platforms.into_values(),
        uids,
    })
}
