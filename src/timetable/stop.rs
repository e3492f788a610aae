use serde::Serialize;

/// A call at a station on a route.
///
/// Times are minutes since midnight with no day rollover, so a service
/// crossing midnight can depart "before" it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stop {
    pub station_id: u32,
    pub arrival: u16,
    pub departure: u16,
    pub platform: String,
}

impl Stop {
    pub fn new(station_id: u32, arrival: u16, departure: u16, platform: &str) -> Self {
        Self {
            station_id,
            arrival,
            departure,
            platform: platform.to_owned(),
        }
    }
}
