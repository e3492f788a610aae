use serde::Serialize;

use crate::timetable::{record::ScheduleHeader, stop::Stop};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceType {
    Train,
    BusReplacement,
}

impl ServiceType {
    /// Maps the two-character train category of a schedule header.
    pub fn from_category(code: &str) -> Option<Self> {
        match code {
            // Cancellations carry no category
            "" | "OO" | "OU" | "OL" | "OW" | "XC" | "XD" | "XI" | "XR" | "XU" | "XX" | "XZ" => {
                Some(Self::Train)
            }
            "BS" | "BR" => Some(Self::BusReplacement),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Dense id, shared by every schedule with the same uid.
    pub id: u32,
    pub uid: String,
    pub service_type: ServiceType,
    /// Monday is bit 6, Sunday bit 0.
    pub operating_days: u8,
    /// Days since the timetable epoch, inclusive.
    pub valid_from: i32,
    pub valid_to: i32,
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn new(id: u32, header: ScheduleHeader) -> Self {
        Self {
            id,
            uid: header.uid,
            service_type: header.service_type,
            operating_days: header.operating_days,
            valid_from: header.valid_from,
            valid_to: header.valid_to,
            stops: vec![],
        }
    }

    pub fn runs_on(&self, day_mask: u8, date: i32) -> bool {
        self.operating_days & day_mask != 0 && self.valid_from <= date && self.valid_to >= date
    }

    pub fn add_stop(&mut self, stop: Stop) {
        self.stops.push(stop);
    }

    /// Indexes of the first call at `origin` and the first later call at
    /// `destination`.
    pub fn legs_between(&self, origin: u32, destination: u32) -> Option<(usize, usize)> {
        let from = self.stops.iter().position(|s| s.station_id == origin)?;
        let to = self.stops[from + 1..]
            .iter()
            .position(|s| s.station_id == destination)?;
        Some((from, from + 1 + to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(stations: &[u32]) -> Route {
        Route {
            id: 0,
            uid: "C12345".into(),
            service_type: ServiceType::Train,
            operating_days: 0b1000000,
            valid_from: 0,
            valid_to: 10,
            stops: stations.iter().map(|id| Stop::new(*id, 0, 0, "")).collect(),
        }
    }

    #[test]
    fn runs_on_needs_day_and_date() {
        let r = route(&[0, 1]);
        assert!(r.runs_on(0b1000000, 5));
        assert!(r.runs_on(0b1111111, 0));
        assert!(r.runs_on(0b1000000, 10));
        assert!(!r.runs_on(0b0100000, 5));
        assert!(!r.runs_on(0b1000000, 11));
        assert!(!r.runs_on(0b1000000, -1));
    }

    #[test]
    fn legs_respect_stop_order() {
        let r = route(&[3, 1, 2, 1]);
        assert_eq!(r.legs_between(3, 1), Some((0, 1)));
        assert_eq!(r.legs_between(1, 2), Some((1, 2)));
        assert_eq!(r.legs_between(2, 1), Some((2, 3)));
        assert_eq!(r.legs_between(2, 3), None);
        assert_eq!(r.legs_between(1, 1), Some((1, 3)));
        assert_eq!(r.legs_between(4, 1), None);
    }

    #[test]
    fn categories() {
        assert_eq!(ServiceType::from_category("XX"), Some(ServiceType::Train));
        assert_eq!(
            ServiceType::from_category("BR"),
            Some(ServiceType::BusReplacement)
        );
        assert_eq!(ServiceType::from_category("ZZ"), None);
    }
}
