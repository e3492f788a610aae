use chrono::NaiveDate;

use crate::timetable::record::DateCodec;

/// How station-master entries are turned into dense station ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StationPolicy {
    /// One id per distinct public code. Later entries sharing a code point at
    /// the first entry's id.
    #[default]
    UniqueCode,
    /// One id per station-master entry, duplicates included.
    Append,
}

/// Order in which [`StationPolicy::UniqueCode`] hands out ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StationOrder {
    /// Ids follow the sorted public codes, so two runs over the same stations
    /// agree regardless of file order.
    #[default]
    Sorted,
    FirstSeen,
}

#[derive(Debug, Clone)]
pub struct TimetableConfig {
    pub epoch: NaiveDate,
    pub station_policy: StationPolicy,
    pub station_order: StationOrder,
}

impl TimetableConfig {
    pub fn date_codec(&self) -> DateCodec {
        DateCodec::new(self.epoch)
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            epoch: DateCodec::default().epoch(),
            station_policy: StationPolicy::default(),
            station_order: StationOrder::default(),
        }
    }
}
