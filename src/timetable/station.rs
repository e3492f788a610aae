use std::collections::HashMap;

use serde::Serialize;

use crate::timetable::{
    config::{StationOrder, StationPolicy},
    record::decode_station,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    pub id: u32,
    pub public_code: String,
    pub name: String,
    /// Internal location code of the entry that created the station.
    pub location: String,
}

/// Stations with dense ids and the lookups the schedule reader joins on.
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    stations: Vec<Station>,
    by_location: HashMap<String, u32>,
    by_public_code: HashMap<String, u32>,
}

impl StationTable {
    pub fn builder(policy: StationPolicy, order: StationOrder) -> StationTableBuilder {
        StationTableBuilder {
            policy,
            order,
            entries: vec![],
        }
    }

    pub fn from_lines<I, S>(lines: I, policy: StationPolicy, order: StationOrder) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Self::builder(policy, order);
        for line in lines {
            builder.push_line(line.as_ref());
        }
        builder.build()
    }

    /// Station id for an internal location code.
    pub fn resolve(&self, location: &str) -> Option<u32> {
        self.by_location.get(location).copied()
    }

    pub fn by_public_code(&self, code: &str) -> Option<&Station> {
        let id = self.by_public_code.get(code)?;
        self.stations.get(*id as usize)
    }

    pub fn get(&self, id: u32) -> Option<&Station> {
        self.stations.get(id as usize)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    location: String,
    public_code: String,
}

pub struct StationTableBuilder {
    policy: StationPolicy,
    order: StationOrder,
    entries: Vec<Entry>,
}

impl StationTableBuilder {
    /// Feeds one station-master line; anything but a primary entry is ignored.
    pub fn push_line(&mut self, line: &str) {
        if let Some(record) = decode_station(line) {
            self.push(record.location, record.public_code, record.name);
        }
    }

    pub fn push(&mut self, location: &str, public_code: &str, name: &str) {
        self.entries.push(Entry {
            name: name.to_owned(),
            location: location.to_owned(),
            public_code: public_code.to_owned(),
        });
    }

    pub fn build(self) -> StationTable {
        match self.policy {
            StationPolicy::Append => build_append(self.entries),
            StationPolicy::UniqueCode => build_unique(self.entries, self.order),
        }
    }
}

fn build_append(entries: Vec<Entry>) -> StationTable {
    let mut table = StationTable::default();
    for (i, entry) in entries.into_iter().enumerate() {
        let id = i as u32;
        table.by_location.entry(entry.location.clone()).or_insert(id);
        table
            .by_public_code
            .entry(entry.public_code.clone())
            .or_insert(id);
        table.stations.push(Station {
            id,
            public_code: entry.public_code,
            name: entry.name,
            location: entry.location,
        });
    }
    table
}

fn build_unique(entries: Vec<Entry>, order: StationOrder) -> StationTable {
    // First entry per public code, in file order
    let mut first: HashMap<&str, usize> = HashMap::new();
    let mut codes: Vec<&str> = vec![];
    for (i, entry) in entries.iter().enumerate() {
        first.entry(entry.public_code.as_str()).or_insert_with(|| {
            codes.push(entry.public_code.as_str());
            i
        });
    }
    if order == StationOrder::Sorted {
        codes.sort_unstable();
    }

    let mut table = StationTable::default();
    for (id, code) in codes.iter().enumerate() {
        let entry = &entries[first[code]];
        table.by_public_code.insert(entry.public_code.clone(), id as u32);
        table.stations.push(Station {
            id: id as u32,
            public_code: entry.public_code.clone(),
            name: entry.name.clone(),
            location: entry.location.clone(),
        });
    }
    for entry in &entries {
        let id = table.by_public_code[entry.public_code.as_str()];
        table.by_location.entry(entry.location.clone()).or_insert(id);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(policy: StationPolicy, order: StationOrder) -> StationTable {
        let mut builder = StationTable::builder(policy, order);
        builder.push("WATRLOO", "WAT", "LONDON WATERLOO");
        builder.push("SURBITN", "SUR", "SURBITON");
        builder.push("WATRLMN", "WAT", "LONDON WATERLOO MAIN");
        builder.push("CLPHMJN", "CLJ", "CLAPHAM JUNCTION");
        builder.build()
    }

    #[test]
    fn unique_sorted_ids_follow_codes() {
        let table = table(StationPolicy::UniqueCode, StationOrder::Sorted);
        let codes: Vec<_> = table.stations().iter().map(|s| s.public_code.as_str()).collect();
        assert_eq!(codes, vec!["CLJ", "SUR", "WAT"]);
        assert_eq!(table.resolve("WATRLOO"), Some(2));
        assert_eq!(table.resolve("WATRLMN"), Some(2));
        assert_eq!(table.resolve("CLPHMJN"), Some(0));
        assert_eq!(table.by_public_code("WAT").unwrap().name, "LONDON WATERLOO");
    }

    #[test]
    fn unique_first_seen_ids_follow_input() {
        let table = table(StationPolicy::UniqueCode, StationOrder::FirstSeen);
        assert_eq!(table.len(), 3);
        assert_eq!(table.resolve("WATRLOO"), Some(0));
        assert_eq!(table.resolve("SURBITN"), Some(1));
        assert_eq!(table.resolve("WATRLMN"), Some(0));
        assert_eq!(table.resolve("CLPHMJN"), Some(2));
    }

    #[test]
    fn append_gives_every_entry_an_id() {
        let table = table(StationPolicy::Append, StationOrder::Sorted);
        assert_eq!(table.len(), 4);
        assert_eq!(table.resolve("WATRLMN"), Some(2));
        assert_eq!(table.by_public_code("WAT").unwrap().id, 0);
        assert_eq!(table.get(2).unwrap().name, "LONDON WATERLOO MAIN");
    }

    #[test]
    fn unknown_location_is_unresolved() {
        let table = table(StationPolicy::UniqueCode, StationOrder::Sorted);
        assert_eq!(table.resolve("NOWHERE"), None);
        assert!(table.by_public_code("XXX").is_none());
    }
}
