//! Reads a GB rail CIF extract (station master + schedules), packs its routes
//! into a dense word buffer and answers direct journey queries against it.

pub mod journey;
pub mod packed;
pub mod timetable;
