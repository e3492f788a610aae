//! Fixed-width field extraction for the CIF records the timetable uses.
//!
//! Offsets are byte ranges into the raw line. Text fields have their trailing
//! padding trimmed before use.
//!
//! | Record              | Field                  | Bytes    |
//! |---------------------|------------------------|----------|
//! | `BS` header         | transaction type       | `[2,3)`  |
//! |                     | train uid              | `[3,9)`  |
//! |                     | date runs from (yymmdd)| `[9,15)` |
//! |                     | date runs to (yymmdd)  | `[15,21)`|
//! |                     | days run (Mon..Sun)    | `[21,28)`|
//! |                     | train category         | `[30,32)`|
//! | `LO` / `LT` stop    | location               | `[2,9)`  |
//! |                     | public time            | `[15,19)`|
//! |                     | platform               | `[19,22)`|
//! | `LI` stop           | location               | `[2,9)`  |
//! |                     | scheduled pass         | `[20,24)`|
//! |                     | public arrival         | `[25,29)`|
//! |                     | public departure       | `[29,33)`|
//! |                     | platform               | `[33,36)`|
//! | `A` station master  | name                   | `[5,31)` |
//! |                     | location               | `[36,43)`|
//! |                     | public code            | `[43,46)`|

use std::ops::Range;

use chrono::{NaiveDate, Weekday};

use crate::timetable::{error::Error, route::ServiceType};

pub mod schedule {
    use std::ops::Range;

    pub const TRANSACTION: Range<usize> = 2..3;
    pub const UID: Range<usize> = 3..9;
    pub const DATE_FROM: Range<usize> = 9..15;
    pub const DATE_TO: Range<usize> = 15..21;
    pub const DAYS: Range<usize> = 21..28;
    pub const CATEGORY: Range<usize> = 30..32;
}

pub mod stop {
    use std::ops::Range;

    pub const LOCATION: Range<usize> = 2..9;

    pub const END_PUBLIC_TIME: Range<usize> = 15..19;
    pub const END_PLATFORM: Range<usize> = 19..22;

    pub const PASS: Range<usize> = 20..24;
    pub const PUBLIC_ARRIVAL: Range<usize> = 25..29;
    pub const PUBLIC_DEPARTURE: Range<usize> = 29..33;
    pub const PLATFORM: Range<usize> = 33..36;
}

pub mod station {
    use std::ops::Range;

    pub const NAME: Range<usize> = 5..31;
    pub const LOCATION: Range<usize> = 36..43;
    pub const PUBLIC_CODE: Range<usize> = 43..46;
}

/// Slice `range` out of `line` with trailing padding removed.
///
/// Short lines yield whatever part of the range exists, possibly nothing.
pub fn field(line: &str, range: Range<usize>) -> &str {
    let end = range.end.min(line.len());
    let start = range.start.min(end);
    line.get(start..end).unwrap_or("").trim_end()
}

/// What a schedule-file line is, judged by its two-character designator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Schedule,
    ScheduleDetails,
    Origin,
    Intermediate,
    Terminal,
    Other,
}

impl RecordKind {
    pub fn of(line: &str) -> Self {
        match line.get(..2) {
            Some("BS") => Self::Schedule,
            Some("BX") => Self::ScheduleDetails,
            Some("LO") => Self::Origin,
            Some("LI") => Self::Intermediate,
            Some("LT") => Self::Terminal,
            _ => Self::Other,
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Origin | Self::Intermediate | Self::Terminal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    New,
    Delete,
    Revise,
}

impl Transaction {
    pub fn of(line: &str) -> Result<Self, Error> {
        match field(line, schedule::TRANSACTION) {
            "N" => Ok(Self::New),
            "D" => Ok(Self::Delete),
            "R" => Ok(Self::Revise),
            code => Err(Error::UnknownTypeCode {
                field: "transaction type",
                code: code.to_owned(),
                line: line.trim_end().to_owned(),
            }),
        }
    }
}

/// Minutes since midnight from an `HHMM` group, `hours * 60 + minutes`.
///
/// Out-of-range hours or minutes are not rejected.
pub fn parse_time(hhmm: &str) -> Option<u16> {
    let bytes = hhmm.as_bytes();
    if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let digit = |i: usize| (bytes[i] - b'0') as u16;
    let hours = digit(0) * 10 + digit(1);
    let minutes = digit(2) * 10 + digit(3);
    Some(hours * 60 + minutes)
}

pub fn format_minutes(value: u16) -> String {
    format!("{}:{:02}", value / 60, value % 60)
}

/// Operating days from a 7-character `0`/`1` string, Monday first.
///
/// The string is read left to right as a binary number, so Monday is bit 6
/// and Sunday is bit 0.
pub fn parse_days(days: &str) -> Option<u8> {
    if days.len() != 7 {
        return None;
    }
    days.bytes().try_fold(0u8, |mask, b| match b {
        b'0' => Some(mask << 1),
        b'1' => Some((mask << 1) | 1),
        _ => None,
    })
}

pub fn weekday_bit(day: Weekday) -> u8 {
    1 << (6 - day.num_days_from_monday())
}

/// Calendar dates as whole days from a fixed epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCodec {
    epoch: NaiveDate,
}

impl Default for DateCodec {
    fn default() -> Self {
        Self {
            epoch: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
        }
    }
}

impl DateCodec {
    pub fn new(epoch: NaiveDate) -> Self {
        Self { epoch }
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    pub fn encode(&self, date: NaiveDate) -> i32 {
        date.signed_duration_since(self.epoch).num_days() as i32
    }

    pub fn encode_ymd(&self, year: i32, month: u32, day: u32) -> Option<i32> {
        NaiveDate::from_ymd_opt(year, month, day).map(|date| self.encode(date))
    }

    pub fn decode(&self, days: i32) -> Option<NaiveDate> {
        self.epoch
            .checked_add_signed(chrono::Duration::days(days as i64))
    }

    /// Encodes a `yymmdd` field; two-digit years map to `2000 + yy`.
    pub fn parse_yymmdd(&self, value: &str) -> Option<i32> {
        if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: i32 = value[0..2].parse().ok()?;
        let month: u32 = value[2..4].parse().ok()?;
        let day: u32 = value[4..6].parse().ok()?;
        self.encode_ymd(2000 + year, month, day)
    }
}

const UID_NUMBER_BITS: u32 = 17;
const UID_NUMBER_MASK: u32 = (1 << UID_NUMBER_BITS) - 1;
const UID_LETTER_MASK: u32 = 0b11111;

/// Packs a train uid such as `C12345` into 22 bits: the letter's alphabet
/// index in bits 17..21, the number in bits 0..16.
pub fn encode_uid(uid: &str) -> Option<u32> {
    let mut chars = uid.chars();
    let letter = chars.next()?.to_ascii_lowercase();
    if !letter.is_ascii_lowercase() {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u32 = digits.parse().ok()?;
    if number > UID_NUMBER_MASK {
        return None;
    }
    let index = letter as u32 - 'a' as u32;
    Some((index << UID_NUMBER_BITS) | number)
}

pub fn format_uid(value: u32) -> String {
    let letter = (b'a' + ((value >> UID_NUMBER_BITS) & UID_LETTER_MASK) as u8) as char;
    let number = value & UID_NUMBER_MASK;
    format!("{}{:05}", letter.to_ascii_uppercase(), number)
}

/// The fields of a new-schedule header the timetable keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleHeader {
    pub uid: String,
    pub valid_from: i32,
    pub valid_to: i32,
    pub operating_days: u8,
    pub service_type: ServiceType,
}

impl ScheduleHeader {
    /// Decodes a `BS` line.
    ///
    /// An unknown train category is fatal; dates or days that do not parse
    /// give `Ok(None)` so the caller can skip the schedule.
    pub fn parse(line: &str, dates: &DateCodec) -> Result<Option<Self>, Error> {
        let category = field(line, schedule::CATEGORY);
        let service_type =
            ServiceType::from_category(category).ok_or_else(|| Error::UnknownTypeCode {
                field: "train category",
                code: category.to_owned(),
                line: line.trim_end().to_owned(),
            })?;

        Ok(Self::parse_fields(line, dates, service_type))
    }

    fn parse_fields(line: &str, dates: &DateCodec, service_type: ServiceType) -> Option<Self> {
        Some(Self {
            uid: field(line, schedule::UID).to_owned(),
            valid_from: dates.parse_yymmdd(field(line, schedule::DATE_FROM))?,
            valid_to: dates.parse_yymmdd(field(line, schedule::DATE_TO))?,
            operating_days: parse_days(field(line, schedule::DAYS))?,
            service_type,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallRecord<'a> {
    pub location: &'a str,
    pub arrival: u16,
    pub departure: u16,
    pub platform: &'a str,
    pub terminal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRecord<'a> {
    Call(CallRecord<'a>),
    /// The train runs through without calling.
    Pass,
    /// Times that are not `HHMM` digit groups.
    Malformed,
}

/// Decodes an `LO`, `LI` or `LT` line.
///
/// Other `L` designators never reach here from the assembler: they classify
/// as [`RecordKind::Other`] and break the open route instead.
pub fn decode_stop(line: &str) -> Result<StopRecord<'_>, Error> {
    let location = field(line, stop::LOCATION);
    let kind = RecordKind::of(line);
    let (arrival, departure, platform) = match kind {
        RecordKind::Origin | RecordKind::Terminal => {
            let time = parse_time(field(line, stop::END_PUBLIC_TIME));
            (time, time, field(line, stop::END_PLATFORM))
        }
        RecordKind::Intermediate => {
            if !field(line, stop::PASS).is_empty() {
                return Ok(StopRecord::Pass);
            }
            (
                parse_time(field(line, stop::PUBLIC_ARRIVAL)),
                parse_time(field(line, stop::PUBLIC_DEPARTURE)),
                field(line, stop::PLATFORM),
            )
        }
        _ => return Err(Error::UnrecognizedStopFormat(line.trim_end().to_owned())),
    };

    match (arrival, departure) {
        (Some(arrival), Some(departure)) => Ok(StopRecord::Call(CallRecord {
            location,
            arrival,
            departure,
            platform,
            terminal: kind == RecordKind::Terminal,
        })),
        _ => Ok(StopRecord::Malformed),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationRecord<'a> {
    pub name: &'a str,
    pub location: &'a str,
    pub public_code: &'a str,
}

/// Decodes a primary station entry (`A` record) of the station master file.
///
/// The file header and entries without a public code are skipped.
pub fn decode_station(line: &str) -> Option<StationRecord<'_>> {
    if !line.starts_with('A') || line.contains("FILE-SPEC=") {
        return None;
    }
    let record = StationRecord {
        name: field(line, station::NAME).trim_start(),
        location: field(line, station::LOCATION),
        public_code: field(line, station::PUBLIC_CODE),
    };
    if record.location.is_empty() || record.public_code.trim().is_empty() {
        return None;
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_trims_padding() {
        assert_eq!(field("LOWATRLOO 0600", stop::LOCATION), "WATRLOO");
        assert_eq!(field("LOSURBITN\n", 2..12), "SURBITN");
        assert_eq!(field("LO", stop::LOCATION), "");
    }

    #[test]
    fn parses_times() {
        assert_eq!(parse_time("0000"), Some(0));
        assert_eq!(parse_time("1020"), Some(620));
        assert_eq!(parse_time("2359"), Some(1439));
        assert_eq!(parse_time("9999"), Some(99 * 60 + 99));
        assert_eq!(parse_time("10 0"), None);
        assert_eq!(parse_time("102"), None);
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_minutes(620), "10:20");
        assert_eq!(format_minutes(5), "0:05");
    }

    #[test]
    fn parses_days_monday_first() {
        assert_eq!(parse_days("1000000"), Some(0b1000000));
        assert_eq!(parse_days("0000001"), Some(0b0000001));
        assert_eq!(parse_days("1111100"), Some(0b1111100));
        assert_eq!(parse_days("111110"), None);
        assert_eq!(parse_days("11111x0"), None);
        assert_eq!(weekday_bit(Weekday::Mon), 0b1000000);
        assert_eq!(weekday_bit(Weekday::Sun), 0b0000001);
    }

    #[test]
    fn encodes_dates_from_epoch() {
        let dates = DateCodec::default();
        assert_eq!(dates.encode_ymd(2018, 1, 1), Some(0));
        assert_eq!(dates.encode_ymd(2018, 2, 1), Some(31));
        assert_eq!(dates.encode_ymd(2019, 1, 1), Some(365));
        assert_eq!(dates.encode_ymd(2021, 1, 1), Some(365 * 2 + 366));
        assert_eq!(dates.encode_ymd(2018, 2, 30), None);
        assert_eq!(dates.parse_yymmdd("180102"), Some(1));
        assert_eq!(dates.parse_yymmdd("18010"), None);
    }

    #[test]
    fn dates_round_trip_across_field_range() {
        let dates = DateCodec::default();
        for days in (0..2048).step_by(7) {
            let date = dates.decode(days).unwrap();
            assert_eq!(dates.encode(date), days);
        }
    }

    #[test]
    fn parses_schedule_header() {
        let dates = DateCodec::default();
        let header = ScheduleHeader::parse("BSNC123451801011801111000000 POO", &dates)
            .unwrap()
            .unwrap();
        assert_eq!(header.uid, "C12345");
        assert_eq!((header.valid_from, header.valid_to), (0, 10));
        assert_eq!(header.operating_days, 0b1000000);
        assert_eq!(header.service_type, ServiceType::Train);

        let bad_date = ScheduleHeader::parse("BSNC123451813011801111000000 POO", &dates);
        assert_eq!(bad_date.unwrap(), None);
        let bad_days = ScheduleHeader::parse("BSNC12345180101180111100x000 PBS", &dates);
        assert_eq!(bad_days.unwrap(), None);
    }

    #[test]
    fn uid_codec() {
        assert_eq!(encode_uid("A00001"), Some(1));
        assert_eq!(encode_uid("C12345"), Some((2 << 17) | 12345));
        assert_eq!(format_uid(encode_uid("C12345").unwrap()), "C12345");
        assert_eq!(format_uid(encode_uid("y00042").unwrap()), "Y00042");
        assert_eq!(encode_uid("C"), None);
        assert_eq!(encode_uid("1C234"), None);
        assert_eq!(encode_uid("C999999"), None);
    }

    #[test]
    fn classifies_records() {
        assert_eq!(RecordKind::of("BSNC123451"), RecordKind::Schedule);
        assert_eq!(RecordKind::of("BX         SW"), RecordKind::ScheduleDetails);
        assert_eq!(RecordKind::of("LIVAUXHLM"), RecordKind::Intermediate);
        assert_eq!(RecordKind::of("CRCLPHMJN"), RecordKind::Other);
        assert_eq!(RecordKind::of("L"), RecordKind::Other);
        assert!(Transaction::of("BSX").is_err());
        assert_eq!(Transaction::of("BSR").unwrap(), Transaction::Revise);
    }

    #[test]
    fn rejects_unknown_stop_format() {
        assert!(matches!(
            decode_stop("LXWATRLOO 0600"),
            Err(Error::UnrecognizedStopFormat(_))
        ));
    }

    #[test]
    fn skips_station_master_header() {
        let header =
            "A                             FILE-SPEC=05 1.00 12/06/19 18.04.15   183";
        assert_eq!(decode_station(header), None);
        assert_eq!(decode_station("L  ALIAS"), None);
    }
}
