//! Routes packed into a flat buffer of 32-bit words.
//!
//! Each route is a two-word header followed by two words per stop:
//!
//! ```text
//! header A  0 | stop count (30..24) | route id (23..0)
//! header B  0 | 00 | valid from (28..18) | valid to (17..7) | days (6..0)
//! stop A    1 | 00000000000 | station id (19..8) | platform index (7..0)
//! stop B    1 | 000000000 | arrival (21..11) | departure (10..0)
//! ```
//!
//! Bit 31 tells header words (0) from stop words (1). The stop count in
//! header A is enough to find the next route's header without reading any
//! stop words.
//!
//! Source uids sit in a side table indexed by route id, each packed into 22
//! bits by [`encode_uid`](crate::timetable::record::encode_uid).

pub mod encoder;
pub mod file;
pub mod scanner;

use std::io;

use thiserror::Error;

use crate::timetable::record::format_uid;

pub use encoder::{encode, PlatformTable};
pub use scanner::{find, PackedStop, RouteView};

pub const HEADER_WORDS: usize = 2;
pub const STOP_WORDS: usize = 2;

pub const STOP_MARKER: u32 = 1 << 31;

/// Uid table entry for a route id with no encodable uid.
pub const NO_UID: u32 = u32::MAX;

pub const ROUTE_ID: Field = Field::new("route id", 0, 24);
pub const STOP_COUNT: Field = Field::new("stop count", 24, 7);

pub const OPERATING_DAYS: Field = Field::new("operating days", 0, 7);
pub const VALID_TO: Field = Field::new("valid to", 7, 11);
pub const VALID_FROM: Field = Field::new("valid from", 18, 11);

pub const PLATFORM: Field = Field::new("platform index", 0, 8);
pub const STATION_ID: Field = Field::new("station id", 8, 12);

pub const DEPARTURE: Field = Field::new("departure", 0, 11);
pub const ARRIVAL: Field = Field::new("arrival", 11, 11);

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} value {value} does not fit in {bits} bits")]
    FieldOverflow {
        field: &'static str,
        value: i64,
        bits: u32,
    },
    #[error("Packed buffer length {0} is not a whole number of words")]
    Truncated(usize),
}

/// A bit range inside a packed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub shift: u32,
    pub bits: u32,
}

impl Field {
    pub const fn new(name: &'static str, shift: u32, bits: u32) -> Self {
        Self { name, shift, bits }
    }

    pub const fn max(&self) -> u32 {
        (1 << self.bits) - 1
    }

    /// `value` shifted into place, or an overflow error when it does not fit.
    pub fn pack(&self, value: i64) -> Result<u32, Error> {
        if value < 0 || value > self.max() as i64 {
            return Err(Error::FieldOverflow {
                field: self.name,
                value,
                bits: self.bits,
            });
        }
        Ok((value as u32) << self.shift)
    }

    #[inline]
    pub fn get(&self, word: u32) -> u32 {
        (word >> self.shift) & self.max()
    }
}

#[inline]
pub fn is_stop_word(word: u32) -> bool {
    word & STOP_MARKER != 0
}

/// The packed buffer plus the platform names its stop words index into and
/// the encoded uid of each route id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedTimetable {
    pub words: Vec<u32>,
    pub platforms: Vec<String>,
    pub uids: Vec<u32>,
}

impl PackedTimetable {
    pub fn uid(&self, route_id: u32) -> Option<String> {
        self.uids
            .get(route_id as usize)
            .filter(|code| **code != NO_UID)
            .map(|code| format_uid(*code))
    }

    pub fn platform(&self, index: u32) -> Option<&str> {
        self.platforms.get(index as usize).map(String::as_str)
    }

    /// The route whose header starts at word `offset`.
    pub fn route_at(&self, offset: usize) -> Option<RouteView<'_>> {
        RouteView::at(&self.words, offset)
    }

    /// Every route in buffer order.
    pub fn routes(&self) -> impl Iterator<Item = RouteView<'_>> {
        scanner::routes(&self.words)
    }

    pub fn len_bytes(&self) -> usize {
        self.words.len() * 4
    }
}
