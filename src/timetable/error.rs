use std::io;

use thiserror::Error;

/// Unrecoverable problems hit while reading a timetable extract.
///
/// Recoverable anomalies (an unknown station, a pass record, a route cut short
/// by the end of the file) never show up here; they are counted in
/// [`AssemblyStats`](super::assembler::AssemblyStats) instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Timetable must have a .{0} file")]
    MissingFile(&'static str),
    #[error("Unknown {field} code {code:?} in line: {line}")]
    UnknownTypeCode {
        field: &'static str,
        code: String,
        line: String,
    },
    #[error("Expected all schedules to be new, found {count} amended or deleted")]
    UnsupportedRevision { count: usize },
    /// Raised by [`decode_stop`](super::record::decode_stop) when handed a
    /// line that is not `LO`, `LI` or `LT`. The assembler only decodes those
    /// three and treats any other `L` line as a break in the route.
    #[error("Unrecognized stop format: {0}")]
    UnrecognizedStopFormat(String),
}
