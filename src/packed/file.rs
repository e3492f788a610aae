//! Flat-file form of a packed timetable.
//!
//! The word buffer is written as little-endian `u32`s with no framing, so the
//! file can be mapped and scanned as is. Encoded uids use the same form in
//! their own file, and platform names go to a JSON side file.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use tracing::debug;

use crate::packed::{Error, PackedTimetable};

pub const ROUTES_FILE_NAME: &str = "routes.bin";
pub const PLATFORMS_FILE_NAME: &str = "platforms.json";
pub const UIDS_FILE_NAME: &str = "uids.bin";

pub fn write_words<W: Write>(words: &[u32], mut writer: W) -> Result<(), Error> {
    for word in words {
        writer.write_all(&word.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_words<R: Read>(mut reader: R) -> Result<Vec<u32>, Error> {
    let mut bytes = vec![];
    reader.read_to_end(&mut bytes)?;
    words_from_bytes(&bytes)
}

pub fn words_from_bytes(bytes: &[u8]) -> Result<Vec<u32>, Error> {
    if bytes.len() % 4 != 0 {
        return Err(Error::Truncated(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

impl PackedTimetable {
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), Error> {
        write_words(&self.words, writer)
    }

    /// Reads a bare word buffer; the side tables are left empty.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, Error> {
        Ok(Self {
            words: read_words(reader)?,
            platforms: vec![],
            uids: vec![],
        })
    }

    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<(), Error> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        self.write_to(BufWriter::new(File::create(dir.join(ROUTES_FILE_NAME))?))?;
        write_words(
            &self.uids,
            BufWriter::new(File::create(dir.join(UIDS_FILE_NAME))?),
        )?;
        let mut platforms = BufWriter::new(File::create(dir.join(PLATFORMS_FILE_NAME))?);
        serde_json::to_writer(&mut platforms, &self.platforms)?;
        platforms.flush()?;
        debug!("Wrote {} bytes of routes to {:?}", self.len_bytes(), dir);
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let dir = dir.as_ref();
        let mut packed = Self::read_from(BufReader::new(File::open(dir.join(ROUTES_FILE_NAME))?))?;
        packed.uids = read_words(BufReader::new(File::open(dir.join(UIDS_FILE_NAME))?))?;
        let platforms = BufReader::new(File::open(dir.join(PLATFORMS_FILE_NAME))?);
        packed.platforms = serde_json::from_reader(platforms)?;
        Ok(packed)
    }
}
